//! Requirement specifiers
//!
//! A [`Requirement`] is one line of a dependency file: a package name, an
//! optional set of extras, zero or more version clauses and an optional
//! environment marker.
//!
//! ```
//! use depman_core::Requirement;
//!
//! let req: Requirement = "Black [d] >= 23.7, < 24 ; python_version >= '3.8'".parse().unwrap();
//! assert_eq!(req.canonical_name(), "black");
//! assert_eq!(req.to_string(), "Black[d]<24,>=23.7; python_version >= '3.8'");
//! ```
//!
//! Direct references (`pkg @ https://...`), VCS URLs, pip options and
//! comments are not representable and fail to parse.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

static HEAD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\[\]]*)\])?(?P<rest>.*)$",
    )
    .unwrap()
});

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").unwrap());

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[vV]?[0-9](?:[A-Za-z0-9._+!-]*[A-Za-z0-9])?$").unwrap());

static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Why a specifier string could not be read as a [`Requirement`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty requirement")]
    Empty,

    #[error("'{input}' does not start with a valid package name")]
    InvalidName { input: String },

    #[error("invalid extra '{extra}'")]
    InvalidExtra { extra: String },

    #[error("direct references are not supported ('{name} @ ...')")]
    DirectReference { name: String },

    #[error("'{clause}' is not a version clause")]
    MissingOperator { clause: String },

    #[error("invalid version '{version}'")]
    InvalidVersion { version: String },

    #[error("wildcard versions are only allowed with == and !=, not {operator}")]
    WildcardNotAllowed { operator: Operator },

    #[error("'~={version}' needs at least two release segments")]
    CompatibleRelease { version: String },

    #[error("unbalanced parentheses around version clauses")]
    UnbalancedParens,

    #[error("empty environment marker")]
    EmptyMarker,
}

/// Version comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `===`
    ArbitraryEqual,
    /// `~=`
    Compatible,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
}

impl Operator {
    // Longest tokens first so `===` is not read as `==`.
    const TOKENS: [(&'static str, Operator); 8] = [
        ("===", Operator::ArbitraryEqual),
        ("~=", Operator::Compatible),
        ("==", Operator::Equal),
        ("!=", Operator::NotEqual),
        ("<=", Operator::LessEqual),
        (">=", Operator::GreaterEqual),
        ("<", Operator::Less),
        (">", Operator::Greater),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::ArbitraryEqual => "===",
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }

    /// Split a leading operator off `clause`.
    fn split_prefix(clause: &str) -> Option<(Operator, &str)> {
        Self::TOKENS
            .iter()
            .find_map(|(token, op)| clause.strip_prefix(token).map(|rest| (*op, rest)))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `operator version` clause such as `>=1.4` or `==23.7.*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Specifier {
    operator: Operator,
    version: String,
}

impl Specifier {
    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn parse(clause: &str) -> Result<Self, ParseError> {
        let clause = clause.trim();
        let (operator, rest) =
            Operator::split_prefix(clause).ok_or_else(|| ParseError::MissingOperator {
                clause: clause.to_string(),
            })?;
        let version = parse_version(operator, rest.trim())?;
        Ok(Self {
            operator,
            version: version.to_string(),
        })
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)
    }
}

impl Serialize for Specifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_version(operator: Operator, version: &str) -> Result<&str, ParseError> {
    if version.is_empty() || version.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidVersion {
            version: version.to_string(),
        });
    }
    if operator == Operator::ArbitraryEqual {
        return Ok(version);
    }

    let (base, wildcard) = match version.strip_suffix(".*") {
        Some(base) => (base, true),
        None => (version, false),
    };
    if wildcard && !matches!(operator, Operator::Equal | Operator::NotEqual) {
        return Err(ParseError::WildcardNotAllowed { operator });
    }
    if !VERSION_PATTERN.is_match(base) {
        return Err(ParseError::InvalidVersion {
            version: version.to_string(),
        });
    }
    if operator == Operator::Compatible && release_segments(base) < 2 {
        return Err(ParseError::CompatibleRelease {
            version: version.to_string(),
        });
    }
    Ok(version)
}

/// Count the numeric release segments of a version, ignoring epoch and
/// pre/post/dev/local suffixes.
fn release_segments(version: &str) -> usize {
    let version = version.trim_start_matches(['v', 'V']);
    let version = version.split_once('!').map_or(version, |(_, rest)| rest);
    let release: String = version
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    release.split('.').filter(|segment| !segment.is_empty()).count()
}

/// Normalize a package name for comparison.
///
/// Lowercases and collapses runs of `-`, `_` and `.` into a single `-`, so
/// `My_Pkg`, `my-pkg` and `my.pkg` all identify the same package.
pub fn canonicalize_name(name: &str) -> String {
    SEPARATOR_RUN
        .replace_all(&name.to_ascii_lowercase(), "-")
        .into_owned()
}

/// One parsed dependency declaration.
///
/// Two requirements are equal when their canonical names, extras, version
/// clauses and markers match; the spelling of the name does not matter.
#[derive(Debug, Clone, Serialize)]
pub struct Requirement {
    name: String,
    extras: Vec<String>,
    specifiers: Vec<Specifier>,
    marker: Option<String>,
}

impl Requirement {
    /// The name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }

    /// Extras, sorted.
    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    /// Version clauses, sorted by their textual form. Empty means any version.
    pub fn specifiers(&self) -> &[Specifier] {
        &self.specifiers
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    fn identity(&self) -> (String, Vec<String>, &[Specifier], Option<&str>) {
        (
            self.canonical_name(),
            self.extras.iter().map(|e| canonicalize_name(e)).collect(),
            &self.specifiers,
            self.marker.as_deref(),
        )
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Requirement {}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        for (idx, spec) in self.specifiers.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{spec}")?;
        }
        if let Some(marker) = &self.marker {
            write!(f, "; {marker}")?;
        }
        Ok(())
    }
}

impl FromStr for Requirement {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let (body, marker) = match text.split_once(';') {
            Some((body, marker)) => (body.trim_end(), Some(parse_marker(marker)?)),
            None => (text, None),
        };

        let caps = HEAD_PATTERN
            .captures(body)
            .ok_or_else(|| ParseError::InvalidName {
                input: text.to_string(),
            })?;
        let name = caps["name"].to_string();
        let extras = match caps.name("extras") {
            Some(extras) => parse_extras(extras.as_str())?,
            None => Vec::new(),
        };

        let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();
        if rest.starts_with('@') {
            return Err(ParseError::DirectReference { name });
        }
        let specifiers = parse_specifiers(rest)?;

        Ok(Self {
            name,
            extras,
            specifiers,
            marker,
        })
    }
}

fn parse_extras(raw: &str) -> Result<Vec<String>, ParseError> {
    let mut extras = Vec::new();
    for extra in raw.split(',').map(str::trim) {
        if extra.is_empty() && raw.trim().is_empty() {
            break;
        }
        if !NAME_PATTERN.is_match(extra) {
            return Err(ParseError::InvalidExtra {
                extra: extra.to_string(),
            });
        }
        extras.push(extra.to_string());
    }
    extras.sort_by_cached_key(|extra| canonicalize_name(extra));
    extras.dedup_by(|a, b| canonicalize_name(a) == canonicalize_name(b));
    Ok(extras)
}

fn parse_specifiers(raw: &str) -> Result<Vec<Specifier>, ParseError> {
    let raw = match raw.strip_prefix('(') {
        Some(inner) => inner
            .strip_suffix(')')
            .ok_or(ParseError::UnbalancedParens)?
            .trim(),
        None => raw,
    };
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let mut specifiers = raw
        .split(',')
        .map(Specifier::parse)
        .collect::<Result<Vec<_>, _>>()?;
    specifiers.sort_by_cached_key(ToString::to_string);
    specifiers.dedup();
    Ok(specifiers)
}

fn parse_marker(raw: &str) -> Result<String, ParseError> {
    let marker = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if marker.is_empty() {
        return Err(ParseError::EmptyMarker);
    }
    Ok(marker)
}
