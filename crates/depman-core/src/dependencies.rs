//! Ordered, duplicate-free collection of requirements

use crate::requirement::Requirement;
use serde::Serialize;

/// The dependencies declared by one dependency file.
///
/// Keeps insertion order and never holds two equal [`Requirement`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dependencies {
    entries: Vec<Requirement>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse dependency file contents, one requirement per line.
    ///
    /// Lines that are not requirements (comments, options, URLs, blank
    /// lines) are dropped. A requirement repeated later in the file is
    /// dropped in favour of its first occurrence.
    pub fn parse(content: &str) -> Self {
        let mut deps = Self::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            match line.parse::<Requirement>() {
                Ok(req) => {
                    if !deps.insert(req) {
                        tracing::debug!(line = idx + 1, text = line, "Dropping duplicate requirement");
                    }
                }
                Err(err) => {
                    tracing::trace!(line = idx + 1, text = line, error = %err, "Skipping line");
                }
            }
        }
        deps
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Requirement> {
        self.entries.get(index)
    }

    pub fn first(&self) -> Option<&Requirement> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&Requirement> {
        self.entries.last()
    }

    pub fn contains(&self, req: &Requirement) -> bool {
        self.entries.contains(req)
    }

    /// Append `req` unless an equal requirement is already present.
    ///
    /// Returns whether the collection changed.
    pub fn insert(&mut self, req: Requirement) -> bool {
        if self.contains(&req) {
            return false;
        }
        self.entries.push(req);
        true
    }

    /// Remove the requirement equal to `req`, keeping the order of the rest.
    ///
    /// Returns whether the collection changed.
    pub fn remove(&mut self, req: &Requirement) -> bool {
        match self.entries.iter().position(|entry| entry == req) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Canonical form of every entry, in order.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// File contents for this collection: canonical lines joined by `\n`,
    /// without a trailing newline.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "# file used to test dependency management
requests==2.31.0
black==23.7.*
mypy~=1.4
pylint>1
";

    fn req(s: &str) -> Requirement {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_keeps_file_order_and_drops_comments() {
        let deps = Dependencies::parse(SAMPLE);
        assert_eq!(
            deps.lines(),
            vec!["requests==2.31.0", "black==23.7.*", "mypy~=1.4", "pylint>1"]
        );
    }

    #[test]
    fn test_parse_drops_unrepresentable_lines() {
        let content = "\
-r base.txt
requests==2.31.0

git+https://github.com/someproject/
pkg @ https://example.com/pkg.tar.gz
  mypy ~= 1.4
";
        let deps = Dependencies::parse(content);
        assert_eq!(deps.lines(), vec!["requests==2.31.0", "mypy~=1.4"]);
    }

    #[test]
    fn test_parse_collapses_duplicates_keeping_first() {
        let deps = Dependencies::parse("requests==2.31.0\nblack\nRequests == 2.31.0\n");
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.first().unwrap().name(), "requests");
    }

    #[test]
    fn test_insert_appends_and_rejects_duplicates() {
        let mut deps = Dependencies::parse(SAMPLE);
        assert!(deps.insert(req("my_pkg==1")));
        assert_eq!(deps.len(), 5);
        assert_eq!(deps.last().unwrap().to_string(), "my_pkg==1");

        assert!(!deps.insert(req("My-Pkg==1")));
        assert_eq!(deps.len(), 5);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut deps = Dependencies::parse(SAMPLE);
        assert!(deps.remove(&req("black==23.7.*")));
        assert_eq!(
            deps.lines(),
            vec!["requests==2.31.0", "mypy~=1.4", "pylint>1"]
        );
        assert!(!deps.remove(&req("black==23.7.*")));
        assert!(!deps.remove(&req("requests==2.30.0")));
        assert_eq!(deps.len(), 3);
    }

    #[test]
    fn test_render_has_no_trailing_newline() {
        let deps = Dependencies::parse(SAMPLE);
        assert_eq!(
            deps.render(),
            "requests==2.31.0\nblack==23.7.*\nmypy~=1.4\npylint>1"
        );
        assert_eq!(Dependencies::new().render(), "");
    }

    #[test]
    fn test_iteration_matches_get() {
        let deps = Dependencies::parse(SAMPLE);
        for (idx, entry) in (&deps).into_iter().enumerate() {
            assert_eq!(deps.get(idx), Some(entry));
        }
        assert!(deps.get(deps.len()).is_none());
    }
}
