//! Dependency management for `requirements.txt` style files
//!
//! This crate provides:
//! - [`Requirement`] parsing and canonical rendering
//! - [`Dependencies`], an ordered duplicate-free requirement list
//! - [`DependencyManager`], which finds, loads, edits and writes a
//!   project's dependency file
//! - [`Registry`], which keeps one manager per [`ManagerKind`]
//!
//! # Example
//!
//! ```no_run
//! use depman_core::{ManagerKind, StrategyError};
//! use std::path::PathBuf;
//!
//! struct Project;
//!
//! impl ManagerKind for Project {
//!     fn parent_dir(&self) -> Result<PathBuf, StrategyError> {
//!         Ok(std::env::current_dir()?)
//!     }
//! }
//!
//! let handle = Project.instance()?;
//! let mut manager = handle.lock()?;
//! manager.add(["requests==2.31.0"])?;
//! manager.write(false)?;
//! # Ok::<(), depman_core::Error>(())
//! ```

pub mod config;
pub mod dependencies;
pub mod error;
pub mod manager;
pub mod registry;
pub mod requirement;

pub use config::{CONFIG_FILENAME, DEFAULT_FILE_NAME, ManagerConfig};
pub use dependencies::Dependencies;
pub use error::{Error, Result, StrategyError};
pub use manager::{DependencyManager, ManagerKind};
pub use registry::{ManagerHandle, Registry};
pub use requirement::{Operator, ParseError, Requirement, Specifier, canonicalize_name};
