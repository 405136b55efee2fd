//! Filesystem layer for depman
//!
//! Provides whole-file reads, atomic whole-file writes, the walk that
//! locates a project's dependency file, and slash-normalized paths for
//! display.

pub mod discovery;
pub mod error;
pub mod io;
pub mod path;

pub use discovery::{DiscoveryOptions, find_file};
pub use error::{Error, Result};
pub use path::NormalizedPath;
