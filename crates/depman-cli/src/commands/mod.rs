//! Command implementations for depman-cli

pub mod edit;
pub mod list;

pub use edit::{run_add, run_remove};
pub use list::run_list;
