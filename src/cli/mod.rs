//! CLI module
//!
//! Command-line interface for building sites.
//!
//! # Commands
//!
//! - `build` - Fetch content and emit every page record
//! - `validate` - Check a site definition
//! - `queries` - Print the GraphQL documents a build issues
//! - `routes` - Preview the archive paths of a collection

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
