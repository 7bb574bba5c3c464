//! CLI module
//!
//! Command-line interface for the sync utilities.
//!
//! # Commands
//!
//! - `list-devices` - List devices, optionally filtered
//! - `sync-groups` - Move devices into server groups named in a CSV
//! - `sync-tags` - Set owner tags from a CSV
//! - `remove-duplicates` - Delete disconnected duplicate devices

mod commands;
mod runner;

pub use commands::{Cli, Commands, CredentialArgs, FilterArgs};
pub use runner::Runner;
