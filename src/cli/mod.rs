//! CLI module
//!
//! - serve: open the service and run the HTTP server
//! - backup: one-shot table backup
//! - restore: one-shot read-back of the newest backup
//! - tables: print the registry

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{backup, restore, run, run_command, serve, tables};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
