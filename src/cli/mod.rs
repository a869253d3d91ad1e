//! CLI module for curio
//!
//! Provides command-line interface for:
//! - validate: Load configuration and catalog
//! - snapshot: Replay an event log and print a dashboard snapshot
//! - replay: Replay an event log and print statistics

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{replay, run, run_command, snapshot, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, ok_envelope, write_error, write_response};
