//! CLI argument definitions using clap
//!
//! Commands:
//! - curio validate --config <path>
//! - curio snapshot --config <path> --events <log> --user <id> [--today <date>]
//! - curio replay --config <path> --events <log>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// curio - progress and achievement engine for course dashboards
#[derive(Parser, Debug)]
#[command(name = "curio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the configuration and catalog and report what was loaded
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./curio.json")]
        config: PathBuf,
    },

    /// Replay an event log and print one user's dashboard snapshot
    Snapshot {
        /// Path to configuration file
        #[arg(long, default_value = "./curio.json")]
        config: PathBuf,

        /// JSON-lines event log
        #[arg(long)]
        events: PathBuf,

        /// User whose snapshot is printed
        #[arg(long)]
        user: String,

        /// Day the current streak is evaluated on (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },

    /// Replay an event log and print replay statistics
    Replay {
        /// Path to configuration file
        #[arg(long, default_value = "./curio.json")]
        config: PathBuf,

        /// JSON-lines event log
        #[arg(long)]
        events: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_args() {
        let cli = Cli::parse_from([
            "curio", "snapshot", "--events", "events.jsonl", "--user", "alice", "--today", "2026-03-01",
        ]);
        match cli.command {
            Command::Snapshot { config, events, user, today } => {
                assert_eq!(config, PathBuf::from("./curio.json"));
                assert_eq!(events, PathBuf::from("events.jsonl"));
                assert_eq!(user, "alice");
                assert_eq!(today.as_deref(), Some("2026-03-01"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_events_required() {
        assert!(Cli::try_parse_from(["curio", "replay"]).is_err());
    }
}
