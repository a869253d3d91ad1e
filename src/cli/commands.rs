//! CLI command implementations
//!
//! Each command follows the same startup sequence:
//! 1. Load and validate the configuration
//! 2. Apply the configured log level
//! 3. Load the catalog and create the engine
//! 4. Do the work and print one JSON object
//!
//! A failure at any step prints an error object and exits non-zero.

use std::path::Path;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::ids::UserId;
use crate::ledger::{EventLogReader, ReplayStats};
use crate::observability::{log_event, Event, Logger};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Parse arguments, run the command and report failures as JSON.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    match run_command(cli.command) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command and return its `data` payload
pub fn run_command(cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::Validate { config } => validate(&config),
        Command::Snapshot {
            config,
            events,
            user,
            today,
        } => {
            let today = today.as_deref().map(parse_day).transpose()?;
            snapshot(&config, &events, &UserId::new(user), today)
        }
        Command::Replay { config, events } => replay(&config, &events),
    }
}

fn parse_day(value: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        CliError::invalid_argument(format!("Invalid --today '{}': {}", value, e))
    })
}

/// Steps 1 to 3 of the startup sequence
fn boot(config_path: &Path) -> CliResult<Engine> {
    let config = EngineConfig::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);
    log_event(
        Event::ConfigLoaded,
        &[
            ("catalog_path", config.catalog_path.display().to_string().as_str()),
            ("path", config_path.display().to_string().as_str()),
        ],
    );
    Ok(Engine::from_config(&config)?)
}

fn replay_log(engine: &Engine, events_path: &Path) -> CliResult<ReplayStats> {
    let events = EventLogReader::open(events_path)?.read_all()?;
    Ok(engine.replay(events))
}

/// Load config and catalog, report what was loaded
pub fn validate(config_path: &Path) -> CliResult<Value> {
    let engine = boot(config_path)?;
    let catalog = engine.catalog();
    let plan = catalog.evaluation_plan();

    Ok(json!({
        "courses": catalog.course_count(),
        "lessons": catalog.lesson_count(),
        "achievements": catalog.achievement_count(),
        "meta_achievements": plan.meta.len(),
        "total_points_available": catalog.total_points_available(),
        "levels": engine.levels().levels().len(),
    }))
}

/// Replay an event log and build one user's snapshot
pub fn snapshot(
    config_path: &Path,
    events_path: &Path,
    user: &UserId,
    today: Option<NaiveDate>,
) -> CliResult<Value> {
    let engine = boot(config_path)?;
    let stats = replay_log(&engine, events_path)?;

    let snapshot = match today {
        Some(day) => engine.snapshot_as_of(user, day)?,
        None => engine.get_snapshot(user)?,
    };
    let fingerprint = snapshot.fingerprint()?;

    Ok(json!({
        "fingerprint": fingerprint,
        "replay": serde_json::to_value(&stats)?,
        "snapshot": serde_json::to_value(&*snapshot)?,
    }))
}

/// Replay an event log and report statistics
pub fn replay(config_path: &Path, events_path: &Path) -> CliResult<Value> {
    let engine = boot(config_path)?;
    let stats = replay_log(&engine, events_path)?;

    Ok(json!({
        "stats": serde_json::to_value(&stats)?,
        "users": engine.ledger().users(),
        "metrics": serde_json::to_value(engine.metrics())?,
    }))
}
