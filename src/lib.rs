//! curio - progress and achievement engine for course dashboards
//!
//! An immutable course catalog, an append-only per-user progress ledger, and
//! pure calculators that derive course completion, lesson lock state,
//! streaks, achievement unlocks and points from the ledger. Every value a
//! dashboard shows is derived, never stored.

pub mod achievements;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error_kind;
pub mod identity;
pub mod ids;
pub mod ledger;
pub mod observability;
pub mod progress;
pub mod snapshot;
