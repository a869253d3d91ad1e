//! Achievement Evaluator subsystem for curio
//!
//! Streaks, ledger aggregates and the two-pass unlock evaluation.
//!
//! # Design Principles
//!
//! - Everything is recomputed from the full event history
//! - Unlocks are monotonic under ledger extension
//! - Meta achievements are evaluated after plain ones, never recursively
//! - Points are derived from unlock state, never stored

mod aggregates;
mod evaluator;
mod streak;

pub use aggregates::{AggregateTracker, Aggregates};
pub use evaluator::{AchievementEvaluator, AchievementReport, DerivedAchievementState};
pub use streak::{compute_streak, study_days, StreakStats, StreakTracker};
