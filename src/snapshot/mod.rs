//! Snapshot Builder subsystem for curio
//!
//! A snapshot is an immutable, fully derived view of one user's state at a
//! point in ledger history.
//!
//! # Design Principles
//!
//! - Built from an explicit event prefix (a ledger cursor), never live state
//! - Deterministic: the same prefix gives a bit-identical snapshot
//! - Atomic: a snapshot builds completely or fails with a FATAL error
//! - Levels are a monotonic step function of total points

mod builder;
mod checksum;
mod errors;
mod level;
mod model;

pub use builder::SnapshotBuilder;
pub use checksum::{compute_checksum, fingerprint, format_checksum};
pub use errors::{SnapshotError, SnapshotErrorCode, SnapshotResult};
pub use level::{LevelDef, LevelInfo, LevelTable};
pub use model::{AchievementView, CourseView, DashboardSnapshot};
