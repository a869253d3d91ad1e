//! Engine Facade subsystem for curio
//!
//! Owns the catalog, the ledger and the snapshot cache, and exposes the two
//! operations the presentation layer needs: record an event, read a snapshot.
//!
//! # Design Principles
//!
//! - One engine per catalog; the catalog never changes while it runs
//! - Every read is computed at a ledger cursor
//! - Cached snapshots are bit-identical to freshly built ones
//! - Safe to share across threads (`Engine: Send + Sync`)

mod cache;
mod errors;
mod facade;

pub use cache::{CacheSwap, SnapshotCache};
pub use errors::{EngineError, EngineResult};
pub use facade::{load_catalog, Engine};
