//! Progress Ledger subsystem for curio
//!
//! Append-only, per-user ordered log of progress facts.
//!
//! # Design Principles
//!
//! - Append is the only mutation; no update, no delete
//! - Events are validated before they are accepted, never reordered
//! - Appends for one user are serialized, users are independent
//! - Every accepted event carries a global, strictly increasing sequence
//! - Reads at a cursor see a consistent prefix

mod cursor;
mod errors;
mod event;
mod log;
mod reader;
mod replay;

pub use cursor::LedgerCursor;
pub use errors::{LedgerError, LedgerErrorCode, LedgerResult};
pub use event::{EventKind, ProgressEvent, SequencedEvent};
pub use log::Ledger;
pub use reader::EventLogReader;
pub use replay::{replay_with, ReplayStats};
