//! LedgerCursor - consistent prefix boundary
//!
//! A cursor is a single sequence number. Reads made at a cursor see every
//! event with `sequence <= cursor` and nothing after it, no matter how many
//! appends happen concurrently.
//!
//! Pure value type. The ledger hands cursors out; nothing else creates them
//! except tests and replay tooling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Read upper bound over the global event sequence
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerCursor(u64);

impl LedgerCursor {
    /// Cursor before any event
    pub const ORIGIN: LedgerCursor = LedgerCursor(0);

    #[inline]
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Highest visible sequence number
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns true if an event with this sequence is visible at the cursor
    #[inline]
    pub fn covers(&self, sequence: u64) -> bool {
        sequence <= self.0
    }
}

impl fmt::Display for LedgerCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq:{}", self.0)
    }
}
