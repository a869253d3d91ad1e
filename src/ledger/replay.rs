//! Event replay into a ledger
//!
//! Replays a sequence of events through the normal append path. Unlike a
//! malformed log, a rejected event is not fatal: it is counted and replay
//! continues, exactly as if the events had arrived live.

use std::collections::BTreeMap;

use serde::Serialize;

use super::errors::{LedgerError, LedgerResult};
use super::event::{EventKind, ProgressEvent, SequencedEvent};

/// Statistics from a replay run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Number of events offered to the ledger
    pub events_read: u64,
    /// Number of events accepted
    pub accepted: u64,
    /// Number of events rejected
    pub rejected: u64,
    /// Accepted lesson completions
    pub lessons_completed: u64,
    /// Accepted study day events
    pub study_days_recorded: u64,
    /// Rejections per error code
    pub rejections: BTreeMap<String, u64>,
    /// Sequence number of the last accepted event
    pub final_sequence: u64,
}

impl ReplayStats {
    /// Counts an accepted event.
    fn record_accepted(&mut self, event: &SequencedEvent) {
        self.events_read += 1;
        self.accepted += 1;
        self.final_sequence = event.sequence;
        match event.event.kind {
            EventKind::LessonCompleted => self.lessons_completed += 1,
            EventKind::StudyDayRecorded => self.study_days_recorded += 1,
        }
    }

    /// Counts a rejected event.
    fn record_rejected(&mut self, error: &LedgerError) {
        self.events_read += 1;
        self.rejected += 1;
        *self
            .rejections
            .entry(error.code().code().to_string())
            .or_default() += 1;
    }
}

/// Feeds events to `append` in the given order, counting the outcomes.
pub fn replay_with<I, F>(events: I, mut append: F) -> ReplayStats
where
    I: IntoIterator<Item = ProgressEvent>,
    F: FnMut(ProgressEvent) -> LedgerResult<SequencedEvent>,
{
    let mut stats = ReplayStats::default();
    for event in events {
        match append(event) {
            Ok(sequenced) => stats.record_accepted(&sequenced),
            Err(e) => stats.record_rejected(&e),
        }
    }
    stats
}
