//! Observable engine events
//!
//! Events are explicit and typed. Each maps to one uppercase log event name.

use std::fmt;

use super::logger::Severity;

/// Observable events in curio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Catalog built and validated
    CatalogLoaded,
    /// Catalog failed to load or validate (FATAL)
    CatalogRejected,
    /// Engine ready
    EngineReady,

    // Ledger
    /// Event accepted into the ledger
    EventAppended,
    /// Event rejected at append
    EventRejected,
    /// Event log replay begins
    ReplayBegin,
    /// Event log replay complete
    ReplayComplete,

    // Derived state
    /// Snapshot computed
    SnapshotBuilt,
    /// Snapshot served from cache
    SnapshotCacheHit,
    /// Snapshot could not be computed (FATAL)
    SnapshotFailed,
    /// Achievement newly unlocked for a user
    AchievementUnlocked,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
            Event::CatalogRejected => "CATALOG_REJECTED",
            Event::EngineReady => "ENGINE_READY",
            Event::EventAppended => "EVENT_APPENDED",
            Event::EventRejected => "EVENT_REJECTED",
            Event::ReplayBegin => "REPLAY_BEGIN",
            Event::ReplayComplete => "REPLAY_COMPLETE",
            Event::SnapshotBuilt => "SNAPSHOT_BUILT",
            Event::SnapshotCacheHit => "SNAPSHOT_CACHE_HIT",
            Event::SnapshotFailed => "SNAPSHOT_FAILED",
            Event::AchievementUnlocked => "ACHIEVEMENT_UNLOCKED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::CatalogRejected | Event::SnapshotFailed)
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::CatalogRejected | Event::SnapshotFailed => Severity::Fatal,
            Event::EventRejected => Severity::Warn,
            Event::EventAppended | Event::SnapshotCacheHit => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::CatalogLoaded,
            Event::CatalogRejected,
            Event::EngineReady,
            Event::EventAppended,
            Event::EventRejected,
            Event::ReplayBegin,
            Event::ReplayComplete,
            Event::SnapshotBuilt,
            Event::SnapshotCacheHit,
            Event::SnapshotFailed,
            Event::AchievementUnlocked,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_fatal_events() {
        assert!(Event::CatalogRejected.is_fatal());
        assert!(Event::SnapshotFailed.is_fatal());
        assert!(!Event::EventRejected.is_fatal());
        assert_eq!(Event::SnapshotFailed.severity(), Severity::Fatal);
    }
}
