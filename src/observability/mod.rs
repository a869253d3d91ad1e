//! Observability subsystem for curio
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Atomic counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No effect on engine results
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use curio::observability::{log_event, Event, MetricsRegistry};
//!
//! log_event(Event::CatalogLoaded, &[("courses", "3")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_events_appended();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a lifecycle event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
