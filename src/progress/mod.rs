//! Progress Calculator subsystem for curio
//!
//! Per-course completion percentage and per-lesson lock state, derived from
//! the catalog and a user's ledger events. Lesson locking is a derived state,
//! never an error.

mod calculator;
mod types;

pub use calculator::{completed_lessons, completion_percent, ProgressCalculator};
pub use types::{DerivedCourseProgress, LessonAvailability, LessonState, LessonStatus};
