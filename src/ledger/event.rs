//! Progress events
//!
//! Events are immutable facts. The JSON form is what the event log reader
//! consumes, one object per line:
//!
//! ```text
//! {"user_id":"alice","kind":"lesson_completed","subject_id":"html-basics","timestamp":"2026-03-01T09:00:00Z"}
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, LessonId, UserId};

use super::cursor::LedgerCursor;

/// Kinds of progress facts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Subject is a lesson id
    LessonCompleted,
    /// Subject is the id of the course studied that day
    StudyDayRecorded,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LessonCompleted => "lesson_completed",
            EventKind::StudyDayRecorded => "study_day_recorded",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single learning fact for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub user_id: UserId,
    pub kind: EventKind,
    pub subject_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    /// Creates a lesson completion event.
    pub fn lesson_completed(
        user_id: impl Into<UserId>,
        lesson_id: impl Into<LessonId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let lesson_id: LessonId = lesson_id.into();
        Self {
            user_id: user_id.into(),
            kind: EventKind::LessonCompleted,
            subject_id: lesson_id.as_str().to_string(),
            timestamp,
        }
    }

    /// Creates a study day event for a course.
    pub fn study_day(
        user_id: impl Into<UserId>,
        course_id: impl Into<CourseId>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let course_id: CourseId = course_id.into();
        Self {
            user_id: user_id.into(),
            kind: EventKind::StudyDayRecorded,
            subject_id: course_id.as_str().to_string(),
            timestamp,
        }
    }

    /// UTC calendar day of the event
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Subject as a lesson id, for completion events
    pub fn lesson_id(&self) -> Option<LessonId> {
        match self.kind {
            EventKind::LessonCompleted => Some(LessonId::new(self.subject_id.as_str())),
            EventKind::StudyDayRecorded => None,
        }
    }

    /// Subject as a course id, for study day events
    pub fn course_id(&self) -> Option<CourseId> {
        match self.kind {
            EventKind::StudyDayRecorded => Some(CourseId::new(self.subject_id.as_str())),
            EventKind::LessonCompleted => None,
        }
    }
}

/// An accepted event together with its global sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencedEvent {
    pub sequence: u64,
    #[serde(flatten)]
    pub event: ProgressEvent,
}

impl SequencedEvent {
    /// Cursor position just after this event
    pub fn cursor(&self) -> LedgerCursor {
        LedgerCursor::new(self.sequence)
    }
}
