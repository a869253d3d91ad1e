//! Derived progress values
//!
//! Nothing here is ever stored. Each value is recomputed from the ledger on
//! demand and discarded after use.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::ids::{CourseId, LessonId};

/// Completion state of one course for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedCourseProgress {
    pub course_id: CourseId,
    pub completed_lessons: BTreeSet<LessonId>,
    pub total_lessons: u32,
    /// 0..=100; 100 only when every lesson is completed
    pub percent: u8,
}

impl DerivedCourseProgress {
    pub fn completed_count(&self) -> u32 {
        self.completed_lessons.len() as u32
    }

    /// Returns true if the course has lessons and all are completed
    pub fn is_complete(&self) -> bool {
        self.total_lessons > 0 && self.completed_count() == self.total_lessons
    }
}

/// Lock state of a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonState {
    Locked,
    Unlocked,
    Completed,
}

/// One row of a course's availability table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonStatus {
    pub lesson_id: LessonId,
    pub ordinal: u32,
    pub state: LessonState,
}

/// Lesson states of a course in ordinal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonAvailability {
    pub course_id: CourseId,
    pub lessons: Vec<LessonStatus>,
}

impl LessonAvailability {
    /// State of one lesson, `None` if it is not part of this course
    pub fn state_of(&self, lesson: &LessonId) -> Option<LessonState> {
        self.lessons
            .iter()
            .find(|s| &s.lesson_id == lesson)
            .map(|s| s.state)
    }

    /// The lesson the user can take next
    pub fn next_lesson(&self) -> Option<&LessonId> {
        self.lessons
            .iter()
            .find(|s| s.state == LessonState::Unlocked)
            .map(|s| &s.lesson_id)
    }
}
