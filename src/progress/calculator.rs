//! Progress Calculator
//!
//! Pure functions from (catalog, user events) to course progress and lesson
//! availability. No I/O and no locking: callers pass an owned event prefix
//! taken from the ledger.
//!
//! Rules:
//! - completed lessons are a set, so repeated completions count once
//! - `percent = round(100 * completed / total)`, 0 for an empty course, and
//!   never 100 unless every lesson is completed
//! - ordinal 0 is at least Unlocked; ordinal k is Unlocked iff k-1 is Completed

use std::collections::BTreeSet;

use crate::catalog::{Catalog, CatalogResult};
use crate::ids::{CourseId, LessonId};
use crate::ledger::SequencedEvent;

use super::types::{DerivedCourseProgress, LessonAvailability, LessonState, LessonStatus};

/// Distinct lessons completed in `events`.
pub fn completed_lessons(events: &[SequencedEvent]) -> BTreeSet<LessonId> {
    events.iter().filter_map(|e| e.event.lesson_id()).collect()
}

/// Rounded completion percentage.
pub fn completion_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    // Half-up rounding in integer arithmetic
    let rounded = (200 * completed + total) / (2 * total);
    if completed < total {
        rounded.min(99) as u8
    } else {
        100
    }
}

/// Computes derived course views for one catalog.
#[derive(Debug, Clone, Copy)]
pub struct ProgressCalculator<'a> {
    catalog: &'a Catalog,
}

impl<'a> ProgressCalculator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Completion of `course_id` given the user's events.
    pub fn compute_course_progress(
        &self,
        events: &[SequencedEvent],
        course_id: &CourseId,
    ) -> CatalogResult<DerivedCourseProgress> {
        self.course_progress_from(&completed_lessons(events), course_id)
    }

    /// Same as [`compute_course_progress`](Self::compute_course_progress) over
    /// an already folded completion set.
    pub fn course_progress_from(
        &self,
        completed: &BTreeSet<LessonId>,
        course_id: &CourseId,
    ) -> CatalogResult<DerivedCourseProgress> {
        let course = self.catalog.get_course(course_id)?;
        let completed_lessons: BTreeSet<LessonId> = course
            .lessons
            .iter()
            .filter(|id| completed.contains(*id))
            .cloned()
            .collect();
        let total_lessons = course.total_lessons() as u32;
        let percent = completion_percent(completed_lessons.len() as u32, total_lessons);

        Ok(DerivedCourseProgress {
            course_id: course_id.clone(),
            completed_lessons,
            total_lessons,
            percent,
        })
    }

    /// Lock state of every lesson of `course_id` given the user's events.
    pub fn compute_lesson_availability(
        &self,
        events: &[SequencedEvent],
        course_id: &CourseId,
    ) -> CatalogResult<LessonAvailability> {
        self.availability_from(&completed_lessons(events), course_id)
    }

    /// Same as [`compute_lesson_availability`](Self::compute_lesson_availability)
    /// over an already folded completion set.
    pub fn availability_from(
        &self,
        completed: &BTreeSet<LessonId>,
        course_id: &CourseId,
    ) -> CatalogResult<LessonAvailability> {
        let lessons = self.catalog.lessons_of(course_id)?;

        let mut previous_completed = true;
        let mut statuses = Vec::with_capacity(lessons.len());
        for lesson in lessons {
            let is_completed = completed.contains(&lesson.id);
            let state = if is_completed {
                LessonState::Completed
            } else if previous_completed {
                LessonState::Unlocked
            } else {
                LessonState::Locked
            };
            statuses.push(LessonStatus {
                lesson_id: lesson.id.clone(),
                ordinal: lesson.ordinal,
                state,
            });
            previous_completed = is_completed;
        }

        Ok(LessonAvailability {
            course_id: course_id.clone(),
            lessons: statuses,
        })
    }

    /// Number of courses with every lesson completed.
    pub fn completed_course_count(&self, completed: &BTreeSet<LessonId>) -> u32 {
        self.catalog
            .courses()
            .filter(|c| !c.lessons.is_empty() && c.lessons.iter().all(|l| completed.contains(l)))
            .count() as u32
    }
}
