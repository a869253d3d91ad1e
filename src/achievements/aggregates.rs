//! Ledger-derived aggregates
//!
//! Unlock predicates only ever see these numbers. The tracker folds one event
//! at a time so the evaluator can check predicates after each event and
//! timestamp unlocks with the event that caused them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::ids::{CourseId, LessonId};
use crate::ledger::{EventKind, ProgressEvent};

use super::streak::StreakTracker;

/// Point-in-time aggregate values for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub lessons_completed: u32,
    pub courses_completed: u32,
    pub study_days: u32,
    /// Streak ending at the latest study day seen
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Folds events into aggregates.
#[derive(Debug, Clone)]
pub struct AggregateTracker<'a> {
    catalog: &'a Catalog,
    completed_lessons: BTreeSet<LessonId>,
    completed_courses: BTreeSet<CourseId>,
    study_days: BTreeSet<NaiveDate>,
    streak: StreakTracker,
}

impl<'a> AggregateTracker<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            completed_lessons: BTreeSet::new(),
            completed_courses: BTreeSet::new(),
            study_days: BTreeSet::new(),
            streak: StreakTracker::new(),
        }
    }

    /// Applies one event. Events must arrive in ledger order.
    pub fn apply(&mut self, event: &ProgressEvent) {
        match event.kind {
            EventKind::LessonCompleted => {
                let lesson_id = LessonId::new(event.subject_id.as_str());
                let course_id = self
                    .catalog
                    .get_lesson(&lesson_id)
                    .ok()
                    .map(|lesson| lesson.course_id.clone());
                if self.completed_lessons.insert(lesson_id) {
                    if let Some(course_id) = course_id {
                        self.refresh_course(course_id);
                    }
                }
            }
            EventKind::StudyDayRecorded => {
                let day = event.day();
                self.study_days.insert(day);
                self.streak.record(day);
            }
        }
    }

    fn refresh_course(&mut self, course_id: CourseId) {
        let complete = match self.catalog.get_course(&course_id) {
            Ok(course) => {
                !course.lessons.is_empty()
                    && course
                        .lessons
                        .iter()
                        .all(|l| self.completed_lessons.contains(l))
            }
            Err(_) => false,
        };
        if complete {
            self.completed_courses.insert(course_id);
        }
    }

    /// Current aggregate values
    pub fn snapshot(&self) -> Aggregates {
        Aggregates {
            lessons_completed: self.completed_lessons.len() as u32,
            courses_completed: self.completed_courses.len() as u32,
            study_days: self.study_days.len() as u32,
            current_streak: self.streak.current(),
            longest_streak: self.streak.longest(),
        }
    }

    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    pub fn is_course_complete(&self, course_id: &CourseId) -> bool {
        self.completed_courses.contains(course_id)
    }

    pub fn study_days(&self) -> &BTreeSet<NaiveDate> {
        &self.study_days
    }
}
