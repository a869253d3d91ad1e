//! Read-only catalog store
//!
//! A `Catalog` can only be produced by [`CatalogLoader::build`], which runs the
//! integrity validator first. Every value handed out here has therefore
//! already passed validation; lookups of unknown identifiers fail with a
//! NOT FOUND error that callers treat as an integrity failure.
//!
//! [`CatalogLoader::build`]: super::CatalogLoader::build

use std::collections::BTreeMap;

use crate::ids::{AchievementId, CourseId, LessonId};

use super::errors::{CatalogError, CatalogResult};
use super::types::{Achievement, Course, Lesson};
use super::validator::EvaluationPlan;

/// Immutable course, lesson and achievement definitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: BTreeMap<CourseId, Course>,
    lessons: BTreeMap<LessonId, Lesson>,
    achievements: BTreeMap<AchievementId, Achievement>,
    plan: EvaluationPlan,
}

impl Catalog {
    pub(super) fn from_parts(
        courses: BTreeMap<CourseId, Course>,
        lessons: BTreeMap<LessonId, Lesson>,
        achievements: BTreeMap<AchievementId, Achievement>,
        plan: EvaluationPlan,
    ) -> Self {
        Self {
            courses,
            lessons,
            achievements,
            plan,
        }
    }

    /// Gets a course by id.
    pub fn get_course(&self, id: &CourseId) -> CatalogResult<&Course> {
        self.courses
            .get(id)
            .ok_or_else(|| CatalogError::unknown_course(id))
    }

    /// Gets the lessons of a course in ordinal order.
    pub fn lessons_of(&self, course_id: &CourseId) -> CatalogResult<Vec<&Lesson>> {
        let course = self.get_course(course_id)?;
        course
            .lessons
            .iter()
            .map(|id| self.get_lesson(id))
            .collect()
    }

    /// Gets a lesson by id.
    pub fn get_lesson(&self, id: &LessonId) -> CatalogResult<&Lesson> {
        self.lessons
            .get(id)
            .ok_or_else(|| CatalogError::unknown_lesson(id))
    }

    /// Gets an achievement by id.
    pub fn get_achievement(&self, id: &AchievementId) -> CatalogResult<&Achievement> {
        self.achievements
            .get(id)
            .ok_or_else(|| CatalogError::unknown_achievement(id))
    }

    /// Returns all achievements in id order.
    pub fn list_achievements(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.values()
    }

    /// Returns all courses in id order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Checks if a course exists.
    pub fn contains_course(&self, id: &CourseId) -> bool {
        self.courses.contains_key(id)
    }

    /// Returns the lesson that must be completed before `id` can be, or
    /// `None` for the first lesson of a course.
    pub fn predecessor_of(&self, id: &LessonId) -> CatalogResult<Option<&LessonId>> {
        let lesson = self.get_lesson(id)?;
        if lesson.ordinal == 0 {
            return Ok(None);
        }
        let course = self.get_course(&lesson.course_id)?;
        Ok(course.lessons.get(lesson.ordinal as usize - 1))
    }

    /// Returns the fixed order in which achievements are evaluated.
    pub fn evaluation_plan(&self) -> &EvaluationPlan {
        &self.plan
    }

    /// Returns the number of courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Returns the number of lessons across all courses.
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// Returns the number of achievements.
    pub fn achievement_count(&self) -> usize {
        self.achievements.len()
    }

    /// Sum of points over every achievement in the catalog.
    pub fn total_points_available(&self) -> u64 {
        self.achievements.values().map(|a| a.points as u64).sum()
    }
}
