//! Snapshot Builder
//!
//! Composes the Progress Calculator and Achievement Evaluator over one event
//! prefix. The builder never reads the ledger itself: the caller passes the
//! events visible at `cursor`, which is what makes a snapshot reproducible.

use chrono::NaiveDate;

use crate::achievements::AchievementEvaluator;
use crate::catalog::Catalog;
use crate::ids::UserId;
use crate::ledger::{LedgerCursor, SequencedEvent};
use crate::progress::{completed_lessons, LessonState, ProgressCalculator};

use super::errors::SnapshotResult;
use super::level::LevelTable;
use super::model::{AchievementView, CourseView, DashboardSnapshot};

/// Builds dashboard snapshots for one catalog and level table.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder<'a> {
    catalog: &'a Catalog,
    levels: &'a LevelTable,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(catalog: &'a Catalog, levels: &'a LevelTable) -> Self {
        Self { catalog, levels }
    }

    /// Builds the snapshot of `user_id` from the events visible at `cursor`.
    pub fn build(
        &self,
        user_id: &UserId,
        events: &[SequencedEvent],
        cursor: LedgerCursor,
        today: Option<NaiveDate>,
    ) -> SnapshotResult<DashboardSnapshot> {
        let calculator = ProgressCalculator::new(self.catalog);
        let completed = completed_lessons(events);

        let mut courses = Vec::with_capacity(self.catalog.course_count());
        for course in self.catalog.courses() {
            let progress = calculator.course_progress_from(&completed, &course.id)?;
            let availability = calculator.availability_from(&completed, &course.id)?;

            let mut remaining_minutes = 0u32;
            for status in &availability.lessons {
                if status.state != LessonState::Completed {
                    let lesson = self.catalog.get_lesson(&status.lesson_id)?;
                    remaining_minutes = remaining_minutes.saturating_add(lesson.duration_minutes);
                }
            }

            courses.push(CourseView {
                course_id: course.id.clone(),
                name: course.name.clone(),
                percent: progress.percent,
                completed_lessons: progress.completed_count(),
                total_lessons: progress.total_lessons,
                next_lesson: availability.next_lesson().cloned(),
                remaining_minutes,
                lessons: availability.lessons,
            });
        }

        let report = AchievementEvaluator::new(self.catalog).evaluate_achievements(events, today)?;

        let mut achievements = Vec::with_capacity(report.states.len());
        for state in &report.states {
            let definition = self.catalog.get_achievement(&state.achievement_id)?;
            achievements.push(AchievementView {
                achievement_id: state.achievement_id.clone(),
                title: definition.title.clone(),
                rarity: state.rarity,
                points: state.points,
                unlocked: state.unlocked,
                unlocked_at: state.unlocked_at,
                progress_numerator: state.progress_numerator,
                progress_denominator: state.progress_denominator,
            });
        }

        let total_points = report.total_points();

        Ok(DashboardSnapshot {
            user_id: user_id.clone(),
            cursor,
            as_of: today,
            courses,
            achievements,
            total_points,
            total_points_available: self.catalog.total_points_available(),
            current_streak: report.streak.current_streak,
            longest_streak: report.streak.longest_streak,
            study_days: report.streak.study_days,
            lessons_completed: report.aggregates.lessons_completed,
            courses_completed: report.aggregates.courses_completed,
            unlocked_count: report.unlocked_count(),
            achievement_count: report.states.len() as u32,
            unlocked_by_rarity: report.unlocked_by_rarity(),
            level: self.levels.level_for(total_points),
        })
    }
}
