//! Dashboard snapshot view model
//!
//! Read-only, fully derived. Every collection is a `Vec` in catalog order or
//! a `BTreeMap`, so serialization is byte-stable.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::catalog::Rarity;
use crate::ids::{AchievementId, CourseId, LessonId, UserId};
use crate::ledger::LedgerCursor;
use crate::progress::LessonStatus;

use super::checksum::fingerprint;
use super::errors::SnapshotResult;
use super::level::LevelInfo;

/// One course as seen by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseView {
    pub course_id: CourseId,
    pub name: String,
    pub percent: u8,
    pub completed_lessons: u32,
    pub total_lessons: u32,
    /// First unlocked, not yet completed lesson
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_lesson: Option<LessonId>,
    /// Duration of lessons not yet completed
    pub remaining_minutes: u32,
    /// Lesson availability in ordinal order
    pub lessons: Vec<LessonStatus>,
}

/// One achievement as seen by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementView {
    pub achievement_id: AchievementId,
    pub title: String,
    pub rarity: Rarity,
    pub points: u32,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub progress_numerator: u32,
    pub progress_denominator: u32,
}

/// Everything the dashboard renders for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub user_id: UserId,
    /// Ledger prefix this snapshot was computed from
    pub cursor: LedgerCursor,
    /// Day used for the current streak, if the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub courses: Vec<CourseView>,
    pub achievements: Vec<AchievementView>,
    pub total_points: u64,
    pub total_points_available: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub study_days: u32,
    pub lessons_completed: u32,
    pub courses_completed: u32,
    pub unlocked_count: u32,
    pub achievement_count: u32,
    pub unlocked_by_rarity: BTreeMap<Rarity, u32>,
    pub level: LevelInfo,
}

impl DashboardSnapshot {
    /// Deterministic `crc32:xxxxxxxx` fingerprint of the snapshot.
    pub fn fingerprint(&self) -> SnapshotResult<String> {
        fingerprint(self)
    }

    pub fn course(&self, id: &CourseId) -> Option<&CourseView> {
        self.courses.iter().find(|c| &c.course_id == id)
    }

    pub fn achievement(&self, id: &AchievementId) -> Option<&AchievementView> {
        self.achievements.iter().find(|a| &a.achievement_id == id)
    }
}
