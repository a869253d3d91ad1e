//! Catalog type definitions
//!
//! Two layers:
//! - document types (`CatalogDocument`, `CourseDef`, `LessonDef`) mirror the
//!   JSON configuration files
//! - resolved types (`Course`, `Lesson`, `Achievement`) are what the store
//!   serves once the document has been validated
//!
//! Presentation-only data (icons, colors, images) is deliberately absent.

use serde::{Deserialize, Serialize};

use crate::ids::{AchievementId, CourseId, LessonId};

/// Achievement rarity tiers, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers in ascending order
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    /// Returns the lowercase name used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// Unlock predicate over ledger-derived aggregates.
///
/// `AchievementsUnlocked` and `Requires` are meta rules: they look at the
/// unlock state of other achievements and are evaluated after every plain
/// rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnlockRule {
    /// Distinct lessons completed across all courses
    LessonsCompleted { at_least: u32 },
    /// Consecutive study days ending at the latest study day
    StreakDays { at_least: u32 },
    /// Courses at 100% completion
    CoursesCompleted { at_least: u32 },
    /// One specific course at 100% completion
    CourseCompleted { course: CourseId },
    /// Distinct calendar days with a recorded study session
    StudyDays { at_least: u32 },
    /// Unlocked non-meta achievements
    AchievementsUnlocked { at_least: u32 },
    /// Every listed achievement unlocked
    Requires { achievements: Vec<AchievementId> },
}

impl UnlockRule {
    /// Returns true for rules that depend on other achievements
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            UnlockRule::AchievementsUnlocked { .. } | UnlockRule::Requires { .. }
        )
    }

    /// Achievements this rule explicitly depends on
    pub fn prerequisites(&self) -> &[AchievementId] {
        match self {
            UnlockRule::Requires { achievements } => achievements,
            _ => &[],
        }
    }

    /// Numeric threshold for counting rules
    pub fn threshold(&self) -> Option<u32> {
        match self {
            UnlockRule::LessonsCompleted { at_least }
            | UnlockRule::StreakDays { at_least }
            | UnlockRule::CoursesCompleted { at_least }
            | UnlockRule::StudyDays { at_least }
            | UnlockRule::AchievementsUnlocked { at_least } => Some(*at_least),
            UnlockRule::CourseCompleted { .. } | UnlockRule::Requires { .. } => None,
        }
    }
}

/// Achievement definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rarity: Rarity,
    /// Points awarded once unlocked
    pub points: u32,
    pub rule: UnlockRule,
}

/// Display metadata carried through to presentation untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// A published course with its lessons in ordinal order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    /// Lesson ids sorted by ordinal
    pub lessons: Vec<LessonId>,
    pub metadata: CourseMetadata,
}

impl Course {
    /// Number of lessons in the course
    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }
}

/// A lesson, positioned within exactly one course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub course_id: CourseId,
    /// Zero-based position within the course
    pub ordinal: u32,
    pub title: String,
    pub duration_minutes: u32,
}

// Document layer

/// Lesson as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDef {
    pub id: LessonId,
    pub title: String,
    /// Defaults to the lesson's position in the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    #[serde(default)]
    pub duration_minutes: u32,
}

/// Course as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDef {
    pub id: CourseId,
    pub name: String,
    #[serde(flatten)]
    pub metadata: CourseMetadata,
    #[serde(default)]
    pub lessons: Vec<LessonDef>,
}

/// One catalog configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub courses: Vec<CourseDef>,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}
