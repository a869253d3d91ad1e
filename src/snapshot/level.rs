//! Level table
//!
//! A level is a monotonic step function of total points: the highest level
//! whose `points_required` does not exceed the points earned. Tables must
//! start at 0 points and be strictly increasing in both level and points.

use serde::{Deserialize, Serialize};

use super::errors::{SnapshotError, SnapshotResult};

/// Level definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
    pub level: u32,
    pub points_required: u64,
    pub title: String,
}

impl LevelDef {
    pub fn new(level: u32, points_required: u64, title: impl Into<String>) -> Self {
        Self {
            level,
            points_required,
            title: title.into(),
        }
    }
}

/// Level reached for a given point total
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub level: u32,
    pub title: String,
    pub points: u64,
    /// Points required for the current level
    pub current_level_points: u64,
    /// Points required for the next level (None at max level)
    pub next_level_points: Option<u64>,
    pub points_to_next: Option<u64>,
    /// Progress through the current level, 0..=100
    pub progress_percent: u8,
}

/// Validated, ordered level thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelTable {
    levels: Vec<LevelDef>,
}

impl LevelTable {
    /// Validates and wraps a list of level definitions.
    pub fn new(levels: Vec<LevelDef>) -> SnapshotResult<Self> {
        let first = levels
            .first()
            .ok_or_else(|| SnapshotError::invalid_level_table("Level table is empty"))?;
        if first.points_required != 0 {
            return Err(SnapshotError::invalid_level_table(format!(
                "First level must require 0 points, found {}",
                first.points_required
            )));
        }

        for pair in levels.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.level <= prev.level || next.points_required <= prev.points_required {
                return Err(SnapshotError::invalid_level_table(
                    "Levels must be strictly increasing in level and points",
                )
                .with_details(format!("level {} after level {}", next.level, prev.level)));
            }
        }

        Ok(Self { levels })
    }

    /// Built-in table used when configuration does not provide one
    pub fn default_table() -> Self {
        Self {
            levels: vec![
                LevelDef::new(1, 0, "Newcomer"),
                LevelDef::new(2, 100, "Learner"),
                LevelDef::new(3, 300, "Explorer"),
                LevelDef::new(4, 600, "Apprentice"),
                LevelDef::new(5, 1000, "Scholar"),
                LevelDef::new(6, 1500, "Achiever"),
                LevelDef::new(7, 2200, "Expert"),
                LevelDef::new(8, 3000, "Master"),
                LevelDef::new(9, 4000, "Sage"),
                LevelDef::new(10, 5500, "Legend"),
            ],
        }
    }

    pub fn levels(&self) -> &[LevelDef] {
        &self.levels
    }

    pub fn max_level(&self) -> u32 {
        self.levels.last().map(|l| l.level).unwrap_or(1)
    }

    /// Level reached with `points`.
    pub fn level_for(&self, points: u64) -> LevelInfo {
        // The table is non-empty and starts at 0, so index 0 always matches
        let index = self
            .levels
            .iter()
            .rposition(|l| points >= l.points_required)
            .unwrap_or(0);
        let current = &self.levels[index];
        let next = self.levels.get(index + 1);

        let progress_percent = match next {
            Some(next) => {
                let span = next.points_required - current.points_required;
                let earned = points.saturating_sub(current.points_required);
                ((earned * 100) / span).min(100) as u8
            }
            None => 100,
        };

        LevelInfo {
            level: current.level,
            title: current.title.clone(),
            points,
            current_level_points: current.points_required,
            next_level_points: next.map(|l| l.points_required),
            points_to_next: next.map(|l| l.points_required - points),
            progress_percent,
        }
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::default_table()
    }
}
