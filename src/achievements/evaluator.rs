//! Achievement Evaluator
//!
//! Replays a user's events in ledger order. After each event the aggregates
//! are updated and every still-locked achievement is checked once, following
//! the catalog's evaluation plan:
//!
//! 1. plain rules, in id order
//! 2. meta rules, prerequisites before dependents
//!
//! An achievement unlocks at the timestamp of the event after which its
//! predicate first holds and is never re-locked. `achievements_unlocked`
//! counts every achievement unlocked so far. The plan puts each counter after
//! everything that can unlock before it, and a counter is only evaluated while
//! locked, so it never counts itself.
//!
//! Evaluation is a pure fold: the same events always give the same states.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::catalog::{Catalog, CatalogResult, Rarity, UnlockRule};
use crate::ids::AchievementId;
use crate::ledger::SequencedEvent;

use super::aggregates::{AggregateTracker, Aggregates};
use super::streak::{compute_streak, StreakStats};

/// Unlock state of one achievement for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedAchievementState {
    pub achievement_id: AchievementId,
    pub rarity: Rarity,
    pub points: u32,
    pub unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub progress_numerator: u32,
    pub progress_denominator: u32,
}

/// Full evaluation result for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementReport {
    /// One entry per catalog achievement, in id order
    pub states: Vec<DerivedAchievementState>,
    pub aggregates: Aggregates,
    pub streak: StreakStats,
}

impl AchievementReport {
    /// Sum of points of unlocked achievements
    pub fn total_points(&self) -> u64 {
        self.states
            .iter()
            .filter(|s| s.unlocked)
            .map(|s| s.points as u64)
            .sum()
    }

    pub fn unlocked_count(&self) -> u32 {
        self.states.iter().filter(|s| s.unlocked).count() as u32
    }

    /// Unlocked achievements per rarity tier, every tier present
    pub fn unlocked_by_rarity(&self) -> BTreeMap<Rarity, u32> {
        let mut counts: BTreeMap<Rarity, u32> = Rarity::ALL.iter().map(|r| (*r, 0)).collect();
        for state in self.states.iter().filter(|s| s.unlocked) {
            *counts.entry(state.rarity).or_default() += 1;
        }
        counts
    }

    pub fn state_of(&self, id: &AchievementId) -> Option<&DerivedAchievementState> {
        self.states.iter().find(|s| &s.achievement_id == id)
    }
}

/// Evaluates achievements for one catalog.
#[derive(Debug, Clone, Copy)]
pub struct AchievementEvaluator<'a> {
    catalog: &'a Catalog,
}

/// Unlock bookkeeping during a fold
#[derive(Default)]
struct Unlocks {
    at: BTreeMap<AchievementId, DateTime<Utc>>,
}

impl Unlocks {
    fn count(&self) -> u32 {
        self.at.len() as u32
    }
}

impl<'a> AchievementEvaluator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Evaluates every achievement against the user's events.
    ///
    /// `today` only affects the reported current streak, never unlocks.
    pub fn evaluate_achievements(
        &self,
        events: &[SequencedEvent],
        today: Option<NaiveDate>,
    ) -> CatalogResult<AchievementReport> {
        let mut tracker = AggregateTracker::new(self.catalog);
        let mut unlocks = Unlocks::default();

        for sequenced in events {
            tracker.apply(&sequenced.event);
            self.unlock_pass(&tracker, &mut unlocks, sequenced.event.timestamp)?;
        }

        let aggregates = tracker.snapshot();
        let streak = compute_streak(tracker.study_days(), today);

        let mut states = Vec::with_capacity(self.catalog.achievement_count());
        for achievement in self.catalog.list_achievements() {
            let unlocked_at = unlocks.at.get(&achievement.id).copied();
            let denominator = self.denominator(&achievement.rule)?;
            let numerator = if unlocked_at.is_some() {
                denominator
            } else {
                self.numerator(&achievement.rule, &tracker, &streak, &unlocks)?
                    .min(denominator)
            };
            states.push(DerivedAchievementState {
                achievement_id: achievement.id.clone(),
                rarity: achievement.rarity,
                points: achievement.points,
                unlocked: unlocked_at.is_some(),
                unlocked_at,
                progress_numerator: numerator,
                progress_denominator: denominator,
            });
        }

        Ok(AchievementReport {
            states,
            aggregates,
            streak,
        })
    }

    /// One fixed two-pass sweep over still-locked achievements.
    fn unlock_pass(
        &self,
        tracker: &AggregateTracker<'_>,
        unlocks: &mut Unlocks,
        timestamp: DateTime<Utc>,
    ) -> CatalogResult<()> {
        let aggregates = tracker.snapshot();
        let plan = self.catalog.evaluation_plan();

        for id in &plan.plain {
            if unlocks.at.contains_key(id) {
                continue;
            }
            let achievement = self.catalog.get_achievement(id)?;
            if self.plain_satisfied(&achievement.rule, &aggregates, tracker) {
                unlocks.at.insert(id.clone(), timestamp);
            }
        }

        for id in &plan.meta {
            if unlocks.at.contains_key(id) {
                continue;
            }
            let achievement = self.catalog.get_achievement(id)?;
            let satisfied = match &achievement.rule {
                UnlockRule::AchievementsUnlocked { at_least } => unlocks.count() >= *at_least,
                UnlockRule::Requires { achievements } => {
                    achievements.iter().all(|p| unlocks.at.contains_key(p))
                }
                _ => false,
            };
            if satisfied {
                unlocks.at.insert(id.clone(), timestamp);
            }
        }

        Ok(())
    }

    fn plain_satisfied(
        &self,
        rule: &UnlockRule,
        aggregates: &Aggregates,
        tracker: &AggregateTracker<'_>,
    ) -> bool {
        match rule {
            UnlockRule::LessonsCompleted { at_least } => aggregates.lessons_completed >= *at_least,
            UnlockRule::StreakDays { at_least } => aggregates.current_streak >= *at_least,
            UnlockRule::CoursesCompleted { at_least } => aggregates.courses_completed >= *at_least,
            UnlockRule::CourseCompleted { course } => tracker.is_course_complete(course),
            UnlockRule::StudyDays { at_least } => aggregates.study_days >= *at_least,
            UnlockRule::AchievementsUnlocked { .. } | UnlockRule::Requires { .. } => false,
        }
    }

    fn denominator(&self, rule: &UnlockRule) -> CatalogResult<u32> {
        Ok(match rule {
            UnlockRule::CourseCompleted { course } => {
                self.catalog.get_course(course)?.total_lessons() as u32
            }
            UnlockRule::Requires { achievements } => achievements.len() as u32,
            other => other.threshold().unwrap_or(0),
        })
    }

    fn numerator(
        &self,
        rule: &UnlockRule,
        tracker: &AggregateTracker<'_>,
        streak: &StreakStats,
        unlocks: &Unlocks,
    ) -> CatalogResult<u32> {
        let aggregates = tracker.snapshot();
        Ok(match rule {
            UnlockRule::LessonsCompleted { .. } => aggregates.lessons_completed,
            UnlockRule::StreakDays { .. } => streak.current_streak,
            UnlockRule::CoursesCompleted { .. } => aggregates.courses_completed,
            UnlockRule::CourseCompleted { course } => {
                let course = self.catalog.get_course(course)?;
                course
                    .lessons
                    .iter()
                    .filter(|l| tracker.completed_lessons().contains(*l))
                    .count() as u32
            }
            UnlockRule::StudyDays { .. } => aggregates.study_days,
            UnlockRule::AchievementsUnlocked { .. } => unlocks.count(),
            UnlockRule::Requires { achievements } => achievements
                .iter()
                .filter(|p| unlocks.at.contains_key(*p))
                .count() as u32,
        })
    }
}
