//! Engine facade
//!
//! The presentation boundary: `record_event` in, `get_snapshot` out. Every
//! other operation is a narrower read of the same derived state.
//!
//! Reads are taken at a ledger cursor. The facade reads the user's events
//! visible at that cursor once and hands the owned slice to the pure
//! calculators, so concurrent appends never tear a result.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::achievements::{
    compute_streak, study_days, AchievementEvaluator, AchievementReport, StreakStats,
};
use crate::catalog::{Catalog, CatalogLoader};
use crate::config::EngineConfig;
use crate::ids::{AchievementId, CourseId, UserId};
use crate::ledger::{
    replay_with, Ledger, LedgerCursor, LedgerError, LedgerResult, ProgressEvent, ReplayStats,
    SequencedEvent,
};
use crate::observability::{log_event, Event, MetricsRegistry, MetricsSnapshot};
use crate::progress::{DerivedCourseProgress, LessonAvailability, ProgressCalculator};
use crate::snapshot::{DashboardSnapshot, LevelTable, SnapshotBuilder};

use super::cache::{CacheSwap, SnapshotCache};
use super::errors::EngineResult;

/// Progress & achievement engine for one catalog
#[derive(Debug)]
pub struct Engine {
    catalog: Arc<Catalog>,
    ledger: Ledger,
    levels: LevelTable,
    cache: Option<SnapshotCache>,
    metrics: MetricsRegistry,
}

impl Engine {
    /// Creates an engine with the built-in level table and caching enabled.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::assemble(catalog, LevelTable::default_table(), true)
    }

    /// Creates an engine over an already built catalog.
    pub fn new(catalog: Catalog, config: &EngineConfig) -> EngineResult<Self> {
        let levels = config.level_table()?;
        Ok(Self::assemble(catalog, levels, config.snapshot_cache))
    }

    /// Loads the configured catalog and creates the engine.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let catalog = load_catalog(&config.catalog_path)?;
        Self::new(catalog, config)
    }

    fn assemble(catalog: Catalog, levels: LevelTable, cache: bool) -> Self {
        let catalog = Arc::new(catalog);
        let engine = Self {
            ledger: Ledger::new(Arc::clone(&catalog)),
            catalog,
            levels,
            cache: cache.then(SnapshotCache::new),
            metrics: MetricsRegistry::new(),
        };
        log_event(
            Event::EngineReady,
            &[("snapshot_cache", if engine.cache.is_some() { "true" } else { "false" })],
        );
        engine
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    /// Current counter values
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Records an event on behalf of `user`.
    ///
    /// Rejected events leave the ledger unchanged.
    pub fn record_event(&self, user: &UserId, event: ProgressEvent) -> EngineResult<SequencedEvent> {
        Ok(self.append(user, event)?)
    }

    fn append(&self, user: &UserId, event: ProgressEvent) -> LedgerResult<SequencedEvent> {
        let result = if &event.user_id != user {
            Err(LedgerError::user_mismatch(user.as_str(), event.user_id.as_str()))
        } else {
            self.ledger.append(event)
        };

        match result {
            Ok(sequenced) => {
                self.metrics.increment_events_appended();
                let sequence = sequenced.sequence.to_string();
                log_event(
                    Event::EventAppended,
                    &[
                        ("kind", sequenced.event.kind.as_str()),
                        ("sequence", sequence.as_str()),
                        ("subject", sequenced.event.subject_id.as_str()),
                        ("user", user.as_str()),
                    ],
                );
                Ok(sequenced)
            }
            Err(e) => {
                self.metrics.increment_events_rejected();
                log_event(
                    Event::EventRejected,
                    &[("code", e.code().code()), ("message", e.message()), ("user", user.as_str())],
                );
                Err(e)
            }
        }
    }

    /// Records a sequence of events in order, counting rejections.
    pub fn replay<I>(&self, events: I) -> ReplayStats
    where
        I: IntoIterator<Item = ProgressEvent>,
    {
        log_event(Event::ReplayBegin, &[]);
        let stats = replay_with(events, |event| {
            let user = event.user_id.clone();
            self.append(&user, event)
        });
        let accepted = stats.accepted.to_string();
        let rejected = stats.rejected.to_string();
        log_event(
            Event::ReplayComplete,
            &[("accepted", accepted.as_str()), ("rejected", rejected.as_str())],
        );
        stats
    }

    /// Snapshot of everything the ledger holds for `user` right now.
    pub fn get_snapshot(&self, user: &UserId) -> EngineResult<Arc<DashboardSnapshot>> {
        self.snapshot_at(user, self.ledger.head(), None)
    }

    /// Current snapshot with the streak evaluated relative to `today`.
    pub fn snapshot_as_of(&self, user: &UserId, today: NaiveDate) -> EngineResult<Arc<DashboardSnapshot>> {
        self.snapshot_at(user, self.ledger.head(), Some(today))
    }

    /// Snapshot of the ledger prefix visible at `cursor`.
    pub fn snapshot_at(
        &self,
        user: &UserId,
        cursor: LedgerCursor,
        today: Option<NaiveDate>,
    ) -> EngineResult<Arc<DashboardSnapshot>> {
        let user_head = self.ledger.user_head_at(user, cursor);

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(user, user_head, today) {
                self.metrics.increment_snapshot_cache_hits();
                log_event(Event::SnapshotCacheHit, &[("user", user.as_str())]);
                return Ok(hit);
            }
        }

        let events = self.ledger.events_for_at(user, user_head);
        let builder = SnapshotBuilder::new(&self.catalog, &self.levels);
        let snapshot = match builder.build(user, &events, user_head, today) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                log_event(
                    Event::SnapshotFailed,
                    &[("code", e.code().code()), ("message", e.message()), ("user", user.as_str())],
                );
                return Err(e.into());
            }
        };

        self.metrics.increment_snapshots_built();
        let cursor_field = user_head.to_string();
        let points = snapshot.total_points.to_string();
        log_event(
            Event::SnapshotBuilt,
            &[("cursor", cursor_field.as_str()), ("points", points.as_str()), ("user", user.as_str())],
        );

        if let Some(cache) = &self.cache {
            if let CacheSwap::Advanced(previous) =
                cache.swap(user, user_head, today, Arc::clone(&snapshot))
            {
                self.report_new_unlocks(user, previous.as_deref(), &snapshot);
            }
        }

        Ok(snapshot)
    }

    /// Logs achievements unlocked since the snapshot `current` replaced.
    fn report_new_unlocks(
        &self,
        user: &UserId,
        previous: Option<&DashboardSnapshot>,
        current: &DashboardSnapshot,
    ) {
        let before: BTreeSet<&AchievementId> = previous
            .map(|p| {
                p.achievements
                    .iter()
                    .filter(|a| a.unlocked)
                    .map(|a| &a.achievement_id)
                    .collect()
            })
            .unwrap_or_default();

        let mut fresh = 0u64;
        for achievement in current.achievements.iter().filter(|a| a.unlocked) {
            if before.contains(&achievement.achievement_id) {
                continue;
            }
            fresh += 1;
            log_event(
                Event::AchievementUnlocked,
                &[
                    ("achievement", achievement.achievement_id.as_str()),
                    ("rarity", achievement.rarity.as_str()),
                    ("user", user.as_str()),
                ],
            );
        }
        if fresh > 0 {
            self.metrics.add_achievements_unlocked(fresh);
        }
    }

    /// Completion of one course for `user`.
    pub fn course_progress(&self, user: &UserId, course: &CourseId) -> EngineResult<DerivedCourseProgress> {
        let events = self.ledger.events_for(user);
        Ok(ProgressCalculator::new(&self.catalog).compute_course_progress(&events, course)?)
    }

    /// Lesson lock states of one course for `user`.
    pub fn lesson_availability(&self, user: &UserId, course: &CourseId) -> EngineResult<LessonAvailability> {
        let events = self.ledger.events_for(user);
        Ok(ProgressCalculator::new(&self.catalog).compute_lesson_availability(&events, course)?)
    }

    /// Streak statistics recomputed from the full ledger.
    pub fn streak(&self, user: &UserId, today: Option<NaiveDate>) -> StreakStats {
        compute_streak(&study_days(&self.ledger.events_for(user)), today)
    }

    /// Unlock state of every achievement for `user`.
    pub fn achievements(&self, user: &UserId) -> EngineResult<AchievementReport> {
        let events = self.ledger.events_for(user);
        Ok(AchievementEvaluator::new(&self.catalog).evaluate_achievements(&events, None)?)
    }

    /// Sum of points of unlocked achievements.
    pub fn total_points(&self, user: &UserId) -> EngineResult<u64> {
        Ok(self.achievements(user)?.total_points())
    }
}

/// Loads and validates a catalog file or directory.
pub fn load_catalog(path: &Path) -> EngineResult<Catalog> {
    let mut loader = CatalogLoader::new();
    let loaded = loader.load_path(path);
    let sources = loader.sources().len();
    let built = loaded.and_then(|_| loader.build());
    match built {
        Ok(catalog) => {
            let courses = catalog.course_count().to_string();
            let lessons = catalog.lesson_count().to_string();
            let achievements = catalog.achievement_count().to_string();
            let files = sources.to_string();
            log_event(
                Event::CatalogLoaded,
                &[
                    ("achievements", achievements.as_str()),
                    ("courses", courses.as_str()),
                    ("files", files.as_str()),
                    ("lessons", lessons.as_str()),
                    ("path", path.display().to_string().as_str()),
                ],
            );
            Ok(catalog)
        }
        Err(e) => {
            log_event(
                Event::CatalogRejected,
                &[("code", e.code().code()), ("message", e.message())],
            );
            Err(e.into())
        }
    }
}
