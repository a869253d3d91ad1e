//! Append-only progress ledger
//!
//! The ledger is the single source of truth. It owns one log per user and a
//! global sequence counter.
//!
//! Append protocol:
//! 1. Resolve the subject against the catalog (no lock held)
//! 2. Take the user's write lock
//! 3. Check timestamp order and lesson lock state against the user's log
//! 4. Assign the next global sequence number and push
//!
//! Any failure before step 4 leaves the ledger untouched. Because the sequence
//! number is taken while the user's lock is held, a reader that holds the
//! same user's read lock and filters by a cursor always sees a gap-free prefix
//! of that user's history.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::catalog::Catalog;
use crate::ids::{CourseId, LessonId, UserId};

use super::cursor::LedgerCursor;
use super::errors::{LedgerError, LedgerResult};
use super::event::{EventKind, ProgressEvent, SequencedEvent};

/// Per-user event history
#[derive(Debug, Default)]
struct UserLog {
    events: Vec<SequencedEvent>,
    /// Completed lessons, kept for the lock check at append time
    completed: BTreeSet<LessonId>,
}

/// Append-only, per-user ordered event store
#[derive(Debug)]
pub struct Ledger {
    catalog: Arc<Catalog>,
    users: RwLock<BTreeMap<UserId, Arc<RwLock<UserLog>>>>,
    /// Highest sequence number handed out
    sequence: AtomicU64,
}

/// What must be true in the user's log for an event to be accepted
enum Requirement {
    None,
    Completed { lesson: LessonId, predecessor: LessonId },
}

impl Ledger {
    /// Creates an empty ledger validating against `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            users: RwLock::new(BTreeMap::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Catalog the ledger validates against
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Appends an event, or rejects it and leaves the ledger unchanged.
    pub fn append(&self, event: ProgressEvent) -> LedgerResult<SequencedEvent> {
        let requirement = self.resolve(&event)?;

        let log = self.user_log(&event.user_id);
        let mut log = write_lock(&log);

        if let Some(last) = log.events.last() {
            if event.timestamp < last.event.timestamp {
                return Err(LedgerError::out_of_order(
                    event.user_id.as_str(),
                    event.timestamp,
                    last.event.timestamp,
                ));
            }
        }

        if let Requirement::Completed { lesson, predecessor } = requirement {
            if !log.completed.contains(&lesson) && !log.completed.contains(&predecessor) {
                return Err(LedgerError::lesson_locked(lesson.as_str(), predecessor.as_str()));
            }
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(lesson) = event.lesson_id() {
            log.completed.insert(lesson);
        }
        let sequenced = SequencedEvent { sequence, event };
        log.events.push(sequenced.clone());
        Ok(sequenced)
    }

    /// Checks the subject against the catalog and derives the lock requirement.
    fn resolve(&self, event: &ProgressEvent) -> LedgerResult<Requirement> {
        let unknown = || LedgerError::unknown_subject(event.kind.as_str(), &event.subject_id);

        match event.kind {
            EventKind::LessonCompleted => {
                let lesson = LessonId::new(event.subject_id.as_str());
                let predecessor = self
                    .catalog
                    .predecessor_of(&lesson)
                    .map_err(|_| unknown())?
                    .cloned();
                Ok(match predecessor {
                    Some(predecessor) => Requirement::Completed { lesson, predecessor },
                    None => Requirement::None,
                })
            }
            EventKind::StudyDayRecorded => {
                let course = CourseId::new(event.subject_id.as_str());
                if self.catalog.contains_course(&course) {
                    Ok(Requirement::None)
                } else {
                    Err(unknown())
                }
            }
        }
    }

    fn user_log(&self, user: &UserId) -> Arc<RwLock<UserLog>> {
        if let Some(log) = read_lock(&self.users).get(user) {
            return Arc::clone(log);
        }
        let mut users = write_lock(&self.users);
        Arc::clone(users.entry(user.clone()).or_default())
    }

    /// All events of a user in append order (timestamp ascending).
    ///
    /// The returned collection is owned, so iterating it again always yields
    /// the same sequence.
    pub fn events_for(&self, user: &UserId) -> Vec<SequencedEvent> {
        self.events_for_at(user, self.head())
    }

    /// Events of a user visible at `cursor`.
    pub fn events_for_at(&self, user: &UserId, cursor: LedgerCursor) -> Vec<SequencedEvent> {
        let log = match read_lock(&self.users).get(user) {
            Some(log) => Arc::clone(log),
            None => return Vec::new(),
        };
        let log = read_lock(&log);
        log.events
            .iter()
            .take_while(|e| cursor.covers(e.sequence))
            .cloned()
            .collect()
    }

    /// Cursor covering every event accepted so far.
    pub fn head(&self) -> LedgerCursor {
        LedgerCursor::new(self.sequence.load(Ordering::SeqCst))
    }

    /// Cursor of the user's latest event visible at `cursor`.
    pub fn user_head_at(&self, user: &UserId, cursor: LedgerCursor) -> LedgerCursor {
        let log = match read_lock(&self.users).get(user) {
            Some(log) => Arc::clone(log),
            None => return LedgerCursor::ORIGIN,
        };
        let log = read_lock(&log);
        log.events
            .iter()
            .take_while(|e| cursor.covers(e.sequence))
            .last()
            .map(SequencedEvent::cursor)
            .unwrap_or(LedgerCursor::ORIGIN)
    }

    /// Users with at least one accepted event, in id order.
    pub fn users(&self) -> Vec<UserId> {
        read_lock(&self.users).keys().cloned().collect()
    }

    /// Total number of accepted events.
    pub fn len(&self) -> u64 {
        self.head().value()
    }

    /// Returns true if no event has been accepted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// A panic while a guard is held can only happen before the push in `append`,
// so the protected data is still consistent and poisoning can be ignored.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
