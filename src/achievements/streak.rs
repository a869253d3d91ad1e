//! Study streak calculation
//!
//! Streaks are counted over distinct UTC calendar days that carry at least one
//! `StudyDayRecorded` event. A run is broken by any missed day.
//!
//! The current streak ends at the most recent study day. When the caller
//! supplies "today" and that day is two or more days after the last study day,
//! the current streak is 0. Yesterday still counts, so a learner who has not
//! studied yet today keeps their streak.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::{EventKind, SequencedEvent};

/// Streak statistics for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    /// Consecutive days ending at the latest study day (or 0 if broken)
    pub current_streak: u32,
    /// Longest run of consecutive study days ever
    pub longest_streak: u32,
    /// Distinct study days
    pub study_days: u32,
    pub last_study_day: Option<NaiveDate>,
}

/// Distinct study days in `events`.
pub fn study_days(events: &[SequencedEvent]) -> BTreeSet<NaiveDate> {
    events
        .iter()
        .filter(|e| e.event.kind == EventKind::StudyDayRecorded)
        .map(|e| e.event.day())
        .collect()
}

/// Computes streak statistics over a set of study days.
pub fn compute_streak(days: &BTreeSet<NaiveDate>, today: Option<NaiveDate>) -> StreakStats {
    let last = match days.last() {
        Some(last) => *last,
        None => return StreakStats::default(),
    };

    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if is_next_day(prev, *day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    // `run` now holds the run ending at the last study day
    let current = match today {
        Some(today) if (today - last).num_days() >= 2 => 0,
        _ => run,
    };

    StreakStats {
        current_streak: current,
        longest_streak: longest,
        study_days: days.len() as u32,
        last_study_day: Some(last),
    }
}

fn is_next_day(previous: NaiveDate, day: NaiveDate) -> bool {
    previous.succ_opt() == Some(day)
}

/// Incrementally maintained streak, fed one study day at a time in
/// non-decreasing day order.
#[derive(Debug, Clone, Default)]
pub struct StreakTracker {
    last_day: Option<NaiveDate>,
    current: u32,
    longest: u32,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a study day. Days already seen are ignored.
    pub fn record(&mut self, day: NaiveDate) {
        match self.last_day {
            Some(last) if day <= last => return,
            Some(last) if is_next_day(last, day) => self.current += 1,
            _ => self.current = 1,
        }
        self.last_day = Some(day);
        self.longest = self.longest.max(self.current);
    }

    /// Run ending at the latest recorded day
    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn longest(&self) -> u32 {
        self.longest
    }
}
