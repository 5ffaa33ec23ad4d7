//! Daily play streak and the smart-hint budget it earns.
//!
//! The streak lives in a small key/value store as two string values so it
//! survives between sessions. It changes at most once per calendar day, and
//! only when a puzzle is completed.

use crate::error::StoreError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// Store key for the streak length
pub const STREAK_KEY: &str = "sqStreak";
/// Store key for the last completion date
pub const LAST_PLAY_KEY: &str = "sqLastPlay";

/// Smart hints available with no streak bonus
pub const BASE_HINTS: u32 = 3;
/// Streak days per bonus hint
pub const STREAK_BONUS_PERIOD: u32 = 7;

const DATE_FORMAT: &str = "%Y-%m-%d";
/// Older saves wrote dates like `Sat Oct 17 2026`
const LEGACY_DATE_FORMAT: &str = "%a %b %d %Y";

/// Smart-hint budget for a streak length
pub fn max_hints(streak: u32) -> u32 {
    BASE_HINTS + streak / STREAK_BONUS_PERIOD
}

/// Persisted streak state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakRecord {
    pub current_streak: u32,
    pub last_play_date: Option<NaiveDate>,
}

impl StreakRecord {
    /// Read both keys. Missing or unreadable values count as no streak.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let current_streak = match store.get(STREAK_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring unreadable streak count");
                0
            }),
            None => 0,
        };
        let last_play_date = store.get(LAST_PLAY_KEY).and_then(|raw| {
            let date = parse_date(&raw);
            if date.is_none() && !raw.trim().is_empty() {
                warn!(value = %raw, "ignoring unreadable last-play date");
            }
            date
        });

        Self {
            current_streak,
            last_play_date,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(STREAK_KEY, &self.current_streak.to_string())?;
        let date = self
            .last_play_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        store.set(LAST_PLAY_KEY, &date)
    }

    pub fn max_hints(&self) -> u32 {
        max_hints(self.current_streak)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, LEGACY_DATE_FORMAT))
        .ok()
}

/// Apply one puzzle completion on `today`.
///
/// Same day: unchanged. Day after the last play: streak grows by one.
/// Anything else (a gap, no previous play, or a date in the future): the
/// streak restarts at one.
pub fn record_completion(record: StreakRecord, today: NaiveDate) -> StreakRecord {
    if record.last_play_date == Some(today) {
        return record;
    }

    let continues = record
        .last_play_date
        .and_then(|last| last.succ_opt())
        .is_some_and(|next| next == today);

    StreakRecord {
        current_streak: if continues {
            record.current_streak.saturating_add(1)
        } else {
            1
        },
        last_play_date: Some(today),
    }
}

/// Outcome of [`commit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub previous: StreakRecord,
    pub current: StreakRecord,
}

impl StreakUpdate {
    /// Whether today's completion changed anything
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Record a completion against the store as one read-modify-write.
///
/// The record is re-read at commit time rather than trusted from session
/// start. Two processes committing at the same instant can still lose an
/// update; the store offers no locking.
pub fn commit(store: &mut dyn KeyValueStore, today: NaiveDate) -> Result<StreakUpdate, StoreError> {
    let previous = StreakRecord::load(store);
    let current = record_completion(previous, today);
    if current != previous {
        current.save(store)?;
        info!(
            streak = current.current_streak,
            max_hints = current.max_hints(),
            "streak updated"
        );
    }
    Ok(StreakUpdate { previous, current })
}

/// String key/value persistence (local storage in the browser original)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and for running without a data directory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Source of "today" in the player's local time zone
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
