//! Monthly grouping of scheduled session dates and month navigation.
//!
//! Dates are bucketed under `"YYYY-MM"` keys; the key order of a `BTreeMap`
//! is lexicographic, which for this zero-padded format is chronological.
//! Navigation state is initialized once from the wall clock when the
//! calendar is built and only moves through explicit transitions.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Minimum horizontal drag distance for a swipe to change months.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// `"YYYY-MM"` bucket key for a date.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parse an upstream date string, tolerating a trailing time component
/// (`"2025-03-02"` or `"2025-03-02T00:00:00Z"`).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let day_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").ok()
}

/// Partition dates into per-month buckets, each sorted ascending.
pub fn group_dates_by_month(dates: &[NaiveDate]) -> BTreeMap<String, Vec<NaiveDate>> {
    let mut buckets: BTreeMap<String, Vec<NaiveDate>> = BTreeMap::new();
    for &date in dates {
        buckets.entry(month_key(date)).or_default().push(date);
    }
    for bucket in buckets.values_mut() {
        bucket.sort();
    }
    buckets
}

/// A group's scheduled dates bucketed by month, with a navigation cursor.
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    buckets: BTreeMap<String, Vec<NaiveDate>>,
    keys: Vec<String>,
    cursor: usize,
}

impl MonthCalendar {
    /// Build the calendar and position the cursor: on the current month if
    /// it has scheduled dates, otherwise on the most recent month. Returns
    /// `None` for an empty date set (the view renders nothing).
    pub fn new(dates: &[NaiveDate], today: NaiveDate) -> Option<Self> {
        let buckets = group_dates_by_month(dates);
        if buckets.is_empty() {
            return None;
        }
        let keys: Vec<String> = buckets.keys().cloned().collect();
        let current_key = month_key(today);
        let cursor = keys
            .iter()
            .position(|key| *key == current_key)
            .unwrap_or(keys.len() - 1);
        Some(Self {
            buckets,
            keys,
            cursor,
        })
    }

    /// Move the cursor to a specific month key, if present.
    pub fn select(&mut self, key: &str) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    /// Step to the previous (earlier) month; no-op at the first month.
    pub fn previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Step to the next (later) month; no-op at the last month.
    pub fn next(&mut self) {
        if self.cursor < self.keys.len() - 1 {
            self.cursor += 1;
        }
    }

    /// Apply a horizontal drag. Dragging left past the threshold (negative
    /// distance) advances to the next month, dragging right goes back;
    /// smaller movements are ignored.
    pub fn swipe(&mut self, distance: f64) {
        if distance <= -SWIPE_THRESHOLD {
            self.next();
        } else if distance >= SWIPE_THRESHOLD {
            self.previous();
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn month_count(&self) -> usize {
        self.keys.len()
    }

    pub fn current_key(&self) -> &str {
        &self.keys[self.cursor]
    }

    /// Scheduled dates of the month under the cursor, ascending.
    pub fn current_dates(&self) -> &[NaiveDate] {
        &self.buckets[&self.keys[self.cursor]]
    }

    /// (year, month) of the month under the cursor.
    pub fn current_period(&self) -> (i32, u32) {
        let first = self.current_dates()[0];
        (first.year(), first.month())
    }
}
