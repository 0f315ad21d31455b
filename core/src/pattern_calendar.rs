//! 21-day repeating pattern calendar.
//!
//! Two independent calendars run over the same machinery: the department
//! rotation (symbols `1`/`2`/`3`) and the ITW duty calendar (symbols `""` and
//! `IW`). Each is a set of dated sequences; for a query date the latest
//! sequence whose start is not in the future wins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PATTERN_LEN: usize = 21;

/// One versioned pattern: effective from `start_date`, repeating every 21
/// days from that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSequence {
    pub start_date: NaiveDate,
    pub symbols: Vec<String>,
}

impl PatternSequence {
    pub fn new(start_date: NaiveDate, symbols: Vec<String>) -> Self {
        Self { start_date, symbols: normalize_pattern(symbols) }
    }
}

/// Force a symbol list to exactly [`PATTERN_LEN`] entries: short lists are
/// padded with empty strings, long lists truncated silently.
pub fn normalize_pattern(mut symbols: Vec<String>) -> Vec<String> {
    symbols.truncate(PATTERN_LEN);
    while symbols.len() < PATTERN_LEN {
        symbols.push(String::new());
    }
    symbols
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Department,
    Itw,
}

impl PatternKind {
    /// Symbols this calendar is allowed to produce. Anything else stored in
    /// a pattern is normalized to the empty string when read.
    fn alphabet(&self) -> &'static [&'static str] {
        match self {
            PatternKind::Department => &["1", "2", "3"],
            PatternKind::Itw => &["", "IW"],
        }
    }
}

pub struct PatternCalendar {
    kind: PatternKind,
}

impl PatternCalendar {
    pub fn department() -> Self {
        Self { kind: PatternKind::Department }
    }

    pub fn itw() -> Self {
        Self { kind: PatternKind::Itw }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Pick the governing sequence for `date`: the one with the greatest
    /// `start_date <= date`. `None` means the date predates every sequence
    /// and is unclassified.
    fn active_sequence<'a>(
        &self,
        date: NaiveDate,
        sequences: &'a [PatternSequence],
    ) -> Option<&'a PatternSequence> {
        sequences
            .iter()
            .filter(|s| s.start_date <= date)
            .max_by_key(|s| s.start_date)
    }

    /// Position of `date` inside the repeating 21-day window of its
    /// governing sequence.
    pub fn day_index(&self, date: NaiveDate, sequences: &[PatternSequence]) -> Option<usize> {
        let seq = self.active_sequence(date, sequences)?;
        let diff = date.signed_duration_since(seq.start_date).num_days();
        Some(diff.rem_euclid(PATTERN_LEN as i64) as usize)
    }

    /// Symbol for `date`, with anything outside the calendar's alphabet
    /// normalized to the empty string.
    pub fn symbol_for(&self, date: NaiveDate, sequences: &[PatternSequence]) -> Option<String> {
        let seq = self.active_sequence(date, sequences)?;
        let diff = date.signed_duration_since(seq.start_date).num_days();
        let idx = diff.rem_euclid(PATTERN_LEN as i64) as usize;
        let raw = seq.symbols.get(idx).map(String::as_str).unwrap_or("");
        if self.kind.alphabet().contains(&raw) {
            Some(raw.to_string())
        } else {
            Some(String::new())
        }
    }
}
