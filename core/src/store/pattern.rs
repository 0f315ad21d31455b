use super::RosterStore;
use crate::{
    dates,
    error::RosterResult,
    pattern_calendar::{normalize_pattern, PatternKind, PatternSequence},
};
use chrono::NaiveDate;
use rusqlite::params;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

fn pattern_table(kind: PatternKind) -> &'static str {
    match kind {
        PatternKind::Department => "dept_pattern",
        PatternKind::Itw => "itw_pattern",
    }
}

impl RosterStore {
    // ── Pattern sequences ──────────────────────────────────────

    /// All sequences of one calendar, normalized to 21 symbols, ordered by
    /// start date.
    pub fn load_patterns(&self, kind: PatternKind) -> RosterResult<Vec<PatternSequence>> {
        let sql = format!(
            "SELECT start_date, pattern FROM {} ORDER BY start_date ASC",
            pattern_table(kind)
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut sequences = Vec::new();
        for row in rows {
            let (start, pattern) = row?;
            let Some(start_date) = dates::parse_iso(&start) else {
                log::warn!("skipping pattern with malformed start date '{start}'");
                continue;
            };
            let symbols = pattern.split(',').map(str::to_string).collect();
            sequences.push(PatternSequence {
                start_date,
                symbols: normalize_pattern(symbols),
            });
        }
        Ok(sequences)
    }

    /// Replace the whole sequence set of one calendar. Each pattern is
    /// normalized to exactly 21 symbols before storage; duplicate start
    /// dates collapse to the last one given.
    pub fn replace_patterns(
        &self,
        kind: PatternKind,
        sequences: &[PatternSequence],
    ) -> RosterResult<()> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute(&format!("DELETE FROM {}", pattern_table(kind)), [])?;
        let insert = format!(
            "INSERT OR REPLACE INTO {} (start_date, pattern) VALUES (?1, ?2)",
            pattern_table(kind)
        );
        for seq in sequences {
            let symbols = normalize_pattern(seq.symbols.clone());
            tx.execute(
                &insert,
                params![dates::iso(seq.start_date), symbols.join(",")],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Holidays ───────────────────────────────────────────────

    pub fn load_holidays(&self) -> RosterResult<Vec<Holiday>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT date, name FROM holiday ORDER BY date ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut holidays = Vec::new();
        for row in rows {
            let (date, name) = row?;
            if let Some(date) = dates::parse_iso(&date) {
                holidays.push(Holiday { date, name });
            }
        }
        Ok(holidays)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> RosterResult<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM holiday WHERE date = ?1",
            params![dates::iso(date)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Replace all holidays of `year` with the given `(date, name)` pairs.
    /// Dates are parsed as ISO; malformed or out-of-year entries are dropped
    /// at the boundary. When no valid date remains the call is a no-op, so a
    /// bad input file cannot wipe an existing year.
    pub fn replace_holidays_for_year(
        &self,
        year: i32,
        holidays: &[(String, String)],
    ) -> RosterResult<()> {
        let valid: Vec<(NaiveDate, &str)> = holidays
            .iter()
            .filter_map(|(date, name)| {
                let parsed = dates::parse_iso(date)?;
                dates::in_scope(parsed, year, None).then_some((parsed, name.as_str()))
            })
            .collect();
        if valid.is_empty() {
            log::warn!("holiday replacement for {year} had no valid dates, keeping existing set");
            return Ok(());
        }
        let Some((from, to)) = dates::year_bounds(year) else {
            return Ok(());
        };
        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "DELETE FROM holiday WHERE date BETWEEN ?1 AND ?2",
            params![dates::iso(from), dates::iso(to)],
        )?;
        for (date, name) in valid {
            tx.execute(
                "INSERT OR REPLACE INTO holiday (date, name) VALUES (?1, ?2)",
                params![dates::iso(date), name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
