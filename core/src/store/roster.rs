use super::RosterStore;
use crate::{
    dates,
    error::RosterResult,
    slots,
    types::{PersonKind, PersonRef},
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Stored roster row: one per (person, date). `value` is the duty code,
/// `slot` the occupancy-slot id (or empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRosterRecord {
    pub person: PersonRef,
    pub date: NaiveDate,
    pub value: String,
    pub slot: String,
}

/// Upsert payload. `None` leaves the stored sub-field untouched, so a slot
/// assignment never erases a duty code and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyRosterUpdate {
    pub person: PersonRef,
    pub date: NaiveDate,
    pub value: Option<String>,
    pub slot: Option<String>,
}

impl DutyRosterUpdate {
    pub fn value(person: PersonRef, date: NaiveDate, value: &str) -> Self {
        Self {
            person,
            date,
            value: Some(value.to_string()),
            slot: None,
        }
    }

    pub fn slot(person: PersonRef, date: NaiveDate, slot: &str) -> Self {
        Self {
            person,
            date,
            value: None,
            slot: Some(slot.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BulkUpsertOutcome {
    pub imported: usize,
    pub skipped: usize,
}

const UPSERT_SQL: &str = "INSERT INTO duty_roster (person_id, person_type, date, value, slot)
     VALUES (?1, ?2, ?3, COALESCE(?4, ''), COALESCE(?5, ''))
     ON CONFLICT (person_id, person_type, date) DO UPDATE SET
        value = COALESCE(?4, value),
        slot  = COALESCE(?5, slot)";

fn record_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Option<DutyRosterRecord>> {
    let kind: String = row.get(1)?;
    let date: String = row.get(2)?;
    // Rows with an unknown person_type or malformed date are ignored rather
    // than failing the whole query.
    Ok(
        match (PersonKind::parse(&kind), dates::parse_iso(&date)) {
            (Some(kind), Some(date)) => Some(DutyRosterRecord {
                person: PersonRef {
                    kind,
                    id: row.get(0)?,
                },
                date,
                value: row.get(3)?,
                slot: row.get(4)?,
            }),
            _ => None,
        },
    )
}

impl RosterStore {
    // ── Duty roster ────────────────────────────────────────────

    /// Upsert one roster entry. A non-positive person id is a logged no-op;
    /// the defensive behavior of the roster UI, not an error.
    pub fn set_duty_roster_entry(&self, entry: &DutyRosterUpdate) -> RosterResult<()> {
        if entry.person.id <= 0 {
            log::warn!(
                "ignoring roster entry without a person id (date {})",
                entry.date
            );
            return Ok(());
        }
        self.conn().execute(
            UPSERT_SQL,
            params![
                entry.person.id,
                entry.person.kind.as_str(),
                dates::iso(entry.date),
                entry.value.as_deref(),
                entry.slot.as_deref(),
            ],
        )?;
        Ok(())
    }

    /// Apply a batch of upserts in one transaction. Row failures are counted
    /// and skipped; later entries for the same key win. A fatal error (e.g.
    /// the store going away) rolls the whole batch back and surfaces as
    /// `Err`.
    pub fn bulk_upsert_entries(
        &self,
        entries: &[DutyRosterUpdate],
    ) -> RosterResult<BulkUpsertOutcome> {
        let tx = self.conn().unchecked_transaction()?;
        let mut outcome = BulkUpsertOutcome::default();
        for entry in entries {
            if entry.person.id <= 0 {
                log::warn!("skipping roster row without a person id (date {})", entry.date);
                outcome.skipped += 1;
                continue;
            }
            let applied = tx.execute(
                UPSERT_SQL,
                params![
                    entry.person.id,
                    entry.person.kind.as_str(),
                    dates::iso(entry.date),
                    entry.value.as_deref(),
                    entry.slot.as_deref(),
                ],
            );
            match applied {
                Ok(_) => outcome.imported += 1,
                Err(err) => {
                    log::warn!(
                        "skipping roster row for person {} on {}: {err}",
                        entry.person.id,
                        entry.date
                    );
                    outcome.skipped += 1;
                }
            }
        }
        tx.commit()?;
        Ok(outcome)
    }

    /// Give `slot_id` on `date` to `person`, creating the record (with an
    /// empty duty code) when absent. The slot is exclusive per date: any
    /// other holder is cleared in the same transaction.
    pub fn assign_slot(
        &self,
        person: PersonRef,
        date: NaiveDate,
        slot_id: &str,
    ) -> RosterResult<()> {
        if person.id <= 0 {
            log::warn!("ignoring slot assignment without a person id (date {date})");
            return Ok(());
        }
        let tx = self.conn().unchecked_transaction()?;
        tx.execute(
            "UPDATE duty_roster SET slot = ''
             WHERE date = ?1 AND slot = ?2
               AND NOT (person_id = ?3 AND person_type = ?4)",
            params![
                dates::iso(date),
                slot_id,
                person.id,
                person.kind.as_str()
            ],
        )?;
        tx.execute(
            "INSERT INTO duty_roster (person_id, person_type, date, value, slot)
             VALUES (?1, ?2, ?3, '', ?4)
             ON CONFLICT (person_id, person_type, date) DO UPDATE SET slot = ?4",
            params![person.id, person.kind.as_str(), dates::iso(date), slot_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Blank the slot field of every vehicle/ITW seat assignment. The
    /// pre-planning marker `"V"` in `value` is blanked too, unless `V` is a
    /// configured shift-type code — then it is a real duty code and stays.
    pub fn clear_slot_assignments(&self) -> RosterResult<()> {
        let v_is_duty_code = self.is_shift_type_code(slots::PREPLAN_MARKER)?;
        let tx = self.conn().unchecked_transaction()?;
        for prefix in slots::RESERVED_SLOT_PREFIXES {
            tx.execute(
                "UPDATE duty_roster SET slot = '' WHERE slot LIKE ?1 || '%'",
                params![prefix],
            )?;
        }
        if !v_is_duty_code {
            tx.execute(
                "UPDATE duty_roster SET value = '' WHERE value = ?1",
                params![slots::PREPLAN_MARKER],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn clear_for_year(&self, year: i32) -> RosterResult<()> {
        let Some((from, to)) = dates::year_bounds(year) else {
            return Ok(());
        };
        self.conn().execute(
            "DELETE FROM duty_roster WHERE date BETWEEN ?1 AND ?2",
            params![dates::iso(from), dates::iso(to)],
        )?;
        Ok(())
    }

    pub fn clear_for_month(&self, year: i32, month: u32) -> RosterResult<()> {
        let Some((from, to)) = dates::month_bounds(year, month) else {
            log::warn!("clear_for_month called with invalid month {year}-{month}");
            return Ok(());
        };
        self.conn().execute(
            "DELETE FROM duty_roster WHERE date BETWEEN ?1 AND ?2",
            params![dates::iso(from), dates::iso(to)],
        )?;
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────

    pub fn get_entry(
        &self,
        person: PersonRef,
        date: NaiveDate,
    ) -> RosterResult<Option<DutyRosterRecord>> {
        let record = self
            .conn()
            .query_row(
                "SELECT person_id, person_type, date, value, slot
                 FROM duty_roster
                 WHERE person_id = ?1 AND person_type = ?2 AND date = ?3",
                params![person.id, person.kind.as_str(), dates::iso(date)],
                record_row_mapper,
            )
            .optional()?;
        Ok(record.flatten())
    }

    pub fn entries_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterResult<Vec<DutyRosterRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT person_id, person_type, date, value, slot
             FROM duty_roster WHERE date BETWEEN ?1 AND ?2
             ORDER BY date ASC, person_type ASC, person_id ASC",
        )?;
        let rows = stmt.query_map(params![dates::iso(from), dates::iso(to)], record_row_mapper)?;
        let mut records = Vec::new();
        for row in rows {
            if let Some(record) = row? {
                records.push(record);
            }
        }
        Ok(records)
    }

    pub fn entries_in_month(&self, year: i32, month: u32) -> RosterResult<Vec<DutyRosterRecord>> {
        let Some((from, to)) = dates::month_bounds(year, month) else {
            return Ok(Vec::new());
        };
        self.entries_in_range(from, to)
    }

    pub fn entries_in_year(&self, year: i32) -> RosterResult<Vec<DutyRosterRecord>> {
        let Some((from, to)) = dates::year_bounds(year) else {
            return Ok(Vec::new());
        };
        self.entries_in_range(from, to)
    }
}
