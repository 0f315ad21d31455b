//! Spreadsheet roster import.
//!
//! The external scheduler exports a fixed-layout workbook: a header row with
//! one date per column, a name column, and two contiguous row bands (staff,
//! apprentices). Import resolves each row label to a known person, collects
//! the non-empty duty-code cells, and writes everything through one
//! transactional bulk upsert. Preview runs the same resolution without
//! touching the store.

use crate::{
    dates,
    error::RosterResult,
    store::{Apprentice, DutyRosterUpdate, Person, RosterStore},
    types::{PersonKind, PersonRef},
};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Sheet the external scheduler writes its pre-planning into. When present
/// only this sheet is read, otherwise every sheet is.
pub const PREPLAN_SHEET: &str = "Vorplanung";

/// Fixed cell layout of the scheduler's export. All indices are 0-based.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Row carrying one date per column.
    pub header_row: u32,
    /// Reference date cell; columns whose header cell does not parse fall
    /// back to `anchor + column offset`.
    pub anchor_cell: (u32, u32),
    pub name_col: u32,
    pub first_date_col: u32,
    /// Inclusive staff row band.
    pub staff_rows: (u32, u32),
    /// Inclusive apprentice row band.
    pub apprentice_rows: (u32, u32),
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_row: 1,
            anchor_cell: (0, 2),
            name_col: 0,
            first_date_col: 2,
            staff_rows: (3, 62),
            apprentice_rows: (64, 73),
        }
    }
}

// ── Name resolution ────────────────────────────────────────────

/// Surname key used for fuzzy matching and override lookup: lowercase,
/// umlauts expanded, dots stripped, whitespace collapsed.
pub fn normalize_surname(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.to_lowercase().chars() {
        match ch {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            '.' => {}
            c => out.push(c),
        }
    }
    collapse_whitespace(&out)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Staff known to the store, loaded once per import.
pub struct StaffDirectory {
    pub persons: Vec<Person>,
    pub apprentices: Vec<Apprentice>,
}

impl StaffDirectory {
    pub fn load(store: &RosterStore) -> RosterResult<Self> {
        Ok(Self {
            persons: store.list_persons(false)?,
            apprentices: store.list_apprentices()?,
        })
    }
}

struct NameEntry {
    person: PersonRef,
    full: String,
    surname_norm: String,
}

fn name_pool(directory: &StaffDirectory, kind: PersonKind) -> Vec<NameEntry> {
    match kind {
        PersonKind::Person => directory
            .persons
            .iter()
            .map(|p| NameEntry {
                person: PersonRef::person(p.id),
                full: collapse_whitespace(
                    &format!("{}, {}", p.surname, p.given_name).to_lowercase(),
                ),
                surname_norm: normalize_surname(&p.surname),
            })
            .collect(),
        PersonKind::Apprentice => directory
            .apprentices
            .iter()
            .map(|a| NameEntry {
                person: PersonRef::apprentice(a.id),
                full: collapse_whitespace(
                    &format!("{}, {}", a.surname, a.given_name).to_lowercase(),
                ),
                surname_norm: normalize_surname(&a.surname),
            })
            .collect(),
        PersonKind::Doctor => Vec::new(),
    }
}

enum Resolution {
    Matched(PersonRef),
    /// Normalized surname that could not be resolved; the row is skipped,
    /// never guessed.
    Unmatched(String),
}

/// Precedence: exact `"Surname, GivenName"` match, then unique normalized
/// surname, then the caller's override map.
fn resolve_label(
    label: &str,
    pool: &[NameEntry],
    overrides: &HashMap<String, PersonRef>,
) -> Resolution {
    let full = collapse_whitespace(&label.to_lowercase());
    if let Some(entry) = pool.iter().find(|e| e.full == full) {
        return Resolution::Matched(entry.person);
    }

    let surname_part = label.split(',').next().unwrap_or(label);
    let norm = normalize_surname(surname_part);
    let hits: Vec<&NameEntry> = pool.iter().filter(|e| e.surname_norm == norm).collect();
    if hits.len() == 1 {
        return Resolution::Matched(hits[0].person);
    }
    if let Some(person) = overrides.get(&norm) {
        return Resolution::Matched(*person);
    }
    if hits.len() > 1 {
        log::warn!("roster import: surname '{norm}' is ambiguous, skipping row");
    } else {
        log::warn!("roster import: no staff member matches '{norm}', skipping row");
    }
    Resolution::Unmatched(norm)
}

// ── Date resolution ────────────────────────────────────────────

/// Excel serial day number to a date. Day 1 is 1900-01-01, but Excel also
/// counts the phantom 1900-02-29; the 1899-12-30 base reproduces what
/// spreadsheets emit for any modern date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|base| base.checked_add_signed(Duration::days(serial.floor() as i64)))
}

/// `DD.MM`, `DD.MM.` or `DD.MM.YYYY` (two-digit years read as 20xx).
pub fn parse_text_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let trimmed = text.trim().trim_end_matches('.');
    let parts: Vec<&str> = trimmed.split('.').collect();
    match parts.as_slice() {
        [d, m] => NaiveDate::from_ymd_opt(default_year, m.trim().parse().ok()?, d.trim().parse().ok()?),
        [d, m, y] => {
            let mut year: i32 = y.trim().parse().ok()?;
            if year < 100 {
                year += 2000;
            }
            NaiveDate::from_ymd_opt(year, m.trim().parse().ok()?, d.trim().parse().ok()?)
        }
        _ => None,
    }
}

/// Direct parse of a header or anchor cell, covering serial numbers, real
/// datetime cells and `DD.MM[.YYYY]` text.
pub fn cell_date(cell: &Data, default_year: i32) -> Option<NaiveDate> {
    match cell {
        Data::Float(f) => excel_serial_to_date(*f),
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::DateTimeIso(s) => s.get(..10).and_then(dates::parse_iso),
        Data::String(s) => parse_text_date(s, default_year),
        _ => None,
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ── Sheet resolution ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub person: PersonRef,
    pub date: NaiveDate,
    pub code: String,
}

#[derive(Debug, Default)]
pub struct ResolutionOutcome {
    /// Rows carrying a name label.
    pub total: usize,
    pub matched: usize,
    /// Distinct normalized surnames that could not be resolved.
    pub unmatched: BTreeSet<String>,
    pub entries: Vec<SheetEntry>,
}

/// Resolve one worksheet against the staff directory. Pure over its inputs;
/// tests build the `Range` in memory.
pub fn resolve_range(
    range: &Range<Data>,
    layout: &SheetLayout,
    directory: &StaffDirectory,
    year: i32,
    month: Option<u32>,
    overrides: &HashMap<String, PersonRef>,
) -> ResolutionOutcome {
    let mut outcome = ResolutionOutcome::default();
    let Some((_, end_col)) = range.end() else {
        return outcome;
    };

    let anchor = range
        .get_value(layout.anchor_cell)
        .and_then(|c| cell_date(c, year));

    // Per-column dates: direct header parse first, anchor + offset second.
    let mut columns: Vec<(u32, NaiveDate)> = Vec::new();
    for col in layout.first_date_col..=end_col {
        let parsed = range
            .get_value((layout.header_row, col))
            .and_then(|c| cell_date(c, year));
        let date = parsed.or_else(|| {
            anchor.and_then(|a| {
                a.checked_add_signed(Duration::days((col - layout.first_date_col) as i64))
            })
        });
        let Some(date) = date else { continue };
        if dates::in_scope(date, year, month) {
            columns.push((col, date));
        }
    }

    let bands = [
        (layout.staff_rows, PersonKind::Person),
        (layout.apprentice_rows, PersonKind::Apprentice),
    ];
    for (rows, kind) in bands {
        let pool = name_pool(directory, kind);
        for row in rows.0..=rows.1 {
            let Some(label) = range.get_value((row, layout.name_col)).and_then(cell_text)
            else {
                continue;
            };
            outcome.total += 1;
            let person = match resolve_label(&label, &pool, overrides) {
                Resolution::Matched(person) => person,
                Resolution::Unmatched(norm) => {
                    outcome.unmatched.insert(norm);
                    continue;
                }
            };
            outcome.matched += 1;
            for (col, date) in &columns {
                if let Some(code) = range.get_value((row, *col)).and_then(cell_text) {
                    outcome.entries.push(SheetEntry {
                        person,
                        date: *date,
                        code,
                    });
                }
            }
        }
    }
    outcome
}

fn resolve_workbook(
    store: &RosterStore,
    path: &str,
    year: i32,
    month: Option<u32>,
    overrides: &HashMap<String, PersonRef>,
) -> RosterResult<ResolutionOutcome> {
    let directory = StaffDirectory::load(store)?;
    let layout = SheetLayout::default();
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_owned();
    let chosen: Vec<String> = if names.iter().any(|n| n == PREPLAN_SHEET) {
        vec![PREPLAN_SHEET.to_string()]
    } else {
        names
    };

    let mut combined = ResolutionOutcome::default();
    for name in chosen {
        let range = workbook.worksheet_range(&name)?;
        let outcome = resolve_range(&range, &layout, &directory, year, month, overrides);
        combined.total += outcome.total;
        combined.matched += outcome.matched;
        combined.unmatched.extend(outcome.unmatched);
        combined.entries.extend(outcome.entries);
    }
    Ok(combined)
}

// ── Public entry points ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub total: usize,
    pub matched: usize,
    pub unmatched_names: Vec<String>,
    /// Entries that would replace an existing non-empty duty code.
    pub overwrites: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    pub imported: usize,
    pub skipped: usize,
}

/// Resolved entries that would replace an existing non-empty duty code.
pub fn count_overwrites(store: &RosterStore, entries: &[SheetEntry]) -> RosterResult<usize> {
    let mut overwrites = 0;
    for entry in entries {
        if let Some(existing) = store.get_entry(entry.person, entry.date)? {
            if !existing.value.is_empty() {
                overwrites += 1;
            }
        }
    }
    Ok(overwrites)
}

/// Non-mutating dry run of [`import_duty_roster`].
pub fn preview_duty_roster(
    store: &RosterStore,
    path: &str,
    year: i32,
    month: Option<u32>,
) -> RosterResult<ImportPreview> {
    let outcome = resolve_workbook(store, path, year, month, &HashMap::new())?;
    let overwrites = count_overwrites(store, &outcome.entries)?;
    Ok(ImportPreview {
        total: outcome.total,
        matched: outcome.matched,
        unmatched_names: outcome.unmatched.into_iter().collect(),
        overwrites,
    })
}

pub fn import_duty_roster(
    store: &RosterStore,
    path: &str,
    year: i32,
    month: Option<u32>,
    overrides: &HashMap<String, PersonRef>,
) -> RosterResult<ImportReport> {
    let outcome = resolve_workbook(store, path, year, month, overrides)?;
    let updates: Vec<DutyRosterUpdate> = outcome
        .entries
        .iter()
        .map(|e| DutyRosterUpdate::value(e.person, e.date, &e.code))
        .collect();

    match store.bulk_upsert_entries(&updates) {
        Ok(bulk) => {
            let message = format!(
                "imported {} entries, {} rows skipped, {} of {} names unmatched",
                bulk.imported,
                bulk.skipped,
                outcome.unmatched.len(),
                outcome.total
            );
            log::info!("roster import from '{path}': {message}");
            Ok(ImportReport {
                success: true,
                message,
                imported: bulk.imported,
                skipped: bulk.skipped,
            })
        }
        // Fatal store failure: the transaction rolled back, nothing was
        // written, report zero success instead of a half-applied batch.
        Err(err) => Ok(ImportReport {
            success: false,
            message: format!("import failed, no entries written: {err}"),
            imported: 0,
            skipped: updates.len(),
        }),
    }
}
