//! Roster importer tests.
//!
//! The range-level resolution functions are pure over an in-memory
//! `calamine::Range`, so every test builds its grid directly: dates in the
//! header row, names in the name column, duty codes in the body.

use calamine::{Data, Range};
use chrono::NaiveDate;
use roster_core::{
    importer::{
        cell_date, count_overwrites, excel_serial_to_date, normalize_surname, parse_text_date,
        resolve_range, SheetLayout, StaffDirectory,
    },
    store::{Apprentice, DutyRosterUpdate, Person, RosterStore},
    types::{PersonKind, PersonRef},
};
use std::collections::HashMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn person(id: i64, surname: &str, given: &str) -> Person {
    Person {
        id,
        surname: surname.to_string(),
        given_name: given.to_string(),
        part_time_pct: 100.0,
        qual_commander: false,
        qual_heavy_commander: false,
        qual_nef: false,
        qual_itw_machinist: false,
        qual_itw_commander: false,
        sort: 0,
        archived: false,
    }
}

fn apprentice(id: i64, surname: &str, given: &str) -> Apprentice {
    Apprentice {
        id,
        surname: surname.to_string(),
        given_name: given.to_string(),
        training_year: 1,
        sort: 0,
    }
}

fn directory() -> StaffDirectory {
    StaffDirectory {
        persons: vec![
            person(1, "Meyer", "Anna"),
            person(2, "Meyer", "Bernd"),
            person(3, "Müller", "Hans"),
        ],
        apprentices: vec![apprentice(11, "Klein", "Udo")],
    }
}

fn grid() -> Range<Data> {
    Range::new((0, 0), (80, 40))
}

fn set_text(range: &mut Range<Data>, pos: (u32, u32), text: &str) {
    range.set_value(pos, Data::String(text.to_string()));
}

// ── Name and date primitives ───────────────────────────────────

#[test]
fn surname_normalization() {
    assert_eq!(normalize_surname("Müller"), "mueller");
    assert_eq!(normalize_surname("Groß"), "gross");
    assert_eq!(normalize_surname("  St.  Jürgen "), "st juergen");
    assert_eq!(normalize_surname("MEYER"), "meyer");
}

#[test]
fn excel_serial_dates_convert_over_the_1899_base() {
    assert_eq!(excel_serial_to_date(44927.0), Some(date(2023, 1, 1)));
    assert_eq!(excel_serial_to_date(46174.0), Some(date(2026, 6, 1)));
    assert_eq!(excel_serial_to_date(46174.5), Some(date(2026, 6, 1)), "time part ignored");
    assert_eq!(excel_serial_to_date(0.0), None);
}

#[test]
fn text_dates_parse_with_and_without_year() {
    assert_eq!(parse_text_date("05.06.2026", 2000), Some(date(2026, 6, 5)));
    assert_eq!(parse_text_date("5.6.26", 2000), Some(date(2026, 6, 5)));
    assert_eq!(parse_text_date("05.06.", 2026), Some(date(2026, 6, 5)));
    assert_eq!(parse_text_date("05.06", 2026), Some(date(2026, 6, 5)));
    assert_eq!(parse_text_date("KW 23", 2026), None);
}

#[test]
fn cell_dates_cover_serials_and_text() {
    assert_eq!(cell_date(&Data::Float(46174.0), 2026), Some(date(2026, 6, 1)));
    assert_eq!(cell_date(&Data::Int(46174), 2026), Some(date(2026, 6, 1)));
    assert_eq!(
        cell_date(&Data::String("01.06.2026".to_string()), 2000),
        Some(date(2026, 6, 1))
    );
    assert_eq!(cell_date(&Data::Empty, 2026), None);
}

// ── Row resolution ─────────────────────────────────────────────

/// A full-name label resolves even when the surname alone would be
/// ambiguous.
#[test]
fn exact_full_name_beats_ambiguous_surname() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (3, 0), "Meyer, Anna");
    set_text(&mut range, (4, 0), "Meyer");
    set_text(&mut range, (3, 2), "FD");
    set_text(&mut range, (4, 2), "SD");

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.matched, 1);
    assert_eq!(
        outcome.unmatched.iter().collect::<Vec<_>>(),
        ["meyer"],
        "the bare ambiguous surname is skipped, never guessed"
    );
    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].person, PersonRef::person(1));
    assert_eq!(outcome.entries[0].code, "FD");
    assert_eq!(outcome.entries[0].date, date(2026, 6, 1));
}

#[test]
fn unique_normalized_surname_matches() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (3, 0), "Mueller");
    set_text(&mut range, (3, 2), "FD");

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());

    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.entries[0].person, PersonRef::person(3));
}

#[test]
fn override_mapping_resolves_ambiguity() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (3, 0), "Meyer");
    set_text(&mut range, (3, 2), "FD");

    let overrides: HashMap<String, PersonRef> =
        [("meyer".to_string(), PersonRef::person(2))].into();
    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &overrides);

    assert_eq!(outcome.matched, 1);
    assert!(outcome.unmatched.is_empty());
    assert_eq!(outcome.entries[0].person, PersonRef::person(2));
}

#[test]
fn apprentice_rows_resolve_against_apprentices() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (layout.apprentice_rows.0, 0), "Klein");
    set_text(&mut range, (layout.apprentice_rows.0, 2), "FD");

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());

    assert_eq!(outcome.entries.len(), 1);
    assert_eq!(outcome.entries[0].person.kind, PersonKind::Apprentice);
    assert_eq!(outcome.entries[0].person.id, 11);
}

// ── Column and cell handling ───────────────────────────────────

#[test]
fn unparseable_headers_fall_back_to_anchor_plus_offset() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, layout.anchor_cell, "01.06.2026");
    set_text(&mut range, (layout.header_row, 2), "Mo");
    set_text(&mut range, (layout.header_row, 3), "Di");
    set_text(&mut range, (3, 0), "Meyer, Anna");
    set_text(&mut range, (3, 2), "FD");
    set_text(&mut range, (3, 3), "ND");

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());

    let dates: Vec<NaiveDate> = outcome.entries.iter().map(|e| e.date).collect();
    assert_eq!(dates, [date(2026, 6, 1), date(2026, 6, 2)]);
}

#[test]
fn columns_outside_the_requested_scope_are_skipped() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "30.06.2026");
    set_text(&mut range, (layout.header_row, 3), "01.07.2026");
    set_text(&mut range, (layout.header_row, 4), "01.06.2025");
    set_text(&mut range, (3, 0), "Meyer, Anna");
    set_text(&mut range, (3, 2), "FD");
    set_text(&mut range, (3, 3), "FD");
    set_text(&mut range, (3, 4), "FD");

    let june_only =
        resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());
    assert_eq!(june_only.entries.len(), 1);
    assert_eq!(june_only.entries[0].date, date(2026, 6, 30));

    let whole_year = resolve_range(&range, &layout, &directory(), 2026, None, &HashMap::new());
    assert_eq!(whole_year.entries.len(), 2, "year scope admits July, not 2025");
}

#[test]
fn empty_duty_cells_create_no_entries() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (layout.header_row, 3), "02.06.2026");
    set_text(&mut range, (3, 0), "Meyer, Anna");
    set_text(&mut range, (3, 2), "FD");
    set_text(&mut range, (3, 3), "   ");

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());

    assert_eq!(outcome.entries.len(), 1, "blank cells must not create entries");
}

#[test]
fn rows_without_a_name_label_are_not_counted() {
    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (5, 2), "FD"); // code without a name label

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());

    assert_eq!(outcome.total, 0);
    assert!(outcome.entries.is_empty());
}

// ── Overwrite detection ────────────────────────────────────────

#[test]
fn preview_counts_entries_that_would_overwrite() {
    let store = RosterStore::in_memory().unwrap();
    store.migrate().unwrap();
    let a = PersonRef::person(1);
    store
        .set_duty_roster_entry(&DutyRosterUpdate::value(a, date(2026, 6, 1), "FD"))
        .unwrap();
    // Slot-only record: empty value, not an overwrite.
    store
        .set_duty_roster_entry(&DutyRosterUpdate::slot(a, date(2026, 6, 2), "rtw1_tag_1"))
        .unwrap();

    let layout = SheetLayout::default();
    let mut range = grid();
    set_text(&mut range, (layout.header_row, 2), "01.06.2026");
    set_text(&mut range, (layout.header_row, 3), "02.06.2026");
    set_text(&mut range, (layout.header_row, 4), "03.06.2026");
    set_text(&mut range, (3, 0), "Meyer, Anna");
    set_text(&mut range, (3, 2), "SD");
    set_text(&mut range, (3, 3), "SD");
    set_text(&mut range, (3, 4), "SD");

    let outcome = resolve_range(&range, &layout, &directory(), 2026, Some(6), &HashMap::new());
    let overwrites = count_overwrites(&store, &outcome.entries).unwrap();

    assert_eq!(
        overwrites, 1,
        "only the record with a non-empty duty code counts as an overwrite"
    );
}
