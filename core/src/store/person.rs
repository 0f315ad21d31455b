use super::RosterStore;
use crate::{error::RosterResult, types::PersonId};
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// Staff member. Lifecycle is owned by personnel management; the roster only
/// references persons by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub surname: String,
    pub given_name: String,
    pub part_time_pct: f64,
    pub qual_commander: bool,
    pub qual_heavy_commander: bool,
    pub qual_nef: bool,
    pub qual_itw_machinist: bool,
    pub qual_itw_commander: bool,
    pub sort: i64,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Apprentice {
    pub id: PersonId,
    pub surname: String,
    pub given_name: String,
    pub training_year: i64,
    pub sort: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: PersonId,
    pub surname: String,
    pub given_name: String,
}

fn person_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        surname: row.get(1)?,
        given_name: row.get(2)?,
        part_time_pct: row.get(3)?,
        qual_commander: row.get::<_, i32>(4)? != 0,
        qual_heavy_commander: row.get::<_, i32>(5)? != 0,
        qual_nef: row.get::<_, i32>(6)? != 0,
        qual_itw_machinist: row.get::<_, i32>(7)? != 0,
        qual_itw_commander: row.get::<_, i32>(8)? != 0,
        sort: row.get(9)?,
        archived: row.get::<_, i32>(10)? != 0,
    })
}

const PERSON_COLS: &str = "id, surname, given_name, part_time_pct, qual_commander,
     qual_heavy_commander, qual_nef, qual_itw_machinist, qual_itw_commander,
     sort, archived";

impl RosterStore {
    // ── Person ─────────────────────────────────────────────────

    /// Insert a staff member; returns the assigned id (ignores `p.id`).
    pub fn insert_person(&self, p: &Person) -> RosterResult<PersonId> {
        self.conn().execute(
            "INSERT INTO person (
                surname, given_name, part_time_pct, qual_commander,
                qual_heavy_commander, qual_nef, qual_itw_machinist,
                qual_itw_commander, sort, archived
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                &p.surname,
                &p.given_name,
                p.part_time_pct,
                p.qual_commander as i32,
                p.qual_heavy_commander as i32,
                p.qual_nef as i32,
                p.qual_itw_machinist as i32,
                p.qual_itw_commander as i32,
                p.sort,
                p.archived as i32,
            ],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn update_person(&self, p: &Person) -> RosterResult<()> {
        self.conn().execute(
            "UPDATE person SET surname = ?2, given_name = ?3, part_time_pct = ?4,
                qual_commander = ?5, qual_heavy_commander = ?6, qual_nef = ?7,
                qual_itw_machinist = ?8, qual_itw_commander = ?9, sort = ?10,
                archived = ?11
             WHERE id = ?1",
            params![
                p.id,
                &p.surname,
                &p.given_name,
                p.part_time_pct,
                p.qual_commander as i32,
                p.qual_heavy_commander as i32,
                p.qual_nef as i32,
                p.qual_itw_machinist as i32,
                p.qual_itw_commander as i32,
                p.sort,
                p.archived as i32,
            ],
        )?;
        Ok(())
    }

    pub fn list_persons(&self, include_archived: bool) -> RosterResult<Vec<Person>> {
        let sql = if include_archived {
            format!("SELECT {PERSON_COLS} FROM person ORDER BY sort ASC, surname ASC")
        } else {
            format!(
                "SELECT {PERSON_COLS} FROM person WHERE archived = 0
                 ORDER BY sort ASC, surname ASC"
            )
        };
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], person_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn set_person_archived(&self, id: PersonId, archived: bool) -> RosterResult<()> {
        self.conn().execute(
            "UPDATE person SET archived = ?2 WHERE id = ?1",
            params![id, archived as i32],
        )?;
        Ok(())
    }

    // ── Apprentice ─────────────────────────────────────────────

    pub fn insert_apprentice(&self, a: &Apprentice) -> RosterResult<PersonId> {
        self.conn().execute(
            "INSERT INTO apprentice (surname, given_name, training_year, sort)
             VALUES (?1, ?2, ?3, ?4)",
            params![&a.surname, &a.given_name, a.training_year, a.sort],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn list_apprentices(&self) -> RosterResult<Vec<Apprentice>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, surname, given_name, training_year, sort
             FROM apprentice ORDER BY sort ASC, surname ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Apprentice {
                id: row.get(0)?,
                surname: row.get(1)?,
                given_name: row.get(2)?,
                training_year: row.get(3)?,
                sort: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Doctor ─────────────────────────────────────────────────

    pub fn insert_doctor(&self, d: &Doctor) -> RosterResult<PersonId> {
        self.conn().execute(
            "INSERT INTO doctor (surname, given_name) VALUES (?1, ?2)",
            params![&d.surname, &d.given_name],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn list_doctors(&self) -> RosterResult<Vec<Doctor>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, surname, given_name FROM doctor ORDER BY surname ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Doctor {
                id: row.get(0)?,
                surname: row.get(1)?,
                given_name: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
