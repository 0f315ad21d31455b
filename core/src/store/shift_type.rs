use super::RosterStore;
use crate::error::RosterResult;
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// Vocabulary entry duty-code values are drawn from. Evaluation category and
/// display color live in the settings table (`auswertung_<code>`,
/// `color_<code>`), not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftType {
    pub code: String,
    pub description: String,
}

impl RosterStore {
    // ── Shift types ────────────────────────────────────────────

    pub fn upsert_shift_type(&self, code: &str, description: &str) -> RosterResult<()> {
        self.conn().execute(
            "INSERT INTO shift_type (code, description) VALUES (?1, ?2)
             ON CONFLICT (code) DO UPDATE SET description = ?2",
            params![code, description],
        )?;
        Ok(())
    }

    pub fn delete_shift_type(&self, code: &str) -> RosterResult<()> {
        self.conn()
            .execute("DELETE FROM shift_type WHERE code = ?1", params![code])?;
        Ok(())
    }

    pub fn list_shift_types(&self) -> RosterResult<Vec<ShiftType>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT code, description FROM shift_type ORDER BY code ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(ShiftType {
                code: row.get(0)?,
                description: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn is_shift_type_code(&self, code: &str) -> RosterResult<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM shift_type WHERE code = ?1",
            params![code],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
