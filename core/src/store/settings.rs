use super::RosterStore;
use crate::error::RosterResult;
use rusqlite::{params, OptionalExtension};

impl RosterStore {
    // ── Settings ───────────────────────────────────────────────

    pub fn set_setting(&self, key: &str, value: &str) -> RosterResult<()> {
        self.conn().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> RosterResult<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn delete_setting(&self, key: &str) -> RosterResult<()> {
        self.conn()
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// All settings whose key starts with `prefix`, as (full key, value).
    pub fn settings_with_prefix(&self, prefix: &str) -> RosterResult<Vec<(String, String)>> {
        // substr comparison instead of LIKE: prefixes contain '_', which
        // LIKE would treat as a wildcard.
        let mut stmt = self.conn().prepare(
            "SELECT key, value FROM settings
             WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key ASC",
        )?;
        let rows = stmt.query_map(params![prefix], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
