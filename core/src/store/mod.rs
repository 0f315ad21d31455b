//! SQLite persistence layer.
//!
//! RULE: Only the store modules talk to the database.
//! Engine, importer and CLI call store methods — they never execute SQL
//! directly.

mod pattern;
mod person;
mod roster;
mod settings;
mod shift_type;
mod vehicle;

pub use pattern::Holiday;
pub use person::{Apprentice, Doctor, Person};
pub use roster::{BulkUpsertOutcome, DutyRosterRecord, DutyRosterUpdate};
pub use shift_type::ShiftType;
pub use vehicle::{NefOccupancyMode, Vehicle, VehicleKind};

use crate::error::RosterResult;
use rusqlite::Connection;

pub struct RosterStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl RosterStore {
    pub fn open(path: &str) -> RosterResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RosterResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> RosterResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RosterResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
