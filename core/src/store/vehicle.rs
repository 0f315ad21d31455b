use super::RosterStore;
use crate::{error::RosterResult, types::VehicleId};
use rusqlite::params;
use serde::{Deserialize, Serialize};

/// Vehicle family. RTW = rescue transport, NEF = emergency-physician vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Rtw,
    Nef,
}

impl VehicleKind {
    fn table(&self) -> &'static str {
        match self {
            VehicleKind::Rtw => "rtw_vehicle",
            VehicleKind::Nef => "nef_vehicle",
        }
    }

    fn month_table(&self) -> &'static str {
        match self {
            VehicleKind::Rtw => "rtw_vehicle_month",
            VehicleKind::Nef => "nef_vehicle_month",
        }
    }
}

/// NEF occupancy: a round-the-clock seat or a daytime-only one. Stored for
/// the roster UI; the quota formulas weigh a NEF seat as 2 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NefOccupancyMode {
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "day")]
    DayOnly,
}

impl NefOccupancyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NefOccupancyMode::TwentyFourHour => "24h",
            NefOccupancyMode::DayOnly => "day",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "24h" => Some(NefOccupancyMode::TwentyFourHour),
            "day" => Some(NefOccupancyMode::DayOnly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    pub name: String,
    pub sort: i64,
    /// Soft delete: the vehicle drops out of demand from this year onward.
    pub archived_year: Option<i32>,
    /// NEF only; `None` for RTW vehicles.
    pub occupancy_mode: Option<NefOccupancyMode>,
}

impl Vehicle {
    /// Active for `year` when not archived, or archived later than `year`.
    pub fn is_active_in_year(&self, year: i32) -> bool {
        self.archived_year.is_none_or(|a| a > year)
    }
}

impl RosterStore {
    // ── Vehicles ───────────────────────────────────────────────

    pub fn insert_rtw_vehicle(&self, name: &str, sort: i64) -> RosterResult<VehicleId> {
        self.conn().execute(
            "INSERT INTO rtw_vehicle (name, sort) VALUES (?1, ?2)",
            params![name, sort],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn insert_nef_vehicle(
        &self,
        name: &str,
        sort: i64,
        mode: NefOccupancyMode,
    ) -> RosterResult<VehicleId> {
        self.conn().execute(
            "INSERT INTO nef_vehicle (name, sort, occupancy_mode) VALUES (?1, ?2, ?3)",
            params![name, sort, mode.as_str()],
        )?;
        Ok(self.conn().last_insert_rowid())
    }

    pub fn list_vehicles(&self, kind: VehicleKind) -> RosterResult<Vec<Vehicle>> {
        let sql = match kind {
            VehicleKind::Rtw => {
                "SELECT id, name, sort, archived_year, NULL FROM rtw_vehicle
                 ORDER BY sort ASC, id ASC"
            }
            VehicleKind::Nef => {
                "SELECT id, name, sort, archived_year, occupancy_mode FROM nef_vehicle
                 ORDER BY sort ASC, id ASC"
            }
        };
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(Vehicle {
                id: row.get(0)?,
                kind,
                name: row.get(1)?,
                sort: row.get(2)?,
                archived_year: row.get(3)?,
                occupancy_mode: row
                    .get::<_, Option<String>>(4)?
                    .as_deref()
                    .and_then(NefOccupancyMode::parse),
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn set_vehicle_archived_year(
        &self,
        kind: VehicleKind,
        id: VehicleId,
        archived_year: Option<i32>,
    ) -> RosterResult<()> {
        let sql = format!("UPDATE {} SET archived_year = ?2 WHERE id = ?1", kind.table());
        self.conn().execute(&sql, params![id, archived_year])?;
        Ok(())
    }

    // ── Month activation ───────────────────────────────────────

    /// Enable/disable a vehicle for one month without archiving it.
    pub fn set_vehicle_month_enabled(
        &self,
        kind: VehicleKind,
        vehicle_id: VehicleId,
        year: i32,
        month: u32,
        enabled: bool,
    ) -> RosterResult<()> {
        let sql = format!(
            "INSERT INTO {} (vehicle_id, year, month, enabled) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (vehicle_id, year, month) DO UPDATE SET enabled = ?4",
            kind.month_table()
        );
        self.conn()
            .execute(&sql, params![vehicle_id, year, month, enabled as i32])?;
        Ok(())
    }

    /// Month-activation flag; true when no row exists.
    pub fn vehicle_month_enabled(
        &self,
        kind: VehicleKind,
        vehicle_id: VehicleId,
        year: i32,
        month: u32,
    ) -> RosterResult<bool> {
        let sql = format!(
            "SELECT enabled FROM {} WHERE vehicle_id = ?1 AND year = ?2 AND month = ?3",
            kind.month_table()
        );
        let enabled: Option<i32> = self
            .conn()
            .query_row(&sql, params![vehicle_id, year, month], |row| row.get(0))
            .ok();
        Ok(enabled.is_none_or(|e| e != 0))
    }

    /// Vehicles counting toward demand for the month: not archived for the
    /// year and not disabled via the month flag.
    pub fn active_vehicle_count(
        &self,
        kind: VehicleKind,
        year: i32,
        month: u32,
    ) -> RosterResult<u32> {
        let sql = format!(
            "SELECT COUNT(*) FROM {v} v
             LEFT JOIN {m} m ON m.vehicle_id = v.id AND m.year = ?1 AND m.month = ?2
             WHERE (v.archived_year IS NULL OR v.archived_year > ?1)
               AND COALESCE(m.enabled, 1) = 1",
            v = kind.table(),
            m = kind.month_table()
        );
        let count: i64 = self
            .conn()
            .query_row(&sql, params![year, month], |row| row.get(0))?;
        Ok(count as u32)
    }
}
