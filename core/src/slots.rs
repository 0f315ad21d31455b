//! Slot-identifier vocabulary.
//!
//! A slot id names one seat on one vehicle for one part of the day:
//!
//! - RTW: `rtw<vehicleId>_tag_1` / `rtw<vehicleId>_tag_2` and the `nacht`
//!   pair — position 1 is the vehicle commander, position 2 the machinist.
//! - NEF: `nef<vehicleId>_1` — the assistant seat.
//! - ITW: `itw_1` (commander), `itw_2` (machinist), `itw_arzt` (physician).
//!
//! The roster table also carries the generic pre-planning marker `"V"` in its
//! `value` field; that marker is not a slot id.

/// Prefixes that mark a `slot` field as a vehicle/ITW seat. Clearing slot
/// assignments only touches entries matching one of these.
pub const RESERVED_SLOT_PREFIXES: [&str; 3] = ["rtw", "nef", "itw"];

/// Pre-planning marker written into `value` by the importer UI.
pub const PREPLAN_MARKER: &str = "V";

pub const ITW_COMMANDER_SLOT: &str = "itw_1";
pub const ITW_MACHINIST_SLOT: &str = "itw_2";
pub const ITW_PHYSICIAN_SLOT: &str = "itw_arzt";

pub fn rtw_slot(vehicle_id: i64, night: bool, position: u8) -> String {
    let part = if night { "nacht" } else { "tag" };
    format!("rtw{vehicle_id}_{part}_{position}")
}

pub fn nef_slot(vehicle_id: i64) -> String {
    format!("nef{vehicle_id}_1")
}

pub fn is_reserved_slot(slot: &str) -> bool {
    RESERVED_SLOT_PREFIXES.iter().any(|p| slot.starts_with(p))
}

pub fn is_itw_slot(slot: &str) -> bool {
    slot.starts_with("itw")
}

/// RTW machinist seat (position 2). This is the role apprentices may fill;
/// each filled one reduces the month's position demand.
pub fn is_rtw_machinist_slot(slot: &str) -> bool {
    slot.starts_with("rtw") && slot.ends_with("_2")
}

/// Weight of a slot in the year-to-date driven count. RTW and ITW crew seats
/// count 1, the NEF assistant seat counts 2 (a 24h occupancy), the ITW
/// physician seat belongs to doctors and never counts toward staff totals.
pub fn driven_weight(slot: &str) -> u32 {
    if slot == ITW_PHYSICIAN_SLOT {
        0
    } else if slot.starts_with("nef") {
        2
    } else if slot.starts_with("rtw") || slot.starts_with("itw") {
        1
    } else {
        0
    }
}
