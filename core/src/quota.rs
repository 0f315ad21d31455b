//! Fairness targets and remaining-shift counts.
//!
//! All demand figures derive from three sources: the department pattern
//! calendar, the month's vehicle activations, and the stored roster entries.
//! The formula helpers are free functions over plain numbers; the engine
//! assembles their inputs from the store.

use crate::{
    dates,
    duty_code::DutyCodeClassifier,
    error::RosterResult,
    pattern_calendar::{PatternCalendar, PatternKind},
    slots,
    store::{Person, RosterStore, VehicleKind},
    types::{DutyCategory, PersonId, PersonKind},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ── Formula helpers ────────────────────────────────────────────

/// Seats to fill in a month: each department day staffs 4 seats per RTW and
/// 2 per NEF, ITW duties add one each, apprentice-held machinist seats come
/// off the top. Clamped at zero.
pub fn position_demand(
    dept_shifts: u32,
    rtw_vehicles: u32,
    nef_vehicles: u32,
    itw_shifts: u32,
    apprentice_machinist_shifts: u32,
) -> u32 {
    let raw = dept_shifts as i64 * (rtw_vehicles as i64 * 4 + nef_vehicles as i64 * 2)
        + itw_shifts as i64
        - apprentice_machinist_shifts as i64;
    raw.max(0) as u32
}

pub fn demand_per_staff(demand: u32, active_staff: usize) -> f64 {
    if active_staff == 0 {
        0.0
    } else {
        demand as f64 / active_staff as f64
    }
}

/// Monthly fairness target, proportional to the person's combined load.
/// Zero ("no target") when the month has no average load to scale by.
pub fn monthly_target(demand_per_staff: f64, average_combined_load: f64, combined_load: u32) -> u32 {
    if demand_per_staff <= 0.0 || average_combined_load <= 0.0 {
        return 0;
    }
    (demand_per_staff / average_combined_load * combined_load as f64).round() as u32
}

/// Display-only variant: staff holding the heavy-vehicle qualification enter
/// with 0.75 of their combined load. Kept alongside [`monthly_target`]
/// deliberately; which of the two is canonical is an open product question.
pub fn monthly_target_heavy_weighted(
    demand_per_staff: f64,
    average_combined_load: f64,
    combined_load: u32,
    heavy_qualified: bool,
) -> u32 {
    if demand_per_staff <= 0.0 || average_combined_load <= 0.0 {
        return 0;
    }
    let load = if heavy_qualified {
        combined_load as f64 * 0.75
    } else {
        combined_load as f64
    };
    (demand_per_staff / average_combined_load * load).round() as u32
}

// ── Reports ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMonthTarget {
    pub person_id: PersonId,
    pub surname: String,
    pub given_name: String,
    pub combined_load: u32,
    pub target: u32,
    /// Heavy-vehicle-weighted display variant of `target`.
    pub target_heavy_weighted: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthQuota {
    pub year: i32,
    pub month: u32,
    pub dept_shifts: u32,
    pub rtw_vehicles: u32,
    pub nef_vehicles: u32,
    pub itw_shifts: u32,
    pub apprentice_machinist_shifts: u32,
    pub position_demand: u32,
    pub active_staff: usize,
    pub demand_per_staff: f64,
    pub average_combined_load: f64,
    pub targets: Vec<StaffMonthTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffYearSummary {
    pub person_id: PersonId,
    pub surname: String,
    pub given_name: String,
    pub yearly_target: u32,
    pub yearly_driven: u32,
    pub remaining: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearQuota {
    pub year: i32,
    pub staff: Vec<StaffYearSummary>,
}

// ── Engine ─────────────────────────────────────────────────────

pub struct QuotaEngine<'a> {
    store: &'a RosterStore,
    classifier: DutyCodeClassifier,
    department: u8,
}

impl<'a> QuotaEngine<'a> {
    pub fn new(store: &'a RosterStore, classifier: DutyCodeClassifier, department: u8) -> Self {
        Self {
            store,
            classifier,
            department,
        }
    }

    /// An entry occupies an ITW duty when it holds an ITW seat or its duty
    /// code classifies as `itw`.
    fn is_itw_assignment(&self, value: &str, slot: &str) -> bool {
        slots::is_itw_slot(slot) || self.classifier.classify(value) == DutyCategory::Itw
    }

    /// Days of the month whose department-pattern symbol matches the
    /// configured department. Unclassified days (no pattern yet) count zero.
    pub fn dept_shifts_in_month(&self, year: i32, month: u32) -> RosterResult<u32> {
        let sequences = self.store.load_patterns(PatternKind::Department)?;
        let calendar = PatternCalendar::department();
        let wanted = self.department.to_string();
        let count = dates::days_in_month(year, month)
            .into_iter()
            .filter(|d| calendar.symbol_for(*d, &sequences).as_deref() == Some(wanted.as_str()))
            .count();
        Ok(count as u32)
    }

    /// ITW duty days planned by the pattern calendar, with holidays
    /// suppressed.
    pub fn itw_duty_days(&self, year: i32, month: u32) -> RosterResult<Vec<NaiveDate>> {
        let sequences = self.store.load_patterns(PatternKind::Itw)?;
        let holidays: HashSet<NaiveDate> = self
            .store
            .load_holidays()?
            .into_iter()
            .map(|h| h.date)
            .collect();
        let calendar = PatternCalendar::itw();
        Ok(dates::days_in_month(year, month)
            .into_iter()
            .filter(|d| {
                calendar.symbol_for(*d, &sequences).as_deref() == Some("IW")
                    && !holidays.contains(d)
            })
            .collect())
    }

    pub fn month_report(&self, year: i32, month: u32) -> RosterResult<MonthQuota> {
        let dept_shifts = self.dept_shifts_in_month(year, month)?;
        let rtw_vehicles = self
            .store
            .active_vehicle_count(VehicleKind::Rtw, year, month)?;
        let nef_vehicles = self
            .store
            .active_vehicle_count(VehicleKind::Nef, year, month)?;

        let entries = self.store.entries_in_month(year, month)?;
        let itw_shifts = entries
            .iter()
            .filter(|e| self.is_itw_assignment(&e.value, &e.slot))
            .count() as u32;
        let apprentice_machinist_shifts = entries
            .iter()
            .filter(|e| {
                e.person.kind == PersonKind::Apprentice && slots::is_rtw_machinist_slot(&e.slot)
            })
            .count() as u32;

        let demand = position_demand(
            dept_shifts,
            rtw_vehicles,
            nef_vehicles,
            itw_shifts,
            apprentice_machinist_shifts,
        );

        // Per-staff month stats from the same entry pass.
        let mut active: HashSet<PersonId> = HashSet::new();
        let mut loads: HashMap<PersonId, u32> = HashMap::new();
        for e in entries.iter().filter(|e| e.person.kind == PersonKind::Person) {
            if self.classifier.classify(&e.value) != DutyCategory::Off {
                active.insert(e.person.id);
            }
            let mut load = 0;
            if self.classifier.classify(&e.value) == DutyCategory::TwentyFourHour {
                load += 1;
            }
            if self.is_itw_assignment(&e.value, &e.slot) {
                load += 1;
            }
            if load > 0 {
                *loads.entry(e.person.id).or_insert(0) += load;
            }
        }

        let dps = demand_per_staff(demand, active.len());
        let loaded: Vec<u32> = loads.values().copied().filter(|l| *l > 0).collect();
        let average_combined_load = if loaded.is_empty() {
            0.0
        } else {
            loaded.iter().sum::<u32>() as f64 / loaded.len() as f64
        };

        let mut targets = Vec::new();
        for p in self.store.list_persons(false)? {
            let load = loads.get(&p.id).copied().unwrap_or(0);
            targets.push(StaffMonthTarget {
                person_id: p.id,
                surname: p.surname.clone(),
                given_name: p.given_name.clone(),
                combined_load: load,
                target: monthly_target(dps, average_combined_load, load),
                target_heavy_weighted: monthly_target_heavy_weighted(
                    dps,
                    average_combined_load,
                    load,
                    p.qual_heavy_commander,
                ),
            });
        }

        log::debug!(
            "quota {year}-{month:02}: dept_shifts={dept_shifts} rtw={rtw_vehicles} \
             nef={nef_vehicles} itw={itw_shifts} demand={demand} active={}",
            active.len()
        );

        Ok(MonthQuota {
            year,
            month,
            dept_shifts,
            rtw_vehicles,
            nef_vehicles,
            itw_shifts,
            apprentice_machinist_shifts,
            position_demand: demand,
            active_staff: active.len(),
            demand_per_staff: dps,
            average_combined_load,
            targets,
        })
    }

    /// Year-to-date weighted count of slots actually held by each staff
    /// member. Apprentice and doctor entries never count here.
    pub fn yearly_driven(&self, year: i32) -> RosterResult<HashMap<PersonId, u32>> {
        let mut driven: HashMap<PersonId, u32> = HashMap::new();
        for e in self.store.entries_in_year(year)? {
            if e.person.kind != PersonKind::Person {
                continue;
            }
            let weight = slots::driven_weight(&e.slot);
            if weight > 0 {
                *driven.entry(e.person.id).or_insert(0) += weight;
            }
        }
        Ok(driven)
    }

    pub fn year_report(&self, year: i32) -> RosterResult<YearQuota> {
        let persons: Vec<Person> = self.store.list_persons(false)?;
        let mut yearly_target: HashMap<PersonId, u32> = HashMap::new();
        for month in 1..=12 {
            let report = self.month_report(year, month)?;
            for t in report.targets {
                *yearly_target.entry(t.person_id).or_insert(0) += t.target;
            }
        }
        let driven = self.yearly_driven(year)?;

        let staff = persons
            .into_iter()
            .map(|p| {
                let target = yearly_target.get(&p.id).copied().unwrap_or(0);
                let done = driven.get(&p.id).copied().unwrap_or(0);
                StaffYearSummary {
                    person_id: p.id,
                    surname: p.surname,
                    given_name: p.given_name,
                    yearly_target: target,
                    yearly_driven: done,
                    remaining: target as i64 - done as i64,
                }
            })
            .collect();

        Ok(YearQuota { year, staff })
    }
}
