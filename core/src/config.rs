//! Typed access to the key-value settings store.
//!
//! The settings table is the configuration surface shared with the outer
//! application: plain keys for the core (`department`, `year`, `itw`,
//! `rosterImportPath`) and per-duty-code keys (`auswertung_<code>`,
//! `color_<code>`).

use crate::{
    duty_code::DutyCodeClassifier,
    error::RosterResult,
    store::RosterStore,
    types::DutyCategory,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const KEY_DEPARTMENT: &str = "department";
pub const KEY_YEAR: &str = "year";
pub const KEY_ITW: &str = "itw";
pub const KEY_ROSTER_IMPORT_PATH: &str = "rosterImportPath";
pub const EVALUATION_PREFIX: &str = "auswertung_";
pub const COLOR_PREFIX: &str = "color_";

/// Snapshot of the core settings. Missing or malformed values fall back to
/// defaults instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreSettings {
    pub department: u8,
    pub year: i32,
    pub itw_enabled: bool,
    pub roster_import_path: Option<String>,
}

impl CoreSettings {
    pub fn load(store: &RosterStore) -> RosterResult<Self> {
        let department = store
            .get_setting(KEY_DEPARTMENT)?
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|d| (1..=3).contains(d))
            .unwrap_or(1);
        let year = store
            .get_setting(KEY_YEAR)?
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or_else(|| chrono::Local::now().year());
        let itw_enabled = store
            .get_setting(KEY_ITW)?
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let roster_import_path = store.get_setting(KEY_ROSTER_IMPORT_PATH)?;
        Ok(Self {
            department,
            year,
            itw_enabled,
            roster_import_path,
        })
    }

    pub fn save(&self, store: &RosterStore) -> RosterResult<()> {
        store.set_setting(KEY_DEPARTMENT, &self.department.to_string())?;
        store.set_setting(KEY_YEAR, &self.year.to_string())?;
        store.set_setting(KEY_ITW, if self.itw_enabled { "true" } else { "false" })?;
        match &self.roster_import_path {
            Some(path) => store.set_setting(KEY_ROSTER_IMPORT_PATH, path)?,
            None => store.delete_setting(KEY_ROSTER_IMPORT_PATH)?,
        }
        Ok(())
    }
}

/// Build the classifier from the configured shift types and their
/// `auswertung_<code>` category settings. Codes without a category setting
/// classify as `Off`, same as unknown codes.
pub fn load_classifier(store: &RosterStore) -> RosterResult<DutyCodeClassifier> {
    let mut categories = HashMap::new();
    for st in store.list_shift_types()? {
        let key = format!("{EVALUATION_PREFIX}{}", st.code);
        let category = store
            .get_setting(&key)?
            .as_deref()
            .and_then(DutyCategory::parse)
            .unwrap_or(DutyCategory::Off);
        categories.insert(st.code, category);
    }
    Ok(DutyCodeClassifier::new(categories))
}

pub fn set_evaluation_category(
    store: &RosterStore,
    code: &str,
    category: DutyCategory,
) -> RosterResult<()> {
    store.set_setting(&format!("{EVALUATION_PREFIX}{code}"), category.as_str())
}

pub fn color_for_code(store: &RosterStore, code: &str) -> RosterResult<Option<String>> {
    store.get_setting(&format!("{COLOR_PREFIX}{code}"))
}

pub fn set_color_for_code(store: &RosterStore, code: &str, color: &str) -> RosterResult<()> {
    store.set_setting(&format!("{COLOR_PREFIX}{code}"), color)
}
