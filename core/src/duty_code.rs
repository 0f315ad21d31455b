//! Duty-code classification.
//!
//! Each configured shift-type code maps to one evaluation category via the
//! `auswertung_<code>` settings. Unknown or empty codes classify as `Off`.

use crate::types::DutyCategory;
use std::collections::HashMap;

/// Category a caller is filling a slot for. `Any` is used by pure presence
/// checks (e.g. "worked at all this month").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredCategory {
    Day,
    Night,
    TwentyFourHour,
    Any,
}

#[derive(Debug, Clone, Default)]
pub struct DutyCodeClassifier {
    categories: HashMap<String, DutyCategory>,
}

impl DutyCodeClassifier {
    pub fn new(categories: HashMap<String, DutyCategory>) -> Self {
        Self { categories }
    }

    pub fn classify(&self, code: &str) -> DutyCategory {
        self.categories.get(code).copied().unwrap_or(DutyCategory::Off)
    }

    pub fn is_configured_code(&self, code: &str) -> bool {
        self.categories.contains_key(code)
    }

    /// Whether a person holding `code` on a date can fill a slot of the
    /// desired category. A 24h code satisfies both day and night demand.
    pub fn is_eligible(&self, code: &str, desired: DesiredCategory) -> bool {
        let cat = self.classify(code);
        match desired {
            DesiredCategory::Any => true,
            DesiredCategory::Day => {
                matches!(cat, DutyCategory::Day | DutyCategory::TwentyFourHour)
            }
            DesiredCategory::Night => {
                matches!(cat, DutyCategory::Night | DutyCategory::TwentyFourHour)
            }
            DesiredCategory::TwentyFourHour => cat == DutyCategory::TwentyFourHour,
        }
    }
}
