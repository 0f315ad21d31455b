//! Duty-code classifier tests: category lookup defaults and the eligibility
//! matrix used to filter slot candidates.

use roster_core::{
    duty_code::{DesiredCategory, DutyCodeClassifier},
    types::DutyCategory,
};
use std::collections::HashMap;

fn classifier() -> DutyCodeClassifier {
    let mut categories = HashMap::new();
    categories.insert("FD".to_string(), DutyCategory::Day);
    categories.insert("ND".to_string(), DutyCategory::Night);
    categories.insert("24".to_string(), DutyCategory::TwentyFourHour);
    categories.insert("IW".to_string(), DutyCategory::Itw);
    categories.insert("U".to_string(), DutyCategory::Off);
    DutyCodeClassifier::new(categories)
}

#[test]
fn unknown_codes_classify_as_off() {
    let c = classifier();
    assert_eq!(c.classify("FD"), DutyCategory::Day);
    assert_eq!(c.classify("xyz"), DutyCategory::Off);
    assert_eq!(c.classify(""), DutyCategory::Off);
}

#[test]
fn day_demand_accepts_day_and_24h() {
    let c = classifier();
    assert!(c.is_eligible("FD", DesiredCategory::Day));
    assert!(c.is_eligible("24", DesiredCategory::Day));
    assert!(!c.is_eligible("ND", DesiredCategory::Day));
    assert!(!c.is_eligible("U", DesiredCategory::Day));
}

#[test]
fn night_demand_accepts_night_and_24h() {
    let c = classifier();
    assert!(c.is_eligible("ND", DesiredCategory::Night));
    assert!(c.is_eligible("24", DesiredCategory::Night));
    assert!(!c.is_eligible("FD", DesiredCategory::Night));
}

#[test]
fn full_day_demand_requires_exact_24h() {
    let c = classifier();
    assert!(c.is_eligible("24", DesiredCategory::TwentyFourHour));
    assert!(!c.is_eligible("FD", DesiredCategory::TwentyFourHour));
    assert!(!c.is_eligible("ND", DesiredCategory::TwentyFourHour));
}

#[test]
fn any_demand_accepts_everything() {
    let c = classifier();
    assert!(c.is_eligible("FD", DesiredCategory::Any));
    assert!(c.is_eligible("U", DesiredCategory::Any));
    assert!(c.is_eligible("unknown", DesiredCategory::Any));
}
