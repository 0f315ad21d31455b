use serde::{Deserialize, Serialize};

pub type PersonId = i64;
pub type VehicleId = i64;

/// Identity space a roster entry belongs to. Staff, apprentices and doctors
/// have independent id sequences, so an entry is only unique together with
/// its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Person,
    Apprentice,
    Doctor,
}

impl PersonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Person => "person",
            PersonKind::Apprentice => "apprentice",
            PersonKind::Doctor => "doctor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "person" => Some(PersonKind::Person),
            "apprentice" => Some(PersonKind::Apprentice),
            "doctor" => Some(PersonKind::Doctor),
            _ => None,
        }
    }
}

/// Tagged reference to a roster participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonRef {
    pub kind: PersonKind,
    pub id: PersonId,
}

impl PersonRef {
    pub fn person(id: PersonId) -> Self {
        Self { kind: PersonKind::Person, id }
    }

    pub fn apprentice(id: PersonId) -> Self {
        Self { kind: PersonKind::Apprentice, id }
    }

    pub fn doctor(id: PersonId) -> Self {
        Self { kind: PersonKind::Doctor, id }
    }
}

/// Evaluation category a duty code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DutyCategory {
    Off,
    Day,
    Night,
    #[serde(rename = "24h")]
    TwentyFourHour,
    Itw,
}

impl DutyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DutyCategory::Off => "off",
            DutyCategory::Day => "day",
            DutyCategory::Night => "night",
            DutyCategory::TwentyFourHour => "24h",
            DutyCategory::Itw => "itw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(DutyCategory::Off),
            "day" => Some(DutyCategory::Day),
            "night" => Some(DutyCategory::Night),
            "24h" => Some(DutyCategory::TwentyFourHour),
            "itw" => Some(DutyCategory::Itw),
            _ => None,
        }
    }
}
