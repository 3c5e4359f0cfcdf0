use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Sex {
    #[serde(alias = "f")]
    F,
    #[serde(alias = "m")]
    M,
    #[default]
    #[serde(alias = "o")]
    O,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::F, Sex::M, Sex::O];

    pub fn code(self) -> &'static str {
        match self {
            Sex::F => "F",
            Sex::M => "M",
            Sex::O => "O",
        }
    }

    pub fn from_code(code: &str) -> Option<Sex> {
        match code.trim().to_ascii_uppercase().as_str() {
            "F" => Some(Sex::F),
            "M" => Some(Sex::M),
            "O" => Some(Sex::O),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: u64,
    #[serde(default)]
    pub document_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Body of a patient create or update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientPayload {
    pub document_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<jiff::civil::Date>,
    pub sex: Option<Sex>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}
