//! Patient form validation.

use std::sync::LazyLock;

use biapp_core::dates;
use biapp_core::models::patient::{Patient, PatientPayload, Sex};
use jiff::civil::Date;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::ValidationErrors;

static DOCUMENT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("valid document pattern"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}$").expect("valid phone pattern"));

const MAX_AGE_YEARS: i16 = 120;

/// Patient form values as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientDraft {
    #[serde(default)]
    pub document_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// `YYYY-MM-DD`, empty when unknown.
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub weight_kg: String,
    #[serde(default)]
    pub height_cm: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

impl PatientDraft {
    /// A form pre-filled from a stored patient.
    pub fn from_patient(patient: &Patient) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();

        PatientDraft {
            document_number: text(&patient.document_number),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            birth_date: patient
                .birth_date
                .as_deref()
                .and_then(dates::parse_api_date)
                .map(|d| d.to_string())
                .unwrap_or_default(),
            sex: patient.sex,
            weight_kg: number(patient.weight_kg),
            height_cm: number(patient.height_cm),
            email: text(&patient.email),
            phone: text(&patient.phone),
            notes: text(&patient.notes),
        }
    }
}

/// Validate a patient form, collecting every problem, and build the request
/// body. Strings are trimmed and empty ones sent as null.
pub fn validate_patient(draft: &PatientDraft, today: Date) -> Result<PatientPayload, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if draft.first_name.trim().is_empty() {
        errors.push("First name is required.");
    }
    if draft.last_name.trim().is_empty() {
        errors.push("Last name is required.");
    }

    let document_number = non_empty(&draft.document_number);
    if let Some(doc) = &document_number
        && !DOCUMENT_NUMBER.is_match(doc)
    {
        errors.push("The document number must have exactly 8 digits.");
    }

    let mut birth_date = None;
    if let Some(raw) = non_empty(&draft.birth_date) {
        match dates::parse_input_date(&raw) {
            Ok(date) => {
                if date > today {
                    errors.push("The birth date cannot be in the future.");
                }
                if date < dates::years_before(today, MAX_AGE_YEARS) {
                    errors.push("The birth date is too old (more than 120 years).");
                }
                birth_date = Some(date);
            }
            Err(_) => errors.push("The birth date is not valid."),
        }
    }

    let weight_kg = measurement(&draft.weight_kg, "Weight", &mut errors, |w| {
        (w > 0.0 && w <= 400.0)
            .then_some(())
            .ok_or("Weight must be between 1 and 400 kg.")
    });
    let height_cm = measurement(&draft.height_cm, "Height", &mut errors, |h| {
        (30.0..=250.0)
            .contains(&h)
            .then_some(())
            .ok_or("Height must be between 30 and 250 cm.")
    });

    let email = non_empty(&draft.email);
    if let Some(email) = &email
        && !EMAIL.is_match(email)
    {
        errors.push("The e-mail address is not valid.");
    }

    let phone = non_empty(&draft.phone);
    if let Some(phone) = &phone {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        if !PHONE.is_match(&digits) {
            errors.push("The phone number must have exactly 9 digits.");
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(PatientPayload {
        document_number,
        first_name: draft.first_name.trim().to_string(),
        last_name: draft.last_name.trim().to_string(),
        birth_date,
        sex: Some(draft.sex.unwrap_or_default()),
        weight_kg,
        height_cm,
        email,
        phone,
        notes: non_empty(&draft.notes),
    })
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse an optional numeric field and check it with `within`.
fn measurement(
    raw: &str,
    label: &str,
    errors: &mut ValidationErrors,
    within: impl Fn(f64) -> Result<(), &'static str>,
) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if let Err(message) = within(value) {
                errors.push(message);
            }
            Some(value)
        }
        _ => {
            errors.push(format!("{label} must be a number."));
            None
        }
    }
}
