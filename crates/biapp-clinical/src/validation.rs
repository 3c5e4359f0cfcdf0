//! Evaluation form validation and submission payload assembly.
//!
//! [`build_submission`] is a total function: every user-correctable problem
//! becomes a message, all messages are collected in a fixed order, and the
//! payload is produced only when there are none.

use std::collections::HashMap;

use biapp_core::MIGRAINE_DISEASE_ID;
use biapp_core::dates;
use biapp_core::models::evaluation::{KpiPayloadEntry, SubmissionPayload, TypedValue};
use biapp_core::models::kpi::KpiDefinition;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;

use crate::catalog::{self, FREQUENCY, KpiGroup, PATTERN_HISTORY, TREATMENT, code};
use crate::draft::EvaluationDraft;
use crate::rules::{self, RangeViolation};
use crate::value::parse_value;

/// Fixed user-facing messages.
pub mod message {
    pub const DATE_MISSING: &str = "Enter an evaluation date in YYYY-MM-DD format.";
    pub const DATE_INVALID: &str = "The evaluation date is not valid.";
    pub const DATE_FUTURE: &str = "The evaluation date cannot be in the future.";
    pub const PROGRESS_RANGE: &str = "Progress percent must be a number between 0 and 100.";
    pub const FREQUENCY_INCOMPLETE: &str =
        "Complete all frequency fields (headache days, migraine days and criteria).";
    pub const PATTERN_HISTORY_MISSING: &str =
        "Complete the pattern history field when recording frequency data.";
    pub const TREATMENT_INCOMPLETE: &str =
        "Complete all treatment/medication fields (medication days and type).";
    pub const NO_GROUP_COMPLETE: &str =
        "To save, complete either frequency or treatment/medication (one of the two groups).";
}

/// Every problem found in a form, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{}", .messages.join("\n"))]
pub struct ValidationErrors {
    pub messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.messages.iter().any(|m| m == message)
    }
}

/// How much of a group the form filled, counting only the group codes the
/// catalog actually publishes.
#[derive(Debug, Clone, Copy)]
struct GroupFill {
    required: usize,
    present: usize,
}

impl GroupFill {
    fn of(group: &KpiGroup, catalog: &[KpiDefinition], values: &HashMap<&str, TypedValue>) -> Self {
        let members = group.members(catalog);
        GroupFill {
            required: members.len(),
            present: members
                .iter()
                .filter(|k| values.contains_key(k.code.as_str()))
                .count(),
        }
    }

    fn filled(&self) -> bool {
        self.present > 0
    }

    /// A group the catalog does not publish can never be complete.
    fn complete(&self) -> bool {
        self.required > 0 && self.present == self.required
    }

    fn enforced(&self) -> bool {
        self.required > 0
    }
}

/// Validate a draft against the catalog and assemble the submission payload.
///
/// `today` is the caller's local date; the evaluation date may not be later.
pub fn build_submission(
    patient_id: u64,
    catalog: &[KpiDefinition],
    draft: &EvaluationDraft,
    today: Date,
) -> Result<SubmissionPayload, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let evaluation_date = check_date(&draft.evaluation_date, today, &mut errors);
    let progress_percent = check_progress(&draft.progress_percent, &mut errors);

    let mut values: HashMap<&str, TypedValue> = HashMap::new();
    let mut kpis = Vec::new();

    for kpi in catalog {
        let parsed = match parse_value(kpi, draft.value(kpi.id)) {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(e) => {
                errors.push(format!("\"{}\" {e}.", catalog::display_name(kpi)));
                continue;
            }
        };

        if let TypedValue::Numeric(n) = parsed
            && kpi.kpi_type.is_numeric()
        {
            let name = catalog::display_name(kpi);
            for violation in rules::effective_range(kpi).violations(n) {
                errors.push(match violation {
                    RangeViolation::BelowMin(min) => {
                        format!("\"{name}\" cannot be less than {min}.")
                    }
                    RangeViolation::AboveMax(max) => {
                        format!("\"{name}\" cannot be greater than {max}.")
                    }
                });
            }
        }

        kpis.push(KpiPayloadEntry::new(kpi.id, parsed.clone()));
        values.insert(kpi.code.as_str(), parsed);
    }

    let numeric = |codes: &[&str]| {
        codes
            .iter()
            .find_map(|c| values.get(c).and_then(TypedValue::as_number))
    };

    let headache_days = numeric(&[code::HEADACHE_DAYS_MONTH]);
    let migraine_days = numeric(&[code::MIGRAINE_DAYS_MONTH]);

    if let (Some(headache), Some(migraine)) = (headache_days, migraine_days)
        && migraine > headache
    {
        errors.push(format!(
            "Migraine days per month ({migraine}) cannot exceed headache days per month \
             ({headache})."
        ));
    }

    let frequency = GroupFill::of(&FREQUENCY, catalog, &values);
    let history = GroupFill::of(&PATTERN_HISTORY, catalog, &values);
    let treatment = GroupFill::of(&TREATMENT, catalog, &values);

    if frequency.filled() && !frequency.complete() {
        errors.push(message::FREQUENCY_INCOMPLETE);
    }
    if frequency.filled() && history.enforced() && !history.complete() {
        errors.push(message::PATTERN_HISTORY_MISSING);
    }
    if treatment.filled() && !treatment.complete() {
        errors.push(message::TREATMENT_INCOMPLETE);
    }
    if !frequency.complete() && !treatment.complete() {
        errors.push(message::NO_GROUP_COMPLETE);
    }

    let payload = match evaluation_date {
        Some(evaluation_date) if errors.is_empty() => SubmissionPayload {
            patient_id,
            disease_id: MIGRAINE_DISEASE_ID,
            doctor_id: None,
            evaluation_date,
            has_disease: draft.has_disease,
            progress_percent,
            disease_stage: None,
            doctor_notes: Some(draft.doctor_notes.clone()).filter(|n| !n.is_empty()),
            headache_days_month: headache_days,
            migraine_days_month: migraine_days,
            acute_medication_days_month: numeric(&[code::ACUTE_MEDICATION_DAYS_MONTH]),
            pain_intensity_avg: numeric(&[code::PAIN_INTENSITY_AVG, code::PAIN_INTENSITY_VAS]),
            disability_score: numeric(&[code::DISABILITY_MIDAS]),
            kpis,
        },
        _ => {
            debug!(patient_id, errors = errors.len(), "evaluation draft rejected");
            return Err(errors);
        }
    };

    debug!(patient_id, kpis = payload.kpis.len(), "evaluation payload built");
    Ok(payload)
}

fn check_date(raw: &str, today: Date, errors: &mut ValidationErrors) -> Option<Date> {
    if raw.trim().is_empty() {
        errors.push(message::DATE_MISSING);
        return None;
    }
    match dates::parse_input_date(raw) {
        Ok(date) if date > today => {
            errors.push(message::DATE_FUTURE);
            None
        }
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(message::DATE_INVALID);
            None
        }
    }
}

fn check_progress(raw: &str, errors: &mut ValidationErrors) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(p) if p.is_finite() && (0.0..=100.0).contains(&p) => Some(p),
        _ => {
            errors.push(message::PROGRESS_RANGE);
            None
        }
    }
}
