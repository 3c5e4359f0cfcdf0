//! Read-back summary of a stored evaluation, grouped the same way as the form.

use std::cmp::Reverse;

use biapp_core::dates;
use biapp_core::models::evaluation::{Evaluation, TypedValue};
use serde::Serialize;
use ts_rs::TS;

use crate::catalog::code;
use crate::rules::{self, TRI_STATE_OPTIONS};

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct SummarySection {
    pub title: String,
    pub items: Vec<SummaryItem>,
}

struct SectionBuilder {
    title: &'static str,
    items: Vec<SummaryItem>,
}

impl SectionBuilder {
    fn new(title: &'static str) -> Self {
        SectionBuilder {
            title,
            items: Vec::new(),
        }
    }

    fn item(&mut self, label: &str, value: Option<String>) -> &mut Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.items.push(SummaryItem {
                label: label.to_string(),
                value,
            });
        }
        self
    }

    fn finish(self, out: &mut Vec<SummarySection>) {
        if !self.items.is_empty() {
            out.push(SummarySection {
                title: self.title.to_string(),
                items: self.items,
            });
        }
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

fn text(value: TypedValue) -> String {
    match value {
        TypedValue::Numeric(n) => n.to_string(),
        TypedValue::Text(s) => s,
        TypedValue::Boolean(b) => yes_no(b),
    }
}

/// Label of an enumerated value, or the value itself when it is not listed.
fn option_label(options: &[rules::SelectOption], value: TypedValue) -> String {
    let raw = text(value);
    options
        .iter()
        .find(|o| o.value == raw)
        .map(|o| o.label.to_string())
        .unwrap_or(raw)
}

/// Sections with at least one filled item, in form order.
pub fn summarize(evaluation: &Evaluation) -> Vec<SummarySection> {
    let number = |v: Option<f64>| v.map(|n| n.to_string());
    let mut sections = Vec::new();

    let mut frequency = SectionBuilder::new("Frequency");
    frequency
        .item("Headache days/month", number(evaluation.headache_days_month))
        .item("Migraine days/month", number(evaluation.migraine_days_month))
        .item(
            "Meets chronic migraine criteria",
            evaluation
                .kpi_value(code::MEETS_CM_CRITERIA)
                .map(|v| option_label(TRI_STATE_OPTIONS, v)),
        );
    frequency.finish(&mut sections);

    let mut history = SectionBuilder::new("Pattern history");
    history.item(
        "Pattern duration (months)",
        evaluation.kpi_value(code::HEADACHE_DURATION_MONTHS).map(text),
    );
    history.finish(&mut sections);

    let mut treatment = SectionBuilder::new("Treatment / medication");
    treatment
        .item(
            "Acute medication days/month",
            number(evaluation.acute_medication_days_month),
        )
        .item(
            "Acute medication type",
            evaluation
                .kpi_value(code::ACUTE_MEDICATION_TYPE)
                .map(|v| option_label(rules::ACUTE_MEDICATION_TYPE_OPTIONS, v)),
        )
        .item(
            "Medication overuse suspected",
            evaluation.medication_overuse_suspected.map(yes_no),
        );
    treatment.finish(&mut sections);

    let mut impact = SectionBuilder::new("Impact");
    impact
        .item(
            "Average pain intensity",
            evaluation.pain_intensity_avg.map(|p| format!("{p}/10")),
        )
        .item("Disability (MIDAS)", number(evaluation.disability_score))
        .item(
            "Progress / severity",
            evaluation.progress_percent.map(|p| format!("{p}%")),
        );
    impact.finish(&mut sections);

    let mut features = SectionBuilder::new("Features");
    features.item("Usual aura", evaluation.aura_presence.map(yes_no));
    features.finish(&mut sections);

    let mut judgement = SectionBuilder::new("Clinical judgement");
    judgement
        .item("Has chronic migraine", evaluation.has_disease.map(yes_no))
        .item("Doctor notes", evaluation.doctor_notes.clone());
    judgement.finish(&mut sections);

    sections
}

/// Order evaluations by date, newest first. Undated ones go last.
pub fn newest_first(evaluations: &mut [Evaluation]) {
    evaluations.sort_by_key(|e| {
        Reverse(
            e.evaluation_date
                .as_deref()
                .and_then(dates::parse_api_date),
        )
    });
}
