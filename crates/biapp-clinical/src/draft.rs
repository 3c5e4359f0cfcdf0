//! The evaluation form's state: scalar fields plus touched KPI values.

use std::collections::BTreeMap;

use biapp_core::dates;
use biapp_core::models::evaluation::Evaluation;
use biapp_core::models::kpi::{KpiDefinition, KpiType};
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ClinicalError;
use crate::value::RawValue;

/// Current form values. A KPI id missing from `kpi_values` was never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvaluationDraft {
    /// As typed, expected `YYYY-MM-DD`.
    pub evaluation_date: String,
    pub has_disease: bool,
    /// As typed; empty means not provided.
    pub progress_percent: String,
    pub doctor_notes: String,
    pub kpi_values: BTreeMap<u64, RawValue>,
}

impl EvaluationDraft {
    /// An empty form dated today.
    pub fn new(today: Date) -> Self {
        EvaluationDraft {
            evaluation_date: today.to_string(),
            has_disease: false,
            progress_percent: String::new(),
            doctor_notes: String::new(),
            kpi_values: BTreeMap::new(),
        }
    }

    /// A form pre-filled with an existing evaluation's scalar fields. KPI
    /// values are applied separately, once the catalog is known, through
    /// [`EvaluationDraft::prefill_kpis`].
    pub fn from_evaluation(evaluation: &Evaluation, today: Date) -> Self {
        let evaluation_date = evaluation
            .evaluation_date
            .as_deref()
            .and_then(dates::parse_api_date)
            .unwrap_or(today);

        EvaluationDraft {
            evaluation_date: evaluation_date.to_string(),
            has_disease: evaluation.has_disease.unwrap_or(false),
            progress_percent: evaluation
                .progress_percent
                .map(|p| p.to_string())
                .unwrap_or_default(),
            doctor_notes: evaluation.doctor_notes.clone().unwrap_or_default(),
            kpi_values: BTreeMap::new(),
        }
    }

    /// Copy stored KPI values into the form, overwriting what is there.
    /// Records without a KPI id or without any value are skipped.
    pub fn prefill_kpis(&mut self, evaluation: &Evaluation) -> usize {
        let mut applied = 0;
        for stored in &evaluation.kpi_values {
            if let (Some(kpi_id), Some(value)) = (stored.kpi_id, stored.value()) {
                self.kpi_values.insert(kpi_id, value.into());
                applied += 1;
            }
        }
        applied
    }

    pub fn value(&self, kpi_id: u64) -> Option<&RawValue> {
        self.kpi_values.get(&kpi_id)
    }

    /// Record an edit. Toggles on boolean KPIs are stored as booleans when
    /// the input reads as one; anything else is kept verbatim for the
    /// validator to judge.
    pub fn set_value(&mut self, kpi: &KpiDefinition, raw: RawValue) {
        let raw = match (kpi.kpi_type, &raw) {
            (KpiType::Boolean, RawValue::Number(n)) => RawValue::Bool(*n != 0.0),
            (KpiType::Boolean, RawValue::Text(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => RawValue::Bool(true),
                "false" | "0" => RawValue::Bool(false),
                _ => raw,
            },
            _ => raw,
        };
        self.kpi_values.insert(kpi.id, raw);
    }

    /// Forget a KPI value, returning the field to "untouched".
    pub fn clear_value(&mut self, kpi_id: u64) -> Option<RawValue> {
        self.kpi_values.remove(&kpi_id)
    }

    /// Record an edit addressed by KPI code.
    pub fn set_by_code(
        &mut self,
        catalog: &[KpiDefinition],
        kpi_code: &str,
        raw: RawValue,
    ) -> Result<(), ClinicalError> {
        let kpi = catalog
            .iter()
            .find(|k| k.code == kpi_code)
            .ok_or_else(|| ClinicalError::UnknownKpiCode(kpi_code.to_string()))?;
        self.set_value(kpi, raw);
        Ok(())
    }
}

/// A batch of edits addressed by KPI code, as read from a draft file.
/// Fields left out keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DraftEdits {
    #[serde(default)]
    pub evaluation_date: Option<String>,
    #[serde(default)]
    pub has_disease: Option<bool>,
    #[serde(default)]
    pub progress_percent: Option<RawValue>,
    #[serde(default)]
    pub doctor_notes: Option<String>,
    /// KPI code → value. `null` clears the field.
    #[serde(default)]
    pub kpis: BTreeMap<String, Option<RawValue>>,
}

impl DraftEdits {
    /// Apply every edit, failing on the first unknown KPI code before
    /// touching the draft.
    pub fn apply(
        self,
        draft: &mut EvaluationDraft,
        catalog: &[KpiDefinition],
    ) -> Result<(), ClinicalError> {
        if let Some(unknown) = self
            .kpis
            .keys()
            .find(|c| !catalog.iter().any(|k| &k.code == *c))
        {
            return Err(ClinicalError::UnknownKpiCode(unknown.clone()));
        }

        if let Some(date) = self.evaluation_date {
            draft.evaluation_date = date;
        }
        if let Some(has_disease) = self.has_disease {
            draft.has_disease = has_disease;
        }
        if let Some(progress) = self.progress_percent {
            draft.progress_percent = match progress {
                RawValue::Number(n) => n.to_string(),
                RawValue::Text(s) => s,
                RawValue::Bool(b) => b.to_string(),
            };
        }
        if let Some(notes) = self.doctor_notes {
            draft.doctor_notes = notes;
        }

        for (kpi_code, value) in self.kpis {
            match value {
                Some(raw) => draft.set_by_code(catalog, &kpi_code, raw)?,
                None => {
                    if let Some(kpi) = catalog.iter().find(|k| k.code == kpi_code) {
                        draft.clear_value(kpi.id);
                    }
                }
            }
        }
        Ok(())
    }
}
