use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::evaluation::StoredKpiValue;

/// One evaluation's row in `GET /patients/{id}/kpi-trends`.
///
/// The backend has reported pattern-history months under several names over
/// time; all of them are accepted and resolved by the trend builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KpiTrendEntry {
    pub id: u64,
    #[serde(default)]
    pub evaluation_date: Option<String>,

    // Metrics
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub migraine_days_month: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub headache_days_month: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub acute_medication_days_month: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub pain_intensity_avg: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub disability_score: Option<f64>,

    // Pattern history, most specific first
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_months_input: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_months_user: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_months_raw: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_months: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub headache_duration_months: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub duration_months: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub headache_duration: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_months_consolidated: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_months_suggested: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub history_suggested: Option<f64>,

    #[serde(default, deserialize_with = "crate::de::default_on_null")]
    pub kpi_values: Vec<StoredKpiValue>,
}
