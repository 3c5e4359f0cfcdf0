//! Per-metric series over a patient's evaluations.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use biapp_core::dates;
use biapp_core::models::evaluation::{Evaluation, StoredKpiValue, TypedValue};
use biapp_core::models::trend::KpiTrendEntry;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::code;

/// A trend needs at least this many points to be drawn.
pub const MIN_TREND_POINTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TrendMetric {
    MigraineDaysMonth,
    HeadacheDaysMonth,
    AcuteMedicationDaysMonth,
    PainIntensityAvg,
    DisabilityScore,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 5] = [
        TrendMetric::MigraineDaysMonth,
        TrendMetric::HeadacheDaysMonth,
        TrendMetric::AcuteMedicationDaysMonth,
        TrendMetric::PainIntensityAvg,
        TrendMetric::DisabilityScore,
    ];

    /// Field name in the trend response.
    pub fn key(self) -> &'static str {
        match self {
            TrendMetric::MigraineDaysMonth => "migraine_days_month",
            TrendMetric::HeadacheDaysMonth => "headache_days_month",
            TrendMetric::AcuteMedicationDaysMonth => "acute_medication_days_month",
            TrendMetric::PainIntensityAvg => "pain_intensity_avg",
            TrendMetric::DisabilityScore => "disability_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendMetric::MigraineDaysMonth => "Migraine days per month",
            TrendMetric::HeadacheDaysMonth => "Headache days per month",
            TrendMetric::AcuteMedicationDaysMonth => "Acute medication days",
            TrendMetric::PainIntensityAvg => "Average pain intensity (VAS 0-10)",
            TrendMetric::DisabilityScore => "Disability score (MIDAS)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            TrendMetric::MigraineDaysMonth
            | TrendMetric::HeadacheDaysMonth
            | TrendMetric::AcuteMedicationDaysMonth => "days",
            TrendMetric::PainIntensityAvg => "VAS 0-10",
            TrendMetric::DisabilityScore => "points",
        }
    }

    pub fn value(self, entry: &KpiTrendEntry) -> Option<f64> {
        match self {
            TrendMetric::MigraineDaysMonth => entry.migraine_days_month,
            TrendMetric::HeadacheDaysMonth => entry.headache_days_month,
            TrendMetric::AcuteMedicationDaysMonth => entry.acute_medication_days_month,
            TrendMetric::PainIntensityAvg => entry.pain_intensity_avg,
            TrendMetric::DisabilityScore => entry.disability_score,
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TrendMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrendMetric::ALL
            .into_iter()
            .find(|m| m.key() == s.trim())
            .ok_or_else(|| {
                let keys: Vec<&str> = TrendMetric::ALL.iter().map(|m| m.key()).collect();
                format!("unknown metric '{s}', expected one of: {}", keys.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct TrendPoint {
    pub evaluation_id: u64,
    /// `MM-DD` of the evaluation, empty when it has no date.
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct TrendSeries {
    pub metric: TrendMetric,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn has_trend(&self) -> bool {
        self.points.len() >= MIN_TREND_POINTS
    }
}

/// Points for one metric, keeping entry order and skipping entries without
/// a value.
pub fn series(entries: &[KpiTrendEntry], metric: TrendMetric) -> TrendSeries {
    let points = entries
        .iter()
        .filter_map(|entry| {
            metric.value(entry).map(|value| TrendPoint {
                evaluation_id: entry.id,
                label: entry
                    .evaluation_date
                    .as_deref()
                    .map(dates::month_day_label)
                    .unwrap_or_default(),
                value,
            })
        })
        .collect();

    TrendSeries { metric, points }
}

fn stored_history(values: &[StoredKpiValue]) -> Option<f64> {
    values
        .iter()
        .find(|kv| kv.has_code(code::HEADACHE_DURATION_MONTHS))
        .and_then(StoredKpiValue::value)
        .as_ref()
        .and_then(TypedValue::as_number)
}

/// Pattern-history months for an entry. The value the doctor entered wins,
/// then the reported fields from most to least specific.
pub fn history_months(entry: &KpiTrendEntry) -> Option<f64> {
    stored_history(&entry.kpi_values)
        .or(entry.history_months_input)
        .or(entry.history_months_user)
        .or(entry.history_months_raw)
        .or(entry.history_months)
        .or(entry.headache_duration_months)
        .or(entry.duration_months)
        .or(entry.headache_duration)
        .or(entry.duration)
        .or(entry.history_months_consolidated)
        .or(entry.history_months_suggested)
        .or(entry.history_suggested)
}

/// Overlay the history months recorded on full evaluations onto the trend
/// entries with the same id.
pub fn merge_history(mut entries: Vec<KpiTrendEntry>, evaluations: &[Evaluation]) -> Vec<KpiTrendEntry> {
    let recorded: HashMap<u64, f64> = evaluations
        .iter()
        .filter_map(|ev| stored_history(&ev.kpi_values).map(|months| (ev.id, months)))
        .collect();

    for entry in &mut entries {
        if let Some(months) = recorded.get(&entry.id) {
            entry.history_months_user = Some(*months);
        }
    }
    entries
}
