//! Reading the free-form dashboard response.
//!
//! `GET /dashboard` returns aggregate JSON whose shape varies between
//! backend versions: counts arrive as arrays of rows, maps of counts, or
//! maps of row objects. Everything here flattens those shapes into labelled
//! lines without assuming a schema.

use biapp_core::models::patient::Sex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::rules::ACUTE_MEDICATION_TYPE_OPTIONS;

const LABELS: &[(&str, &str)] = &[
    ("active_patients", "Active patients"),
    ("patients_active", "Active patients"),
    ("total_patients", "Total patients"),
    ("patients_total", "Total patients"),
    ("evaluations_count", "Recorded evaluations"),
    ("evaluations_total", "Recorded evaluations"),
    ("total_evaluations", "Recorded evaluations"),
    ("avg_migraine_days", "Average migraine days"),
    ("migraine_days_avg", "Average migraine days"),
    ("avg_headache_days", "Average headache days"),
    ("headache_days_avg", "Average headache days"),
    ("avg_midas", "Average MIDAS"),
    ("midas_avg", "Average MIDAS"),
    ("avg_pain_intensity", "Average pain intensity"),
    ("pain_intensity_avg", "Average pain intensity"),
    ("severity_avg", "Average severity"),
    ("avg_severity", "Average severity"),
    ("acute_med_days_avg", "Average acute medication days"),
    ("avg_acute_med_days", "Average acute medication days"),
    ("acute_medication_days_avg", "Average acute medication days"),
    ("chronic_migraine_rate", "Chronic migraine rate"),
    ("with_disease", "With chronic migraine"),
    ("without_disease", "Without chronic migraine"),
    ("migraine_days", "Migraine days"),
    ("headache_days", "Headache days"),
    ("midas_histogram", "MIDAS distribution"),
    ("acute_medication_types", "Acute medication types"),
    ("acute_med_types", "Acute medication types"),
    ("sex_distribution", "Sex distribution"),
    ("age_distribution", "Age distribution"),
    ("bmi_distribution", "BMI distribution"),
    ("alert_migraine_days", "Migraine days alert"),
    ("alert_acute_med_days", "Acute medication alert"),
    ("alerts", "Alerts"),
];

const LABEL_KEYS: &[&str] = &["label", "name", "bucket", "range", "key", "value"];
const COUNT_KEYS: &[&str] = &["count", "total", "value_count", "n", "value"];
const ROW_MARKERS: &[&str] = &[
    "label",
    "name",
    "bucket",
    "range",
    "count",
    "total",
    "value_count",
    "n",
];

/// Human label for a response key: the known label, otherwise the key in
/// title case.
pub fn labelize(key: &str) -> String {
    if let Some((_, label)) = LABELS.iter().find(|(k, _)| *k == key) {
        return label.to_string();
    }
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display label of an acute medication type code.
pub fn acute_medication_label(value: &str) -> String {
    let upper = value.trim().to_ascii_uppercase();
    if upper == "COMBINATION_ANALGESICS" {
        return "Combination analgesics".to_string();
    }
    ACUTE_MEDICATION_TYPE_OPTIONS
        .iter()
        .find(|o| o.value == upper)
        .map(|o| o.label.to_string())
        .unwrap_or_else(|| value.to_string())
}

/// A scalar as text; `null` becomes empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionItem {
    pub label: String,
    pub count: String,
}

fn first_present<'a>(row: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .find(|v| !v.is_null())
}

fn row_label(row: &Map<String, Value>) -> String {
    first_present(row, LABEL_KEYS)
        .map(scalar_text)
        .unwrap_or_default()
}

fn row_count(row: &Map<String, Value>) -> String {
    first_present(row, COUNT_KEYS)
        .map(scalar_text)
        .unwrap_or_default()
}

/// Flatten a distribution value into label/count items.
pub fn normalize_items(value: &Value) -> Vec<DistributionItem> {
    match value {
        Value::Array(rows) => rows
            .iter()
            .filter_map(Value::as_object)
            .map(|row| DistributionItem {
                label: row_label(row),
                count: row_count(row),
            })
            .filter(|item| !item.label.is_empty() || !item.count.is_empty())
            .collect(),
        Value::Object(map) if ROW_MARKERS.iter().any(|k| map.contains_key(*k)) => {
            vec![DistributionItem {
                label: row_label(map),
                count: row_count(map),
            }]
        }
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| DistributionItem {
                label: labelize(key),
                count: match v {
                    Value::Object(row) => row_count(row),
                    other => scalar_text(other),
                },
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Sex counts always list F, M and O, zero-filled.
pub fn ensure_sex_items(items: &[DistributionItem]) -> Vec<DistributionItem> {
    Sex::ALL
        .iter()
        .map(|sex| DistributionItem {
            label: sex.code().to_string(),
            count: items
                .iter()
                .find(|item| item.label == sex.code())
                .map(|item| item.count.clone())
                .unwrap_or_else(|| "0".to_string()),
        })
        .collect()
}

/// Render an arbitrary aggregate as `label: count` lines.
pub fn to_lines(value: &Value) -> Vec<String> {
    match value {
        Value::Array(rows) => rows
            .iter()
            .map(|row| match row.as_object() {
                Some(obj) => format!("{}: {}", row_label(obj), row_count(obj)),
                None => scalar_text(row),
            })
            .filter(|line| !line.is_empty())
            .collect(),
        Value::Object(_) => normalize_items(value)
            .into_iter()
            .map(|item| format!("{}: {}", item.label, item.count))
            .collect(),
        other => vec![scalar_text(other)],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub key: String,
    pub title: String,
    pub items: Vec<DistributionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    /// `YYYY-MM`.
    pub period: String,
    pub migraine_days: Option<f64>,
    pub headache_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlertRow {
    pub evaluation_id: String,
    pub patient_name: String,
    pub evaluation_date: String,
    pub headache_duration_months: String,
    pub migraine_days: String,
    pub acute_medication_days: String,
    pub acute_medication_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertGroup {
    pub title: String,
    pub rows: Vec<AlertRow>,
}

/// The dashboard response split into the parts shown to the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardView {
    pub summary: Vec<(String, String)>,
    pub trends: Vec<TrendRow>,
    pub distributions: Vec<Distribution>,
    pub alerts: Vec<AlertGroup>,
}

impl DashboardView {
    pub fn from_json(data: &Value) -> Self {
        DashboardView {
            summary: summary(data),
            trends: trends(data),
            distributions: distributions(data),
            alerts: alerts(data),
        }
    }
}

fn summary(data: &Value) -> Vec<(String, String)> {
    let Some(map) = data.get("summary").and_then(Value::as_object) else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null() && v.as_str() != Some(""))
        .map(|(k, v)| (labelize(k), scalar_text(v)))
        .collect()
}

fn pick_number(row: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    let value = first_present(row, keys)?;
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn trends(data: &Value) -> Vec<TrendRow> {
    let rows = match data.get("trends") {
        Some(Value::Array(rows)) => rows,
        Some(t) => match t
            .get("by_month")
            .or_else(|| t.get("monthly"))
            .and_then(Value::as_array)
        {
            Some(rows) => rows,
            None => return Vec::new(),
        },
        None => return Vec::new(),
    };

    rows.iter()
        .filter_map(Value::as_object)
        .map(|row| {
            let period = first_present(row, &["month", "period", "date"])
                .map(scalar_text)
                .unwrap_or_default();
            TrendRow {
                period: period.chars().take(7).collect(),
                migraine_days: pick_number(
                    row,
                    &["migraine_days_avg", "avg_migraine_days", "migraine_days"],
                ),
                headache_days: pick_number(
                    row,
                    &["headache_days_avg", "avg_headache_days", "headache_days"],
                ),
            }
        })
        .collect()
}

fn distributions(data: &Value) -> Vec<Distribution> {
    let Some(map) = data.get("distributions").and_then(Value::as_object) else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let base = normalize_items(value);
            let items = match key.as_str() {
                "sex_distribution" => ensure_sex_items(&base),
                "acute_medication_types" | "acute_med_types" => base
                    .into_iter()
                    .map(|item| DistributionItem {
                        label: acute_medication_label(&item.label),
                        count: item.count,
                    })
                    .collect(),
                _ => base,
            };
            Distribution {
                key: key.clone(),
                title: labelize(key),
                items,
            }
        })
        .collect()
}

fn alert_row(item: &Map<String, Value>) -> AlertRow {
    let text = |keys: &[&str]| {
        first_present(item, keys)
            .map(scalar_text)
            .unwrap_or_default()
    };
    let date = text(&["evaluation_date", "evaluationDate"]);
    AlertRow {
        evaluation_id: text(&["evaluation_id", "evaluationId", "id"]),
        patient_name: text(&["patient_name", "patientName"]),
        evaluation_date: date.split('T').next().unwrap_or_default().to_string(),
        headache_duration_months: text(&["headache_duration_months", "headacheDurationMonths"]),
        migraine_days: text(&["migraine_days_month", "migraineDaysMonth"]),
        acute_medication_days: text(&["acute_medication_days_month", "acuteMedicationDaysMonth"]),
        acute_medication_type: text(&["acute_medication_type", "acuteMedicationType"]),
    }
}

/// Alert items may be a list or a map of lists.
fn flatten_alerts(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) if map.values().any(Value::is_array) => map
            .values()
            .flat_map(|v| match v {
                Value::Array(items) => items.iter().collect::<Vec<_>>(),
                other => vec![other],
            })
            .collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

fn alerts(data: &Value) -> Vec<AlertGroup> {
    let groups: Vec<(String, &Value)> = match data.get("alerts") {
        Some(list @ Value::Array(_)) => vec![("alerts".to_string(), list)],
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        _ => Vec::new(),
    };

    groups
        .into_iter()
        .map(|(key, value)| AlertGroup {
            title: labelize(&key),
            rows: flatten_alerts(value)
                .into_iter()
                .filter_map(Value::as_object)
                .map(alert_row)
                .collect(),
        })
        .collect()
}
