use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A KPI value in its typed form. Exactly one payload slot is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum TypedValue {
    Numeric(f64),
    Text(String),
    Boolean(bool),
}

impl TypedValue {
    /// The value as a number, when it is numeric or numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TypedValue::Numeric(n) => Some(*n),
            TypedValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            TypedValue::Boolean(_) => None,
        }
    }
}

/// One per-KPI record of a submission. Build through [`KpiPayloadEntry::new`]
/// so that exactly one of the value slots is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KpiPayloadEntry {
    pub kpi_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_numeric: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
}

impl KpiPayloadEntry {
    pub fn new(kpi_id: u64, value: TypedValue) -> Self {
        let mut entry = KpiPayloadEntry {
            kpi_id,
            value_numeric: None,
            value_string: None,
            value_boolean: None,
        };
        match value {
            TypedValue::Numeric(n) => entry.value_numeric = Some(n),
            TypedValue::Text(s) => entry.value_string = Some(s),
            TypedValue::Boolean(b) => entry.value_boolean = Some(b),
        }
        entry
    }

    /// The populated slot, checked in numeric → string → boolean order.
    pub fn value(&self) -> Option<TypedValue> {
        if let Some(n) = self.value_numeric {
            Some(TypedValue::Numeric(n))
        } else if let Some(s) = &self.value_string {
            Some(TypedValue::Text(s.clone()))
        } else {
            self.value_boolean.map(TypedValue::Boolean)
        }
    }
}

/// The flattened evaluation body accepted by `POST /evaluations` and
/// `PUT /evaluations/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionPayload {
    pub patient_id: u64,
    pub disease_id: u64,
    pub doctor_id: Option<u64>,
    pub evaluation_date: jiff::civil::Date,
    pub has_disease: bool,
    pub progress_percent: Option<f64>,
    pub disease_stage: Option<String>,
    pub doctor_notes: Option<String>,
    pub headache_days_month: Option<f64>,
    pub migraine_days_month: Option<f64>,
    pub acute_medication_days_month: Option<f64>,
    pub pain_intensity_avg: Option<f64>,
    pub disability_score: Option<f64>,
    pub kpis: Vec<KpiPayloadEntry>,
}

/// Reference to the KPI a stored value belongs to, when the backend embeds it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KpiRef {
    #[serde(default)]
    pub id: Option<u64>,
    pub code: String,
}

/// A KPI value as stored on an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoredKpiValue {
    #[serde(default)]
    pub kpi_id: Option<u64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub kpi: Option<KpiRef>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub value_numeric: Option<f64>,
    #[serde(default)]
    pub value_string: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_bool")]
    pub value_boolean: Option<bool>,
}

impl StoredKpiValue {
    /// The KPI code, from the flat field or the embedded KPI.
    pub fn code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .or_else(|| self.kpi.as_ref().map(|k| k.code.as_str()))
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }

    /// First non-null slot, in numeric → string → boolean order.
    pub fn value(&self) -> Option<TypedValue> {
        if let Some(n) = self.value_numeric {
            Some(TypedValue::Numeric(n))
        } else if let Some(s) = &self.value_string {
            Some(TypedValue::Text(s.clone()))
        } else {
            self.value_boolean.map(TypedValue::Boolean)
        }
    }
}

/// An evaluation as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    pub id: u64,
    #[serde(default)]
    pub patient_id: Option<u64>,
    #[serde(default)]
    pub evaluation_date: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_bool")]
    pub has_disease: Option<bool>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub progress_percent: Option<f64>,
    #[serde(default)]
    pub doctor_notes: Option<String>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub headache_days_month: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub migraine_days_month: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub acute_medication_days_month: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub pain_intensity_avg: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub disability_score: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_bool")]
    pub medication_overuse_suspected: Option<bool>,
    #[serde(default, deserialize_with = "crate::de::opt_bool")]
    pub aura_presence: Option<bool>,
    #[serde(default, deserialize_with = "crate::de::default_on_null")]
    pub kpi_values: Vec<StoredKpiValue>,
}

impl Evaluation {
    /// Stored value of the KPI with the given code.
    pub fn kpi_value(&self, code: &str) -> Option<TypedValue> {
        self.kpi_values
            .iter()
            .find(|kv| kv.has_code(code))
            .and_then(StoredKpiValue::value)
    }
}
