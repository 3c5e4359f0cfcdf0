use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Declared data type of a KPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum KpiType {
    Integer,
    Float,
    Boolean,
    String,
}

impl KpiType {
    pub fn is_numeric(self) -> bool {
        matches!(self, KpiType::Integer | KpiType::Float)
    }
}

/// A clinically defined indicator as served by the KPI catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KpiDefinition {
    pub id: u64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kpi_type: KpiType,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub min_value: Option<f64>,
    #[serde(default, deserialize_with = "crate::de::opt_number")]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}
