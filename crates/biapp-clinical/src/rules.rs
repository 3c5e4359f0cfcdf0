//! Per-code override rules.
//!
//! A small declarative table keyed by KPI code. It is consulted once per KPI
//! during extraction and wins over whatever the catalog declares: a code
//! listed as a select accepts only its enumerated values regardless of the
//! declared type, and a code listed with bounds ignores the catalog's
//! `min_value`/`max_value`.

use biapp_core::models::kpi::KpiDefinition;
use serde::Serialize;

use crate::catalog::code;

/// One legal value of a forced enumerated select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const TRI_STATE_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "YES", label: "Yes" },
    SelectOption { value: "NO", label: "No" },
    SelectOption { value: "INCONCLUSIVE", label: "Inconclusive" },
];

pub const ACUTE_MEDICATION_TYPE_OPTIONS: &[SelectOption] = &[
    SelectOption { value: "NSAID_ANALGESICS", label: "NSAIDs/analgesics" },
    SelectOption { value: "TRIPTANS", label: "Triptans" },
    SelectOption { value: "ERGOT", label: "Ergot derivatives" },
    SelectOption { value: "COMBINATION", label: "Combination" },
    SelectOption { value: "OPIOIDS", label: "Opioids" },
    SelectOption { value: "GEPANTS_DITANS", label: "Gepants/ditans" },
    SelectOption { value: "OTHER", label: "Other" },
    SelectOption { value: "INCONCLUSIVE", label: "Inconclusive" },
];

/// Inclusive numeric bounds. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeViolation {
    BelowMin(f64),
    AboveMax(f64),
}

impl NumericRange {
    /// Bounds declared by the catalog.
    pub fn declared(kpi: &KpiDefinition) -> Self {
        NumericRange {
            min: kpi.min_value,
            max: kpi.max_value,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Every side the value falls outside of.
    pub fn violations(&self, value: f64) -> Vec<RangeViolation> {
        let mut out = Vec::new();
        if let Some(min) = self.min
            && value < min
        {
            out.push(RangeViolation::BelowMin(min));
        }
        if let Some(max) = self.max
            && value > max
        {
            out.push(RangeViolation::AboveMax(max));
        }
        out
    }

    pub fn contains(&self, value: f64) -> bool {
        self.violations(value).is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KpiRule {
    /// Only these values are accepted, as strings.
    Select(&'static [SelectOption]),
    /// These bounds replace the catalog's.
    Bounds(NumericRange),
}

const RULES: &[(&str, KpiRule)] = &[
    (code::MEETS_CM_CRITERIA, KpiRule::Select(TRI_STATE_OPTIONS)),
    (
        code::ACUTE_MEDICATION_TYPE,
        KpiRule::Select(ACUTE_MEDICATION_TYPE_OPTIONS),
    ),
    // Headache duration in months: the catalog's bounds are known to be wrong.
    (
        code::HEADACHE_DURATION_MONTHS,
        KpiRule::Bounds(NumericRange {
            min: Some(1.0),
            max: Some(240.0),
        }),
    ),
];

/// The override registered for `kpi_code`, if any.
pub fn rule_for(kpi_code: &str) -> Option<&'static KpiRule> {
    RULES
        .iter()
        .find(|(c, _)| *c == kpi_code)
        .map(|(_, rule)| rule)
}

/// Options of a forced enumerated select.
pub fn select_options(kpi_code: &str) -> Option<&'static [SelectOption]> {
    match rule_for(kpi_code) {
        Some(KpiRule::Select(options)) => Some(*options),
        _ => None,
    }
}

/// Bounds applied to a numeric KPI: the override when one is registered,
/// otherwise the catalog's.
pub fn effective_range(kpi: &KpiDefinition) -> NumericRange {
    match rule_for(&kpi.code) {
        Some(KpiRule::Bounds(range)) => *range,
        _ => NumericRange::declared(kpi),
    }
}

/// Helper text describing what a numeric KPI accepts, e.g.
/// `Range: 1 - 240 months`.
pub fn range_hint(kpi: &KpiDefinition) -> Option<String> {
    let range = effective_range(kpi);
    let unit = kpi
        .unit
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(|u| format!(" {u}"))
        .unwrap_or_default();

    if !range.is_unbounded() {
        let min = range
            .min
            .map(|v| v.to_string())
            .unwrap_or_else(|| "no min".to_string());
        let max = range
            .max
            .map(|v| v.to_string())
            .unwrap_or_else(|| "no max".to_string());
        return Some(format!("Range: {min} - {max}{unit}"));
    }

    kpi.unit
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(|u| format!("Unit: {u}"))
}
