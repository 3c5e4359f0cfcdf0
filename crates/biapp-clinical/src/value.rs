//! Raw form input and its explicit parse into a typed KPI value.
//!
//! Form fields hold whatever the user typed or toggled. Turning that into a
//! payload value is a per-type parse: `Ok(None)` means the field is blank or
//! untouched and is left out of the payload, `Ok(Some(_))` is a value for
//! exactly one payload slot, and `Err(_)` is a user-correctable problem.

use biapp_core::models::evaluation::TypedValue;
use biapp_core::models::kpi::{KpiDefinition, KpiType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::rules::{self, SelectOption};

/// A field value as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    pub fn is_blank(&self) -> bool {
        matches!(self, RawValue::Text(s) if s.trim().is_empty())
    }

    fn to_text(&self) -> String {
        match self {
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<TypedValue> for RawValue {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Numeric(n) => RawValue::Number(n),
            TypedValue::Text(s) => RawValue::Text(s),
            TypedValue::Boolean(b) => RawValue::Bool(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("must be a number")]
    NotANumber,

    #[error("must be yes or no")]
    NotABoolean,

    #[error("must be one of: {}", .allowed.join(", "))]
    NotAnOption { allowed: Vec<&'static str> },
}

/// Parse a raw field value according to the KPI's rule or declared type.
/// `raw` is `None` when the field was never touched.
pub fn parse_value(
    kpi: &KpiDefinition,
    raw: Option<&RawValue>,
) -> Result<Option<TypedValue>, ParseError> {
    if let Some(options) = rules::select_options(&kpi.code) {
        return parse_select(options, raw);
    }

    match kpi.kpi_type {
        KpiType::Boolean => raw.map(parse_boolean).transpose(),
        KpiType::Integer | KpiType::Float => parse_number(raw),
        KpiType::String => Ok(parse_text(raw)),
    }
}

fn present(raw: Option<&RawValue>) -> Option<&RawValue> {
    raw.filter(|r| !r.is_blank())
}

fn parse_select(
    options: &'static [SelectOption],
    raw: Option<&RawValue>,
) -> Result<Option<TypedValue>, ParseError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    let wanted = raw.to_text();
    options
        .iter()
        .find(|o| o.value.eq_ignore_ascii_case(wanted.trim()))
        .map(|o| Some(TypedValue::Text(o.value.to_string())))
        .ok_or_else(|| ParseError::NotAnOption {
            allowed: options.iter().map(|o| o.value).collect(),
        })
}

fn parse_boolean(raw: &RawValue) -> Result<TypedValue, ParseError> {
    let value = match raw {
        RawValue::Bool(b) => *b,
        RawValue::Number(n) => *n != 0.0,
        RawValue::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "si" | "sí" => true,
            "false" | "0" | "no" | "n" | "" => false,
            _ => return Err(ParseError::NotABoolean),
        },
    };
    Ok(TypedValue::Boolean(value))
}

fn parse_number(raw: Option<&RawValue>) -> Result<Option<TypedValue>, ParseError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    let number = match raw {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s.trim().parse::<f64>().map_err(|_| ParseError::NotANumber)?,
        RawValue::Bool(_) => return Err(ParseError::NotANumber),
    };
    if !number.is_finite() {
        return Err(ParseError::NotANumber);
    }
    Ok(Some(TypedValue::Numeric(number)))
}

fn parse_text(raw: Option<&RawValue>) -> Option<TypedValue> {
    present(raw).map(|r| TypedValue::Text(r.to_text()))
}
