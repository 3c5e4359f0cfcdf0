//! Lenient field decoders for backend JSON.
//!
//! The backend serializes decimal columns as strings (`"12.50"`) and some
//! boolean columns as `0`/`1`. Use these with
//! `#[serde(default, deserialize_with = "...")]`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// Decode `null`, a JSON number, or a numeric string into `Option<f64>`.
/// Blank strings decode as `None`.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Number(n)) => Ok(Some(n)),
        Some(Loose::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, got '{s}'")))
        }
        Some(Loose::Bool(b)) => Err(D::Error::custom(format!(
            "expected a number, got boolean {b}"
        ))),
    }
}

/// Decode `null`, a boolean, `0`/`1`, or `"0"`/`"1"`/`"true"`/`"false"`
/// into `Option<bool>`.
pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Bool(b)) => Ok(Some(b)),
        Some(Loose::Number(n)) => Ok(Some(n != 0.0)),
        Some(Loose::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "1" | "true" => Ok(Some(true)),
            "0" | "false" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("expected a boolean, got '{other}'"))),
        },
    }
}

/// Like [`opt_bool`] but treats `null` as `false`.
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_bool(deserializer)?.unwrap_or(false))
}

/// Decode `null` as the type's default (e.g. an empty list).
pub fn default_on_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
