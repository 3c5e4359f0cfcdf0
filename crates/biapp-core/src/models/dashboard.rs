use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::patient::Sex;
use crate::dates;

/// Look-back window applied to dashboard aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DashboardRange {
    Days(u32),
    #[default]
    All,
}

impl DashboardRange {
    /// `(from, to)` dates for the window ending `today`, or `None` for all time.
    pub fn bounds(self, today: Date) -> Option<(Date, Date)> {
        match self {
            DashboardRange::Days(days) => Some((dates::days_before(today, i64::from(days)), today)),
            DashboardRange::All => None,
        }
    }
}

impl FromStr for DashboardRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(DashboardRange::All);
        }
        trimmed
            .parse::<u32>()
            .map(DashboardRange::Days)
            .map_err(|_| format!("invalid range '{s}': expected a number of days or 'all'"))
    }
}

/// Inclusive patient age band, e.g. `18-39`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AgeBand {
    pub min: u32,
    pub max: u32,
}

impl FromStr for AgeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid age band '{s}': expected MIN-MAX"))?;
        let min = min
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid minimum age in '{s}'"))?;
        let max = max
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("invalid maximum age in '{s}'"))?;
        if min > max {
            return Err(format!("invalid age band '{s}': minimum exceeds maximum"));
        }
        Ok(AgeBand { min, max })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardFilters {
    pub range: DashboardRange,
    pub sex: Option<Sex>,
    pub has_disease: Option<bool>,
    pub age: Option<AgeBand>,
}

impl DashboardFilters {
    /// Query parameters for `GET /dashboard`.
    pub fn query_pairs(&self, today: Date) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some((from, to)) = self.range.bounds(today) {
            pairs.push(("from", from.to_string()));
            pairs.push(("to", to.to_string()));
        }
        if let Some(sex) = self.sex {
            pairs.push(("sex", sex.code().to_string()));
        }
        if let Some(has_disease) = self.has_disease {
            pairs.push(("has_disease", if has_disease { "1" } else { "0" }.to_string()));
        }
        if let Some(age) = self.age {
            pairs.push(("min_age", age.min.to_string()));
            pairs.push(("max_age", age.max.to_string()));
        }
        pairs
    }
}
