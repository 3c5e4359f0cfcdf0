//! Calendar date helpers shared by forms and presentation.

use jiff::civil::Date;
use jiff::Span;

use crate::error::CoreError;

/// Parse a backend date value, which may be a plain `YYYY-MM-DD` or a full
/// ISO timestamp. Only the leading date part is considered.
pub fn parse_api_date(raw: &str) -> Option<Date> {
    date_prefix(raw).parse::<Date>().ok()
}

/// Parse a user-entered `YYYY-MM-DD` date.
pub fn parse_input_date(raw: &str) -> Result<Date, CoreError> {
    raw.trim()
        .parse::<Date>()
        .map_err(|e| CoreError::InvalidDate {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Short `MM-DD` label used on trend axes. Empty when the value has no date.
pub fn month_day_label(raw: &str) -> String {
    match parse_api_date(raw) {
        Some(date) => date.strftime("%m-%d").to_string(),
        None => String::new(),
    }
}

/// Display form of a backend date: the `YYYY-MM-DD` part when it parses,
/// otherwise the raw value unchanged.
pub fn display_date(raw: &str) -> String {
    match parse_api_date(raw) {
        Some(date) => date.to_string(),
        None => raw.to_string(),
    }
}

/// `today` minus a number of days, clamped to the calendar's range.
pub fn days_before(today: Date, days: i64) -> Date {
    Span::new()
        .try_days(days)
        .ok()
        .and_then(|span| today.checked_sub(span).ok())
        .unwrap_or(Date::MIN)
}

/// `today` minus a number of whole years, clamped to the calendar's range.
pub fn years_before(today: Date, years: i16) -> Date {
    Span::new()
        .try_years(years)
        .ok()
        .and_then(|span| today.checked_sub(span).ok())
        .unwrap_or(Date::MIN)
}

fn date_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(10) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    }
}
