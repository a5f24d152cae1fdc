//! String coercions
//!
//! Form and query payloads carry every value as a string. Fields marked
//! `coerce` parse those strings into their declared type; date fields always
//! parse. Each function returns the message for a `coercion-error` issue on
//! failure.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::schema::Transform;

pub fn to_integer(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("Expected integer, received \"{}\"", raw))
}

pub fn to_number(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Expected number, received \"{}\"", raw))?;
    if !parsed.is_finite() {
        return Err(format!("Number \"{}\" is not representable", raw));
    }
    Ok(parsed)
}

/// Accepts the spellings HTML forms and query strings actually send
pub fn to_boolean(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(format!("Expected boolean, received \"{}\"", raw)),
    }
}

/// `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp in its own offset
pub fn to_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| "Invalid date".to_string())
}

/// RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC, or a bare date at
/// midnight UTC
pub fn to_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| "Invalid datetime".to_string())
}

pub fn apply_transforms(raw: &str, transforms: &[Transform]) -> String {
    let mut out = raw.to_string();
    for transform in transforms {
        out = match transform {
            Transform::Trim => out.trim().to_string(),
            Transform::Lowercase => out.to_lowercase(),
            Transform::Uppercase => out.to_uppercase(),
        };
    }
    out
}
