//! Typed conversions of field values
//!
//! Responses and requests both store plain strings. These functions turn a
//! retrieved value into an integer, a timestamp or a set, and are shared by
//! both models. An empty value means "absent" and never fails.

use crate::error::FieldError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeSet;

/// Protocol timestamp format, always UTC.
pub const DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const DATE_LEN: usize = 16;

/// Convert a value to an integer; `None` if empty.
pub fn parse_int(field: &str, value: &str) -> Result<Option<i64>, FieldError> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FieldError::NotAnInteger {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Convert a `yyyyMMdd'T'HHmmss'Z'` value to a UTC timestamp; `None` if empty.
pub fn parse_date(field: &str, value: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
    if value.is_empty() {
        return Ok(None);
    }
    let bad_date = || FieldError::BadDate {
        field: field.to_string(),
        value: value.to_string(),
    };

    if !is_fixed_width_date(value) {
        return Err(bad_date());
    }
    let naive = NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|_| bad_date())?;
    Ok(Some(Utc.from_utc_datetime(&naive)))
}

fn is_fixed_width_date(value: &str) -> bool {
    value.len() == DATE_LEN
        && value.bytes().enumerate().all(|(i, b)| match i {
            8 => b == b'T',
            15 => b == b'Z',
            _ => b.is_ascii_digit(),
        })
}

/// Render a timestamp in the protocol format.
pub fn format_date(time: &DateTime<Utc>) -> String {
    time.format(DATE_FORMAT).to_string()
}

/// Split a comma-separated value into a set of trimmed, non-empty items.
pub fn parse_set(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
