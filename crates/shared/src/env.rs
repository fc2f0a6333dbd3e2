//! Typed lookups over process environment variables.
//!
//! Every accessor takes the variable name and an optional default that is
//! returned when the variable is absent. A variable that is present but
//! unparseable yields `None` (or an [`EnvError`] for JSON) rather than the
//! default.
//!
//! ```no_run
//! use depot_shared::env;
//!
//! let port = env::int("PORT", Some(1337));
//! let origins = env::array("CORS_ORIGINS", None).unwrap_or_default();
//! let debug = env::bool("DEBUG", None);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Environment coercion errors.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Variable holds text that is not valid JSON for the requested type.
    #[error("Impossible to parse json environment variable {key}: {message}")]
    Json {
        /// Variable name.
        key: String,
        /// Parser message.
        message: String,
    },
}

impl EnvError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "CONFIG_PARSE_ERROR"
    }
}

fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Raw string value.
pub fn var(key: &str, default: Option<&str>) -> Option<String> {
    lookup(key).or_else(|| default.map(String::from))
}

/// Integer value, read up to the first non-digit (`"42px"` is 42).
pub fn int(key: &str, default: Option<i64>) -> Option<i64> {
    match lookup(key) {
        Some(raw) => parse_int(&raw),
        None => default,
    }
}

/// Boolean value. Only the literal `"true"` is true.
pub fn bool(key: &str, default: Option<bool>) -> bool {
    match lookup(key) {
        Some(raw) => raw == "true",
        None => default.unwrap_or(false),
    }
}

/// Floating point value, read up to the first character that cannot extend
/// a decimal literal.
pub fn float(key: &str, default: Option<f64>) -> Option<f64> {
    match lookup(key) {
        Some(raw) => parse_float(&raw),
        None => default,
    }
}

/// JSON value deserialized into `T`.
///
/// # Errors
///
/// Returns [`EnvError::Json`] when the variable is set but does not parse.
pub fn json<T: DeserializeOwned>(key: &str, default: Option<T>) -> Result<Option<T>, EnvError> {
    match lookup(key) {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| EnvError::Json {
                key: key.to_string(),
                message: e.to_string(),
            }),
        None => Ok(default),
    }
}

/// Comma separated list, optionally wrapped in brackets.
pub fn array(key: &str, default: Option<Vec<String>>) -> Option<Vec<String>> {
    match lookup(key) {
        Some(raw) => Some(split_array(&raw)),
        None => default,
    }
}

/// Date or timestamp. Values without an offset are read as UTC.
pub fn date(key: &str, default: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match lookup(key) {
        Some(raw) => parse_date(&raw),
        None => default,
    }
}

/// Parses the leading integer of `raw`, ignoring leading whitespace.
#[must_use]
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[sign..]);
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

/// Parses the leading decimal literal of `raw`, ignoring leading whitespace.
///
/// Accepts an optional sign, integer and fraction digits, an exponent when it
/// is followed by digits, and `Infinity`.
#[must_use]
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Splits `a, "b", c` or `[a, "b", c]` into trimmed elements.
#[must_use]
pub fn split_array(raw: &str) -> Vec<String> {
    let inner = raw
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(raw);

    if inner.trim().is_empty() {
        return Vec::new();
    }

    inner
        .split(',')
        .map(|v| v.trim_matches(|c| c == '"' || c == ' ').to_string())
        .collect()
}

/// Parses RFC 3339 timestamps, `YYYY-MM-DD[ T]HH:MM:SS[.f]` and `YYYY-MM-DD`.
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
