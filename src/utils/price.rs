use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::utils::error::{AppError, Result};

static NON_PRICE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9,.]").expect("static price pattern"));

/// Converts locale-ambiguous price text into a number.
///
/// Never fails: text that cannot be read as a price yields zero and a
/// warning is logged.
pub fn normalize(text: &str) -> Decimal {
    match try_normalize(text) {
        Ok(value) => value,
        Err(e) => {
            if !text.trim().is_empty() {
                tracing::warn!("Could not convert price text: {}", e);
            }
            Decimal::ZERO
        }
    }
}

/// Strict variant of [`normalize`] that reports why the text was rejected.
///
/// Rules, applied to the text reduced to digits, commas and dots:
/// - comma and dot both present: dots group thousands, the comma is the decimal mark
/// - only commas: commas are decimal marks
/// - several dots: every dot groups thousands
/// - one dot followed by exactly three digits: the dot groups thousands
/// - otherwise the dot is a decimal point
pub fn try_normalize(text: &str) -> Result<Decimal> {
    let cleaned = NON_PRICE_CHARS.replace_all(text, "");
    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');

    let canonical = if has_comma && has_dot {
        cleaned.replace('.', "").replace(',', ".")
    } else if has_comma {
        cleaned.replace(',', ".")
    } else if has_dot {
        let dots = cleaned.matches('.').count();
        let fraction_len = cleaned.rsplit('.').next().map_or(0, str::len);
        if dots > 1 {
            cleaned.replace('.', "")
        } else if fraction_len == 3 {
            cleaned.replace('.', "")
        } else {
            cleaned.into_owned()
        }
    } else {
        cleaned.into_owned()
    };

    parse_plain_decimal(&canonical).ok_or_else(|| AppError::Normalize {
        input: text.to_string(),
    })
}

// Accepts "150.", ".5" and plain digit strings; rejects anything with more
// than one decimal point.
fn parse_plain_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.strip_suffix('.').unwrap_or(s);
    if trimmed.is_empty() || trimmed == "." {
        return None;
    }
    let padded;
    let candidate = if trimmed.starts_with('.') {
        padded = format!("0{}", trimmed);
        padded.as_str()
    } else {
        trimmed
    };
    if candidate.matches('.').count() > 1 {
        return None;
    }
    Decimal::from_str(candidate).ok()
}

/// Reads a price out of a JSON scalar: numbers are taken as-is, strings go
/// through [`normalize`]. Negative numbers are treated as unparseable.
pub fn from_json_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => {
            let raw = n.to_string();
            let parsed = Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()?;
            if parsed.is_sign_negative() {
                tracing::warn!("Negative price {} treated as unparseable", raw);
                Some(Decimal::ZERO)
            } else {
                Some(parsed)
            }
        }
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(normalize(s)),
        _ => None,
    }
}
