//! Cell values and the numeric/date normalization applied before storage.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet, parser or store value.
///
/// Serializes to a plain JSON scalar (`null`, `true`, `12.5`, `"text"`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent or blank
    #[default]
    Null,
    /// Boolean cell
    Bool(bool),
    /// Numeric cell
    Number(f64),
    /// Text cell
    Text(String),
}

impl CellValue {
    /// Build a text value.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// True for `Null` and for whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Number(_) => false,
        }
    }

    /// Numeric reading of the value.
    ///
    /// Numbers are returned as-is; text goes through [`parse_number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Text reading of the value, `None` when blank.
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.to_string().trim().to_string())
        }
    }

    /// Convert a JSON value returned by the parsing service.
    ///
    /// Arrays and objects are kept as their compact JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => {
                n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null)
            }
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(n: Option<f64>) -> Self {
        n.map(CellValue::Number).unwrap_or(CellValue::Null)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse a numeric string the way amounts appear in demand notes.
///
/// Accepts surrounding whitespace, thousands separators and a leading rupee
/// marker (`₹`, `Rs.`, `Rs`). Returns `None` for blank, non-numeric or
/// non-finite input.
pub fn parse_number(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    for prefix in ["₹", "Rs.", "Rs"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    if s.is_empty() {
        return None;
    }
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Cost per meter: `total / length` when `length > 0`, otherwise `None`.
///
/// Never divides by zero, and a NaN on either side yields `None`.
pub fn per_meter(total: f64, length: f64) -> Option<f64> {
    if total.is_nan() || length.is_nan() || length <= 0.0 {
        return None;
    }
    Some(round2(total / length))
}

/// Excel's day zero for serial dates (accounts for the 1900 leap-year bug).
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Convert an Excel serial date (e.g. `45310.0`) into a calendar date.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    excel_epoch()?.checked_add_days(Days::new(serial.floor() as u64))
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%d-%b-%Y", "%d %b %Y", "%d %B %Y",
];

/// Parse a date written in any of the formats seen on demand notes.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    // ISO timestamps ("2024-03-01T00:00:00") carry the date in the first 10 chars
    let candidate = if s.len() > 10 && s.as_bytes().get(10) == Some(&b'T') {
        &s[..10]
    } else {
        s
    };
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
