//! Cell value types

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Represents the value stored in a cell or cached on a formula
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// No value
    #[default]
    Unset,

    /// Numeric value
    Double(f64),

    /// String value
    Text(String),

    /// Date and time
    DateTime(NaiveDateTime),
}

/// Format used for `office:date-value`
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

impl Value {
    /// Create a new text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Value::Double(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    pub fn is_date_time(&self) -> bool {
        matches!(self, Value::DateTime(_))
    }

    /// Try to get the value as a number
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a date/time
    pub fn as_date_time(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Get the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unset => "unset",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::DateTime(_) => "date-time",
        }
    }

    /// `office:value-type` attribute for this value (`None` when unset)
    pub fn odf_value_type(&self) -> Option<&'static str> {
        match self {
            Value::Unset => None,
            Value::Double(_) => Some("float"),
            Value::Text(_) => Some("string"),
            Value::DateTime(_) => Some("date"),
        }
    }

    /// Format a date/time the way `office:date-value` stores it
    pub fn format_date_time(dt: &NaiveDateTime) -> String {
        dt.format(DATE_TIME_FORMAT).to_string()
    }

    /// Parse an `office:date-value` (date-time or date only)
    pub fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }

    /// Parse an `office:time-value` duration (`PT12H30M15S`) as a fraction of a day
    pub fn parse_duration_days(s: &str) -> Option<f64> {
        let rest = s.trim().strip_prefix("PT")?;
        let mut seconds = 0.0;
        let mut number = String::new();
        for c in rest.chars() {
            match c {
                'H' | 'M' | 'S' => {
                    let n: f64 = number.parse().ok()?;
                    number.clear();
                    seconds += match c {
                        'H' => n * 3600.0,
                        'M' => n * 60.0,
                        _ => n,
                    };
                }
                _ => number.push(c),
            }
        }
        if !number.is_empty() {
            return None;
        }
        Some(seconds / 86_400.0)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unset => Ok(()),
            Value::Double(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

// Conversions from common types

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Double(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Double(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Double(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Double(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}
