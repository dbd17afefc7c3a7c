//! Cell values and their coercion rules
//!
//! Report rows are loosely typed: a cell may hold a number, a string, or
//! nothing at all. Sorting never fails on any of them. Numeric columns coerce
//! every value to an `f64` (absent or unparseable values become `0`) and all
//! other columns coerce to lower-cased text (absent values become `""`).

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric sort key
    ///
    /// Text is parsed from its leading numeric prefix (`"42px"` -> 42,
    /// `"N/A"` -> 0). NaN never escapes: it collapses to 0 so the ordering
    /// stays total.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(n) if n.is_nan() => 0.0,
            Value::Number(n) => *n,
            Value::Text(s) => match parse_leading_number(s) {
                Some(n) => n,
                None => {
                    tracing::debug!(value = %s, "non-numeric value in numeric column, sorting as 0");
                    0.0
                }
            },
            Value::Null => 0.0,
        }
    }

    /// Case-insensitive text sort key
    pub fn as_sort_text(&self) -> String {
        match self {
            Value::Text(s) => s.to_lowercase(),
            Value::Number(n) => format_number(*n).to_lowercase(),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Integral counts go out as integers, matching the text rendering
            Value::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
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

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Parse the leading numeric prefix of a string
///
/// Leading whitespace is skipped, then an optional sign, digits with an
/// optional fraction, and an optional exponent. Anything after the prefix is
/// ignored. Returns `None` when no prefix matches.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER_RE.get_or_init(|| {
        Regex::new(r"^\s*([+-]?)(Infinity|(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
    });

    let caps = re.captures(s)?;
    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
    let body = caps.get(2)?.as_str();

    let magnitude = if body == "Infinity" {
        f64::INFINITY
    } else {
        body.parse::<f64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15
}

/// Format a number without a trailing `.0` for integral values
pub fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
