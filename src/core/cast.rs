//! Conversions from raw configuration values to typed results.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use config::{Map, Value, ValueKind};
use std::time::Duration;

/// Types a configuration value can be cast into.
///
/// Casting is lenient in the usual configuration sense: numbers parse from
/// strings, booleans count as `1`/`0`, and so on. The error is a short reason
/// that [`Config`](crate::core::Config) wraps into
/// [`ConfigError::Cast`](crate::error::ConfigError::Cast) together with the key.
pub trait FromValue: Sized {
    /// Name of the target type used in error messages.
    const TARGET: &'static str;

    /// Convert the value, or explain why it cannot be converted.
    fn from_value(value: &Value) -> Result<Self, String>;
}

impl FromValue for Value {
    const TARGET: &'static str = "value";

    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for bool {
    const TARGET: &'static str = "bool";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::Boolean(b) => Ok(*b),
            ValueKind::I64(n) => Ok(*n != 0),
            ValueKind::I128(n) => Ok(*n != 0),
            ValueKind::U64(n) => Ok(*n != 0),
            ValueKind::U128(n) => Ok(*n != 0),
            ValueKind::Float(f) => Ok(*f != 0.0),
            ValueKind::String(s) => match s.trim() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
                other => Err(format!("invalid boolean {:?}", other)),
            },
            other => Err(unsupported(other)),
        }
    }
}

impl FromValue for i64 {
    const TARGET: &'static str = "i64";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::I64(n) => Ok(*n),
            ValueKind::I128(n) => i64::try_from(*n).map_err(|_| out_of_range(n)),
            ValueKind::U64(n) => i64::try_from(*n).map_err(|_| out_of_range(n)),
            ValueKind::U128(n) => i64::try_from(*n).map_err(|_| out_of_range(n)),
            ValueKind::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
            ValueKind::Boolean(b) => Ok(i64::from(*b)),
            ValueKind::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid integer {:?}: {}", s, e)),
            other => Err(unsupported(other)),
        }
    }
}

impl FromValue for i32 {
    const TARGET: &'static str = "i32";

    fn from_value(value: &Value) -> Result<Self, String> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|_| out_of_range(&n))
    }
}

impl FromValue for isize {
    const TARGET: &'static str = "isize";

    fn from_value(value: &Value) -> Result<Self, String> {
        let n = i64::from_value(value)?;
        isize::try_from(n).map_err(|_| out_of_range(&n))
    }
}

impl FromValue for f64 {
    const TARGET: &'static str = "f64";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::Float(f) => Ok(*f),
            ValueKind::I64(n) => Ok(*n as f64),
            ValueKind::I128(n) => Ok(*n as f64),
            ValueKind::U64(n) => Ok(*n as f64),
            ValueKind::U128(n) => Ok(*n as f64),
            ValueKind::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            ValueKind::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid float {:?}: {}", s, e)),
            other => Err(unsupported(other)),
        }
    }
}

impl FromValue for String {
    const TARGET: &'static str = "string";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::String(s) => Ok(s.clone()),
            ValueKind::Boolean(b) => Ok(b.to_string()),
            ValueKind::I64(n) => Ok(n.to_string()),
            ValueKind::I128(n) => Ok(n.to_string()),
            ValueKind::U64(n) => Ok(n.to_string()),
            ValueKind::U128(n) => Ok(n.to_string()),
            ValueKind::Float(f) => Ok(f.to_string()),
            other => Err(unsupported(other)),
        }
    }
}

/// Integers are nanoseconds; strings are either bare nanosecond counts or
/// human-readable spans such as `10s` or `1h 30m`.
impl FromValue for Duration {
    const TARGET: &'static str = "duration";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::String(s) => {
                let s = s.trim();
                if let Ok(nanos) = s.parse::<i64>() {
                    return nanos_to_duration(nanos);
                }
                humantime::parse_duration(s).map_err(|e| format!("invalid duration {:?}: {}", s, e))
            }
            ValueKind::Float(f) if f.is_finite() && *f >= 0.0 => Ok(Duration::from_nanos(*f as u64)),
            ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => {
                nanos_to_duration(i64::from_value(value)?)
            }
            other => Err(unsupported(other)),
        }
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD`, and integer unix seconds. Zone-less forms are taken as UTC.
impl FromValue for DateTime<Utc> {
    const TARGET: &'static str = "time";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::String(s) => parse_time(s.trim()),
            ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => {
                let secs = i64::from_value(value)?;
                DateTime::from_timestamp(secs, 0).ok_or_else(|| out_of_range(&secs))
            }
            other => Err(unsupported(other)),
        }
    }
}

impl FromValue for Vec<isize> {
    const TARGET: &'static str = "[]int";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| isize::from_value(item).map_err(|e| format!("element {}: {}", i, e)))
                .collect(),
            other => Err(unsupported(other)),
        }
    }
}

/// Arrays convert element-wise; a plain string is split on whitespace.
impl FromValue for Vec<String> {
    const TARGET: &'static str = "[]string";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| String::from_value(item).map_err(|e| format!("element {}: {}", i, e)))
                .collect(),
            ValueKind::String(s) => Ok(s.split_whitespace().map(str::to_string).collect()),
            other => Err(unsupported(other)),
        }
    }
}

impl FromValue for Map<String, Value> {
    const TARGET: &'static str = "map";

    fn from_value(value: &Value) -> Result<Self, String> {
        match &value.kind {
            ValueKind::Table(table) => Ok(table.clone()),
            other => Err(unsupported(other)),
        }
    }
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(time) = DateTime::parse_from_rfc3339(s) {
        return Ok(time.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognised time format {:?}", s))
}

fn nanos_to_duration(nanos: i64) -> Result<Duration, String> {
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| format!("negative duration {}", nanos))
}

fn unsupported(kind: &ValueKind) -> String {
    let name = match kind {
        ValueKind::Nil => "nil",
        ValueKind::Boolean(_) => "boolean",
        ValueKind::I64(_) | ValueKind::I128(_) | ValueKind::U64(_) | ValueKind::U128(_) => "integer",
        ValueKind::Float(_) => "float",
        ValueKind::String(_) => "string",
        ValueKind::Table(_) => "table",
        ValueKind::Array(_) => "array",
    };
    format!("unsupported source type {}", name)
}

fn out_of_range(n: &impl std::fmt::Display) -> String {
    format!("{} is out of range", n)
}
