//! # Casters
//!
//! A `Caster` is a labelled unary conversion applied to one field's value
//! by the casted construction calls. Casters are cheap to clone (the
//! function is shared behind an `Arc`) and are `Send + Sync`, so a
//! configured schema can be shared across threads.
//!
//! ## Built-in casters
//!
//! | Label       | Accepts                         | Produces                 |
//! |-------------|---------------------------------|--------------------------|
//! | `int`       | int, float, bool, numeric str   | int (floats truncate)    |
//! | `float`     | int, float, bool, numeric str   | float                    |
//! | `str`       | anything                        | str                      |
//! | `bool`      | bool, number, `true/false` str  | bool                     |
//! | `timestamp` | RFC 3339 str, Unix seconds      | `YYYY-MM-DDTHH:MM:SSZ`   |
//!
//! `int` parses `"2.2"` as `2`, so whitespace-split text such as
//! `"1 2.2 3.3"` casts without a float step.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use enumap_core::{CastFailure, ValueKind};
use serde_json::Value;

type CastFn = dyn Fn(&Value) -> Result<Value, CastFailure> + Send + Sync;

/// Labels of the built-in casters, in table order.
pub const BUILTIN_CASTERS: [&str; 5] = ["int", "float", "str", "bool", "timestamp"];

/// A labelled conversion function for one field.
#[derive(Clone)]
pub struct Caster {
    label: Cow<'static, str>,
    func: Arc<CastFn>,
}

impl Caster {
    /// Wrap an arbitrary conversion.
    ///
    /// Any error the closure returns is reported as `CastFailure::Custom`
    /// and stays reachable from the resulting `CastError` via `source()`.
    pub fn new<F, E>(label: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            label: label.into(),
            func: Arc::new(move |value: &Value| {
                func(value).map_err(|e| CastFailure::Custom(e.into()))
            }),
        }
    }

    fn builtin(
        label: &'static str,
        func: fn(&Value) -> Result<Value, CastFailure>,
    ) -> Self {
        Self {
            label: Cow::Borrowed(label),
            func: Arc::new(func),
        }
    }

    /// Look up a built-in caster by label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "int" => Some(Self::int()),
            "float" => Some(Self::float()),
            "str" => Some(Self::string()),
            "bool" => Some(Self::boolean()),
            "timestamp" => Some(Self::timestamp()),
            _ => None,
        }
    }

    /// Integer conversion. Floats truncate toward zero.
    pub fn int() -> Self {
        Self::builtin("int", cast_int)
    }

    /// Floating point conversion.
    pub fn float() -> Self {
        Self::builtin("float", cast_float)
    }

    /// String rendering. Never fails.
    pub fn string() -> Self {
        Self::builtin("str", cast_string)
    }

    /// Boolean conversion.
    pub fn boolean() -> Self {
        Self::builtin("bool", cast_bool)
    }

    /// UTC timestamp normalization, truncated to seconds.
    pub fn timestamp() -> Self {
        Self::builtin("timestamp", cast_timestamp)
    }

    /// The caster's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Apply the conversion.
    pub fn apply(&self, value: &Value) -> Result<Value, CastFailure> {
        (self.func)(value)
    }
}

impl fmt::Debug for Caster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Caster").field(&self.label).finish()
    }
}

fn unsupported(target: &'static str, value: &Value) -> CastFailure {
    CastFailure::Unsupported {
        target,
        kind: ValueKind::of(value),
    }
}

fn invalid_literal(target: &'static str, literal: &str, reason: impl fmt::Display) -> CastFailure {
    CastFailure::InvalidLiteral {
        target,
        literal: literal.to_string(),
        reason: reason.to_string(),
    }
}

fn truncate_to_int(f: f64) -> Result<Value, CastFailure> {
    let t = f.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if !t.is_finite() || t < i64::MIN as f64 || t >= i64::MAX as f64 {
        return Err(CastFailure::OutOfRange {
            target: "int",
            value: f.to_string(),
        });
    }
    Ok(Value::from(t as i64))
}

fn finite_float(f: f64) -> Result<Value, CastFailure> {
    if !f.is_finite() {
        return Err(CastFailure::OutOfRange {
            target: "float",
            value: f.to_string(),
        });
    }
    Ok(Value::from(f))
}

fn cast_int(value: &Value) -> Result<Value, CastFailure> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::Number(n) => match n.as_f64() {
            Some(f) => truncate_to_int(f),
            None => Err(unsupported("int", value)),
        },
        Value::Bool(b) => Ok(Value::from(i64::from(*b))),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Value::from(i));
            }
            if let Ok(u) = text.parse::<u64>() {
                return Ok(Value::from(u));
            }
            match text.parse::<f64>() {
                Ok(f) => truncate_to_int(f),
                Err(e) => Err(invalid_literal("int", s, e)),
            }
        }
        other => Err(unsupported("int", other)),
    }
}

fn cast_float(value: &Value) -> Result<Value, CastFailure> {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) => finite_float(f),
            None => Err(unsupported("float", value)),
        },
        Value::Bool(b) => Ok(Value::from(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => finite_float(f),
            Err(e) => Err(invalid_literal("float", s, e)),
        },
        other => Err(unsupported("float", other)),
    }
}

fn cast_string(value: &Value) -> Result<Value, CastFailure> {
    Ok(match value {
        Value::String(_) => value.clone(),
        other => Value::String(other.to_string()),
    })
}

fn cast_bool(value: &Value) -> Result<Value, CastFailure> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Ok(Value::Bool(i != 0)),
            (_, Some(u), _) => Ok(Value::Bool(u != 0)),
            (_, _, Some(f)) => Ok(Value::Bool(f != 0.0)),
            _ => Err(unsupported("bool", value)),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid_literal(
                "bool",
                s,
                "expected true/false, yes/no, on/off or 1/0",
            )),
        },
        other => Err(unsupported("bool", other)),
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn cast_timestamp(value: &Value) -> Result<Value, CastFailure> {
    match value {
        Value::String(s) => {
            let dt = DateTime::parse_from_rfc3339(s.trim())
                .map_err(|e| invalid_literal("timestamp", s, e))?;
            Ok(Value::String(
                dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string(),
            ))
        }
        Value::Number(n) => {
            // Fractional seconds truncate toward zero.
            let secs = match n.as_i64() {
                Some(secs) => Some(secs),
                None => n
                    .as_f64()
                    .map(f64::trunc)
                    .filter(|t| t.is_finite() && *t >= i64::MIN as f64 && *t < i64::MAX as f64)
                    .map(|t| t as i64),
            };
            let dt = secs
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .ok_or_else(|| CastFailure::OutOfRange {
                    target: "timestamp",
                    value: n.to_string(),
                })?;
            Ok(Value::String(dt.format(TIMESTAMP_FORMAT).to_string()))
        }
        other => Err(unsupported("timestamp", other)),
    }
}
