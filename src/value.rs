//! Parameter values - the tagged union stored for every key
//!
//! A value is one of four kinds. Callers pick the kind explicitly through the
//! `From` conversions, or go through [`ParameterValue::from_json`] when the
//! kind is only known at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Discriminant of a [`ParameterValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    /// Scalar double
    Float64,
    /// Ordered sequence of doubles
    Float64Vector,
    /// String
    Text,
    /// Unsigned 32-bit integer
    UInt32,
}

impl ParameterKind {
    /// Get kind name as string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Float64Vector => "float64 vector",
            Self::Text => "text",
            Self::UInt32 => "uint32",
        }
    }

    /// Whether values of this kind may carry an uncertainty.
    #[must_use]
    pub const fn can_carry_error(&self) -> bool {
        matches!(self, Self::Float64 | Self::Float64Vector)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    /// Scalar double
    Float64(f64),
    /// Ordered sequence of doubles (owned copy)
    Float64Vector(Vec<f64>),
    /// String
    Text(String),
    /// Unsigned 32-bit integer
    UInt32(u32),
}

impl ParameterValue {
    /// Get the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        match self {
            Self::Float64(_) => ParameterKind::Float64,
            Self::Float64Vector(_) => ParameterKind::Float64Vector,
            Self::Text(_) => ParameterKind::Text,
            Self::UInt32(_) => ParameterKind::UInt32,
        }
    }

    /// Classify an integer.
    ///
    /// Negative integers are widened to `Float64` since `UInt32` cannot hold
    /// them.
    ///
    /// # Errors
    ///
    /// Returns `TypeError` if the integer exceeds `u32::MAX`.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_integer(value: i64) -> Result<Self> {
        if value < 0 {
            return Ok(Self::Float64(value as f64));
        }
        u32::try_from(value)
            .map(Self::UInt32)
            .map_err(|_| Error::TypeError(format!("integer {value} does not fit in uint32")))
    }

    /// Classify a dynamically typed JSON value.
    ///
    /// - float -> `Float64`
    /// - string -> `Text`
    /// - integer -> see [`ParameterValue::from_integer`]
    /// - array of floats -> `Float64Vector`
    ///
    /// # Errors
    ///
    /// Returns `TypeError` for objects, booleans, null, out-of-range
    /// integers, and arrays holding anything other than floats.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(Self::Float64)
                .ok_or_else(|| Error::TypeError(format!("unrepresentable number {n}"))),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::from_integer(i),
                None => Err(Error::TypeError(format!("integer {n} does not fit in uint32"))),
            },
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) if n.is_f64() => n.as_f64(),
                    _ => None,
                })
                .collect::<Option<Vec<f64>>>()
                .map(Self::Float64Vector)
                .ok_or_else(|| Error::TypeError("non-float value in list or array".to_string())),
            Value::Object(_) | Value::Bool(_) | Value::Null => Err(Error::TypeError(
                format!("unsupported value type: {value}"),
            )),
        }
    }

    /// Convert to a JSON value (vectors become arrays).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Float64(v) => serde_json::json!(v),
            Self::Float64Vector(v) => serde_json::json!(v),
            Self::Text(s) => serde_json::json!(s),
            Self::UInt32(v) => serde_json::json!(v),
        }
    }

    /// Get the scalar, if this is a `Float64`.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the elements, if this is a `Float64Vector`.
    #[must_use]
    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Self::Float64Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Get the string, if this is `Text`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer, if this is a `UInt32`.
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<u32> for ParameterValue {
    fn from(value: u32) -> Self {
        Self::UInt32(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        u32::try_from(value).map_or_else(|_| Self::Float64(f64::from(value)), Self::UInt32)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Float64Vector(value)
    }
}

impl From<&[f64]> for ParameterValue {
    fn from(value: &[f64]) -> Self {
        Self::Float64Vector(value.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ParameterValue {
    fn from(value: [f64; N]) -> Self {
        Self::Float64Vector(value.to_vec())
    }
}

impl TryFrom<&serde_json::Value> for ParameterValue {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        Self::from_json(value)
    }
}
