//! Typed option values.
//!
//! Every option carries exactly one [`FlagValue`]; its [`ValueKind`] is
//! fixed when the option is built and never changes afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Int,
    Int64,
    String,
    Bool,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Bool => "bool",
        }
    }

    /// The zero value of this kind.
    pub fn zero(self) -> FlagValue {
        match self {
            Self::Int => FlagValue::Int(0),
            Self::Int64 => FlagValue::Int64(0),
            Self::String => FlagValue::String(String::new()),
            Self::Bool => FlagValue::Bool(false),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Int(i32),
    Int64(i64),
    String(String),
    Bool(bool),
}

impl FlagValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Int64(_) => ValueKind::Int64,
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
        }
    }

    /// Parse a command-line token as a value of `kind`.
    ///
    /// Integers are decimal with an optional sign. Booleans accept
    /// `true/false/t/f/1/0` in any case. Strings are taken verbatim.
    pub fn parse_as(kind: ValueKind, token: &str) -> Result<Self, ValueError> {
        match kind {
            ValueKind::Int => token
                .trim()
                .parse::<i32>()
                .map(Self::Int)
                .map_err(|_| ValueError::InvalidIntegerValue {
                    value: token.to_string(),
                    kind,
                }),
            ValueKind::Int64 => token
                .trim()
                .parse::<i64>()
                .map(Self::Int64)
                .map_err(|_| ValueError::InvalidIntegerValue {
                    value: token.to_string(),
                    kind,
                }),
            ValueKind::String => Ok(Self::String(token.to_string())),
            ValueKind::Bool => match token.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(Self::Bool(true)),
                "false" | "f" | "0" => Ok(Self::Bool(false)),
                _ => Err(ValueError::InvalidBooleanValue {
                    value: token.to_string(),
                }),
            },
        }
    }

    fn mismatch(&self, expected: ValueKind) -> ValueError {
        ValueError::KindMismatch {
            expected,
            actual: self.kind(),
        }
    }

    pub fn as_int(&self) -> Result<i32, ValueError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(other.mismatch(ValueKind::Int)),
        }
    }

    pub fn as_int64(&self) -> Result<i64, ValueError> {
        match self {
            Self::Int64(v) => Ok(*v),
            other => Err(other.mismatch(ValueKind::Int64)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Self::String(v) => Ok(v.as_str()),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i32> for FlagValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for FlagValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<bool> for FlagValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for FlagValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FlagValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Rust types an option value can be read back as.
pub trait FlagType: Sized {
    const KIND: ValueKind;

    fn from_value(value: &FlagValue) -> Result<Self, ValueError>;
}

impl FlagType for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_value(value: &FlagValue) -> Result<Self, ValueError> {
        value.as_int()
    }
}

impl FlagType for i64 {
    const KIND: ValueKind = ValueKind::Int64;

    fn from_value(value: &FlagValue) -> Result<Self, ValueError> {
        value.as_int64()
    }
}

impl FlagType for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_value(value: &FlagValue) -> Result<Self, ValueError> {
        value.as_str().map(str::to_string)
    }
}

impl FlagType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_value(value: &FlagValue) -> Result<Self, ValueError> {
        value.as_bool()
    }
}
