//! Scalar values and the type-sniffing coercion used by the Record Store.
//!
//! INI files carry no type tags, so types are recovered on read by trying
//! each parse in a fixed precedence order: integer, then float, then
//! boolean keyword, else trimmed string. The ambiguity is accepted by
//! design: the literal text `"42"` reads back as the integer `42`, and the
//! literal string `"true"` can never be stored as a string. Callers that
//! need exact text should avoid values that sniff as another type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar field value in a Record Store section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Scalar {
    /// Recover the most specific type from an on-disk string.
    ///
    /// Precedence: integer → float → boolean (case-insensitive
    /// `true`/`yes`/`on` and `false`/`no`/`off`) → trimmed string.
    pub fn sniff(raw: &str) -> Scalar {
        if let Ok(i) = raw.trim().parse::<i64>() {
            return Scalar::Int(i);
        }
        if let Ok(f) = raw.trim().parse::<f64>() {
            return Scalar::Float(f);
        }
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" => return Scalar::Bool(true),
            "false" | "no" | "off" => return Scalar::Bool(false),
            _ => {}
        }
        Scalar::Str(raw.trim().to_string())
    }

    /// Render for the INI file: booleans as lowercase `true`/`false`,
    /// numbers in their default form, strings passed through.
    pub fn to_ini_string(&self) -> String {
        match self {
            Scalar::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s.clone(),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ini_string())
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}
