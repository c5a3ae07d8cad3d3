//! Metadata value types for graphs, vertices and edges
//!
//! Every entity carries an open-ended key -> value bag. Values are a tagged
//! union rather than a dynamically-cast object, so a read either matches the
//! requested type or returns `None`; there is no runtime cast failure.
//! Absence of a key is distinct from a key present with [`MetadataValue::Null`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Metadata value supporting multiple data types
///
/// Supports:
/// - String
/// - Integer (i64)
/// - Float (f64)
/// - Boolean
/// - Array (Vec<MetadataValue>)
/// - Null (present but empty)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<MetadataValue>),
    Null,
}

impl MetadataValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, MetadataValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            MetadataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get array value if this is an array
    pub fn as_array(&self) -> Option<&Vec<MetadataValue>> {
        match self {
            MetadataValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            MetadataValue::String(_) => "String",
            MetadataValue::Integer(_) => "Integer",
            MetadataValue::Float(_) => "Float",
            MetadataValue::Boolean(_) => "Boolean",
            MetadataValue::Array(_) => "Array",
            MetadataValue::Null => "Null",
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "\"{}\"", s),
            MetadataValue::Integer(i) => write!(f, "{}", i),
            MetadataValue::Float(fl) => write!(f, "{}", fl),
            MetadataValue::Boolean(b) => write!(f, "{}", b),
            MetadataValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            MetadataValue::Null => write!(f, "null"),
        }
    }
}

// Convenience conversions
impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::String(s)
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::String(s.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<i32> for MetadataValue {
    fn from(i: i32) -> Self {
        MetadataValue::Integer(i as i64)
    }
}

impl From<f64> for MetadataValue {
    fn from(f: f64) -> Self {
        MetadataValue::Float(f)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Boolean(b)
    }
}

impl From<Vec<MetadataValue>> for MetadataValue {
    fn from(arr: Vec<MetadataValue>) -> Self {
        MetadataValue::Array(arr)
    }
}

/// Metadata map for graphs, vertices and edges
pub type MetadataMap = HashMap<String, MetadataValue>;
