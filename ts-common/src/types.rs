// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Common type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Row-cache policy assigned to a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CacheType {
    /// No row cache
    #[default]
    None,
    /// Table owns a read-write row cache
    ReadWrite,
    /// Table shares (aliases) another table's row cache
    WriteOnly,
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CacheType::None => "NONE",
            CacheType::ReadWrite => "RW",
            CacheType::WriteOnly => "W",
        };
        f.write_str(s)
    }
}

/// Semantic category of an in-memory value, used to derive wire metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueCategory {
    Null,
    Signed,
    Unsigned,
    Float,
    Text,
    Other,
}

/// Cell value as produced by query execution or metadata queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Timestamp(SystemTime),
}

impl Value {
    pub fn category(&self) -> ValueCategory {
        match self {
            Value::Null => ValueCategory::Null,
            Value::Int8(_) | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => ValueCategory::Signed,
            Value::UInt8(_) | Value::UInt16(_) | Value::UInt32(_) | Value::UInt64(_) => {
                ValueCategory::Unsigned
            }
            Value::Float32(_) | Value::Float64(_) => ValueCategory::Float,
            Value::String(_) | Value::Bytes(_) => ValueCategory::Text,
            Value::Bool(_) | Value::Timestamp(_) => ValueCategory::Other,
        }
    }

    /// Name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int8(_) => "i8",
            Value::Int16(_) => "i16",
            Value::Int32(_) => "i32",
            Value::Int64(_) => "i64",
            Value::UInt8(_) => "u8",
            Value::UInt16(_) => "u16",
            Value::UInt32(_) => "u32",
            Value::UInt64(_) => "u64",
            Value::Float32(_) => "f32",
            Value::Float64(_) => "f64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Bool(_) => "bool",
            Value::Timestamp(_) => "timestamp",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Signed integer view. Unsigned values above `i64::MAX` do not fit.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int8(v) => Some(*v as i64),
            Value::Int16(v) => Some(*v as i64),
            Value::Int32(v) => Some(*v as i64),
            Value::Int64(v) => Some(*v),
            Value::UInt8(v) => Some(*v as i64),
            Value::UInt16(v) => Some(*v as i64),
            Value::UInt32(v) => Some(*v as i64),
            Value::UInt64(v) => i64::try_from(*v).ok(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bytes(b) => std::str::from_utf8(b).ok()?.trim().parse().ok(),
            _ => None,
        }
    }

    /// Textual view of string-like values
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Column metadata as known from the backing store's schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Column name
    pub name: String,

    /// MySQL wire type (MYSQL_TYPE_*)
    pub sql_type: u8,

    /// Collation name, empty for non-textual columns
    pub collation: String,

    pub is_unsigned: bool,

    pub is_nullable: bool,

    pub is_auto_inc: bool,

    pub default: Option<String>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, sql_type: u8) -> Self {
        Self {
            name: name.into(),
            sql_type,
            collation: String::new(),
            is_unsigned: false,
            is_nullable: true,
            is_auto_inc: false,
            default: None,
        }
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = collation.into();
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.is_unsigned = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_categories() {
        assert_eq!(Value::Int8(1).category(), ValueCategory::Signed);
        assert_eq!(Value::Int64(-1).category(), ValueCategory::Signed);
        assert_eq!(Value::UInt16(1).category(), ValueCategory::Unsigned);
        assert_eq!(Value::Float32(1.0).category(), ValueCategory::Float);
        assert_eq!(Value::Bytes(vec![1]).category(), ValueCategory::Text);
        assert_eq!(Value::Null.category(), ValueCategory::Null);
        assert_eq!(Value::Bool(true).category(), ValueCategory::Other);
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(Value::String(" 1446000000 ".to_string()).as_i64(), Some(1446000000));
        assert_eq!(Value::Bytes(b"42".to_vec()).as_i64(), Some(42));
        assert_eq!(Value::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Value::Null.as_i64(), None);
    }

    #[test]
    fn test_option_into_value() {
        let v: Value = Option::<&str>::None.into();
        assert!(v.is_null());
        let v: Value = Some("x").into();
        assert_eq!(v, Value::String("x".to_string()));
    }

    #[test]
    fn test_cache_type_display() {
        assert_eq!(CacheType::default(), CacheType::None);
        assert_eq!(CacheType::ReadWrite.to_string(), "RW");
        assert_eq!(CacheType::WriteOnly.to_string(), "W");
    }
}
