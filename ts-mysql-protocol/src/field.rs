// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Column definition (field descriptor) encoding

use crate::constants::*;
use crate::packet::{put_u16, put_u32, write_lenenc_int, write_lenenc_string};
use ts_common::{Result, TabletError, Value, ValueCategory};

/// Column definition sent ahead of result rows
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub schema: String,
    pub table: String,
    pub org_table: String,
    pub name: String,
    pub org_name: String,
    pub charset: u16,
    pub column_length: u32,
    pub column_type: u8,
    pub flags: u16,
    pub decimals: u8,
    pub is_unsigned: bool,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            schema: String::new(),
            table: String::new(),
            org_table: String::new(),
            org_name: name.clone(),
            name,
            charset: 0,
            column_length: 0,
            column_type: MYSQL_TYPE_NULL,
            flags: 0,
            decimals: 0,
            is_unsigned: false,
        }
    }

    /// Flags as sent on the wire
    pub fn wire_flags(&self) -> u16 {
        if self.is_unsigned {
            self.flags | UNSIGNED_FLAG
        } else {
            self.flags
        }
    }

    /// Encode to packet payload (Protocol 4.1)
    pub fn dump(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(64 + self.name.len() * 2);

        write_lenenc_string(&mut payload, b"def");
        write_lenenc_string(&mut payload, self.schema.as_bytes());
        write_lenenc_string(&mut payload, self.table.as_bytes());
        write_lenenc_string(&mut payload, self.org_table.as_bytes());
        write_lenenc_string(&mut payload, self.name.as_bytes());
        write_lenenc_string(&mut payload, self.org_name.as_bytes());

        // Length of fixed-length fields (always 0x0c = 12)
        write_lenenc_int(&mut payload, 0x0c);

        put_u16(&mut payload, self.charset);
        put_u32(&mut payload, self.column_length);
        payload.push(self.column_type);
        put_u16(&mut payload, self.wire_flags());
        payload.push(self.decimals);

        // Filler
        put_u16(&mut payload, 0);

        payload
    }
}

/// Derive wire type, charset and flags from a representative value.
///
/// Floats only set the charset and nulls leave the field untouched; in both
/// cases the type comes from schema metadata.
pub fn format_field(field: &mut Field, value: &Value) -> Result<()> {
    match value.category() {
        ValueCategory::Signed => {
            field.charset = BINARY_CHARSET;
            field.column_type = MYSQL_TYPE_LONGLONG;
            field.flags = BINARY_FLAG | NOT_NULL_FLAG;
        }
        ValueCategory::Unsigned => {
            field.charset = BINARY_CHARSET;
            field.column_type = MYSQL_TYPE_LONGLONG;
            field.flags = BINARY_FLAG | NOT_NULL_FLAG | UNSIGNED_FLAG;
        }
        ValueCategory::Float => {
            field.charset = BINARY_CHARSET;
        }
        ValueCategory::Text => {
            field.charset = UTF8_CHARSET;
            field.column_type = MYSQL_TYPE_VARCHAR;
        }
        ValueCategory::Null => {}
        ValueCategory::Other => {
            return Err(TabletError::UnsupportedType(value.type_name().to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::read_lenenc_string;
    use std::io::{Cursor, Read};

    #[test]
    fn test_format_signed() {
        for v in [Value::Int8(1), Value::Int16(1), Value::Int32(1), Value::Int64(-5)] {
            let mut field = Field::new("id");
            format_field(&mut field, &v).unwrap();
            assert_eq!(field.column_type, MYSQL_TYPE_LONGLONG);
            assert_eq!(field.charset, BINARY_CHARSET);
            assert_eq!(field.flags, BINARY_FLAG | NOT_NULL_FLAG);
        }
    }

    #[test]
    fn test_format_unsigned() {
        let mut field = Field::new("n");
        format_field(&mut field, &Value::UInt64(7)).unwrap();
        assert_eq!(field.column_type, MYSQL_TYPE_LONGLONG);
        assert_eq!(field.flags, BINARY_FLAG | NOT_NULL_FLAG | UNSIGNED_FLAG);
    }

    #[test]
    fn test_format_float_only_sets_charset() {
        let mut field = Field::new("score");
        format_field(&mut field, &Value::Float64(1.5)).unwrap();
        assert_eq!(field.charset, BINARY_CHARSET);
        assert_eq!(field.column_type, MYSQL_TYPE_NULL);
        assert_eq!(field.flags, 0);
    }

    #[test]
    fn test_format_text() {
        for v in [Value::String("a".into()), Value::Bytes(b"a".to_vec())] {
            let mut field = Field::new("name");
            format_field(&mut field, &v).unwrap();
            assert_eq!(field.column_type, MYSQL_TYPE_VARCHAR);
            assert_eq!(field.charset, UTF8_CHARSET);
        }
    }

    #[test]
    fn test_format_null_is_noop() {
        let mut field = Field::new("x");
        let before = field.clone();
        format_field(&mut field, &Value::Null).unwrap();
        assert_eq!(field, before);
    }

    #[test]
    fn test_format_unsupported_names_type() {
        let mut field = Field::new("flag");
        let err = format_field(&mut field, &Value::Bool(true)).unwrap_err();
        assert!(matches!(err, TabletError::UnsupportedType(ref t) if t == "bool"));
        assert!(err.to_string().contains("bool"));
    }

    #[test]
    fn test_dump_layout() {
        let mut field = Field::new("user_id");
        field.charset = BINARY_CHARSET;
        field.column_type = MYSQL_TYPE_LONGLONG;
        field.column_length = 20;
        field.flags = NOT_NULL_FLAG;
        field.is_unsigned = true;

        let payload = field.dump();
        let mut cursor = Cursor::new(payload);
        assert_eq!(read_lenenc_string(&mut cursor).unwrap(), b"def");
        for _ in 0..3 {
            assert!(read_lenenc_string(&mut cursor).unwrap().is_empty());
        }
        assert_eq!(read_lenenc_string(&mut cursor).unwrap(), b"user_id");
        assert_eq!(read_lenenc_string(&mut cursor).unwrap(), b"user_id");

        let mut fixed = [0u8; 13];
        cursor.read_exact(&mut fixed).unwrap();
        assert_eq!(fixed[0], 0x0c);
        assert_eq!(u16::from_le_bytes([fixed[1], fixed[2]]), BINARY_CHARSET);
        assert_eq!(u32::from_le_bytes([fixed[3], fixed[4], fixed[5], fixed[6]]), 20);
        assert_eq!(fixed[7], MYSQL_TYPE_LONGLONG);
        assert_eq!(u16::from_le_bytes([fixed[8], fixed[9]]), NOT_NULL_FLAG | UNSIGNED_FLAG);
        assert_eq!(&fixed[11..13], &[0, 0]);
    }
}
