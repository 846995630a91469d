// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! MySQL Result Set Encoding
//!
//! Turns typed rows plus schema column metadata into field descriptors and
//! pre-encoded text protocol rows. Writing them to a client happens in
//! [`crate::conn::ClientConn::write_resultset`]:
//! 1. Column count packet
//! 2. Column definition packets (one per column)
//! 3. EOF packet
//! 4. Row data packets
//! 5. EOF packet

use crate::constants::*;
use crate::field::{format_field, Field};
use crate::packet::write_lenenc_string;
use ts_common::{Result, TableColumn, TabletError, Value};

/// Encoded result set ready to be written to a connection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resultset {
    pub fields: Vec<Field>,
    /// One text protocol row payload per row
    pub row_datas: Vec<Vec<u8>>,
}

impl Resultset {
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_datas.len()
    }
}

/// Build a result set from rectangular rows.
///
/// Field descriptors are derived from the first row's values, then type,
/// charset and signedness are taken from `columns`. Flags derived from the
/// first row stay in place even if later rows hold NULLs in that column.
pub fn build_resultset(columns: &[TableColumn], rows: &[Vec<Value>]) -> Result<Resultset> {
    let mut fields: Vec<Field> = columns.iter().map(|c| Field::new(c.name.as_str())).collect();
    let mut row_datas = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        if row.len() != fields.len() {
            return Err(TabletError::ColumnCountMismatch {
                row: i,
                columns: row.len(),
                fields: fields.len(),
            });
        }

        let mut data = Vec::new();
        for (j, value) in row.iter().enumerate() {
            if i == 0 {
                format_field(&mut fields[j], value)?;
                apply_column_metadata(&mut fields[j], &columns[j]);
            }

            if value.is_null() {
                data.push(NULL_VALUE);
            } else {
                let field = &fields[j];
                let raw = raw_value(field.column_type, value, field.is_unsigned)?;
                write_lenenc_string(&mut data, &raw);
            }
        }

        row_datas.push(data);
    }

    if rows.is_empty() {
        for (field, column) in fields.iter_mut().zip(columns) {
            apply_column_metadata(field, column);
        }
    }

    Ok(Resultset { fields, row_datas })
}

/// Schema metadata is authoritative for type, charset and signedness
fn apply_column_metadata(field: &mut Field, column: &TableColumn) {
    field.column_type = column.sql_type;
    if let Some(charset) = collation_id(&column.collation) {
        field.charset = charset;
    }
    field.is_unsigned = column.is_unsigned;
    field.column_length = default_column_length(column.sql_type);
}

/// Text protocol rendering of a non-NULL value for the given wire type
pub fn raw_value(column_type: u8, value: &Value, is_unsigned: bool) -> Result<Vec<u8>> {
    let raw = match value {
        Value::Int8(v) => format_signed(*v as i64, is_unsigned),
        Value::Int16(v) => format_signed(*v as i64, is_unsigned),
        Value::Int32(v) => format_signed(*v as i64, is_unsigned),
        Value::Int64(v) => format_signed(*v, is_unsigned),
        Value::UInt8(v) => v.to_string().into_bytes(),
        Value::UInt16(v) => v.to_string().into_bytes(),
        Value::UInt32(v) => v.to_string().into_bytes(),
        Value::UInt64(v) => v.to_string().into_bytes(),
        Value::Float32(v) => v.to_string().into_bytes(),
        Value::Float64(v) => {
            if column_type == MYSQL_TYPE_FLOAT {
                (*v as f32).to_string().into_bytes()
            } else {
                v.to_string().into_bytes()
            }
        }
        Value::String(s) => s.as_bytes().to_vec(),
        Value::Bytes(b) => b.clone(),
        Value::Null => Vec::new(),
        Value::Bool(_) | Value::Timestamp(_) => {
            return Err(TabletError::UnsupportedType(value.type_name().to_string()));
        }
    };
    Ok(raw)
}

fn format_signed(v: i64, is_unsigned: bool) -> Vec<u8> {
    if is_unsigned {
        (v as u64).to_string().into_bytes()
    } else {
        v.to_string().into_bytes()
    }
}
