// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Table schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_common::{CacheType, Result, TableColumn, TabletError};
use ts_mysql_protocol::constants::*;

/// Schema of one table as mirrored from the backing store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    pub name: String,

    /// Columns in ordinal order
    pub columns: Vec<TableColumn>,

    /// Primary key as indexes into `columns`
    pub pk_columns: Vec<usize>,

    pub cache_type: CacheType,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            pk_columns: Vec::new(),
            cache_type: CacheType::None,
        }
    }

    pub fn add_column(&mut self, column: TableColumn) {
        self.columns.push(column);
    }

    /// Index of a column by name (case-insensitive, as MySQL compares them)
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.find_column(name).map(|i| &self.columns[i])
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn pk_column_names(&self) -> Vec<&str> {
        self.pk_columns
            .iter()
            .map(|&i| self.columns[i].name.as_str())
            .collect()
    }

    /// Replace the primary key. The table is unchanged on error.
    pub fn set_pk(&mut self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Err(TabletError::InvalidArgument(format!(
                "empty primary key for table {}",
                self.name
            )));
        }

        let mut pk = Vec::with_capacity(names.len());
        let mut seen = HashSet::new();
        for name in names {
            let index = self.find_column(name).ok_or_else(|| {
                TabletError::InvalidArgument(format!(
                    "column {} not found in table {}",
                    name, self.name
                ))
            })?;
            if !seen.insert(index) {
                return Err(TabletError::InvalidArgument(format!(
                    "duplicate primary key column {} in table {}",
                    name, self.name
                )));
            }
            pk.push(index);
        }

        self.pk_columns = pk;
        Ok(())
    }
}

/// Map a column type as reported by `SHOW FULL COLUMNS` (e.g. `bigint(20) unsigned`)
/// to its wire type and signedness.
pub fn parse_column_type(type_str: &str) -> (u8, bool) {
    let lower = type_str.trim().to_lowercase();
    let is_unsigned = lower.split_whitespace().any(|w| w == "unsigned");
    let base = lower
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or("");

    let sql_type = match base {
        "tinyint" | "bool" | "boolean" => MYSQL_TYPE_TINY,
        "smallint" => MYSQL_TYPE_SHORT,
        "mediumint" => MYSQL_TYPE_INT24,
        "int" | "integer" => MYSQL_TYPE_LONG,
        "bigint" => MYSQL_TYPE_LONGLONG,
        "float" => MYSQL_TYPE_FLOAT,
        "double" | "real" => MYSQL_TYPE_DOUBLE,
        "decimal" | "numeric" => MYSQL_TYPE_NEWDECIMAL,
        "bit" => MYSQL_TYPE_BIT,
        "year" => MYSQL_TYPE_YEAR,
        "date" => MYSQL_TYPE_DATE,
        "time" => MYSQL_TYPE_TIME,
        "datetime" => MYSQL_TYPE_DATETIME,
        "timestamp" => MYSQL_TYPE_TIMESTAMP,
        "char" | "binary" => MYSQL_TYPE_STRING,
        "varchar" | "varbinary" => MYSQL_TYPE_VAR_STRING,
        "tinytext" | "tinyblob" => MYSQL_TYPE_TINY_BLOB,
        "text" | "blob" => MYSQL_TYPE_BLOB,
        "mediumtext" | "mediumblob" => MYSQL_TYPE_MEDIUM_BLOB,
        "longtext" | "longblob" => MYSQL_TYPE_LONG_BLOB,
        "enum" => MYSQL_TYPE_ENUM,
        "set" => MYSQL_TYPE_SET,
        "json" => MYSQL_TYPE_JSON,
        "geometry" | "point" | "linestring" | "polygon" => MYSQL_TYPE_GEOMETRY,
        _ => MYSQL_TYPE_VAR_STRING,
    };

    (sql_type, is_unsigned && is_integer_type(sql_type))
}
