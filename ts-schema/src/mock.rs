// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! In-memory metadata store for tests
//!
//! Answers the table-list, column and index statements issued while loading
//! tables, so the schema manager can run without a MySQL server.

use crate::conn_pool::{ConnectionPool, MetadataConn, PooledConn};
use crate::schema_info::BASE_SHOW_TABLES;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use ts_common::{Result, TabletError, Value};

#[derive(Debug, Clone)]
pub struct MockColumn {
    pub name: String,
    /// Type as `SHOW FULL COLUMNS` prints it, e.g. `bigint(20) unsigned`
    pub type_str: String,
    pub collation: Option<String>,
    pub nullable: bool,
    pub default: Option<String>,
    pub extra: String,
}

#[derive(Debug, Clone)]
pub struct MockTable {
    pub name: String,
    pub table_type: String,
    pub create_time: i64,
    pub comment: String,
    pub columns: Vec<MockColumn>,
    pub primary_key: Vec<String>,
}

impl MockTable {
    pub fn new(name: impl Into<String>, create_time: i64) -> Self {
        Self {
            name: name.into(),
            table_type: "BASE TABLE".to_string(),
            create_time,
            comment: String::new(),
            columns: Vec::new(),
            primary_key: Vec::new(),
        }
    }

    pub fn column(mut self, name: &str, type_str: &str) -> Self {
        self.columns.push(MockColumn {
            name: name.to_string(),
            type_str: type_str.to_string(),
            collation: None,
            nullable: true,
            default: None,
            extra: String::new(),
        });
        self
    }

    pub fn text_column(mut self, name: &str, type_str: &str, collation: &str) -> Self {
        self = self.column(name, type_str);
        if let Some(col) = self.columns.last_mut() {
            col.collation = Some(collation.to_string());
        }
        self
    }

    /// Declare the primary key; its columns become NOT NULL
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        for col in &mut self.columns {
            if self.primary_key.contains(&col.name) {
                col.nullable = false;
            }
        }
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn view(mut self) -> Self {
        self.table_type = "VIEW".to_string();
        self
    }
}

#[derive(Default)]
struct MockState {
    tables: RwLock<BTreeMap<String, MockTable>>,
    executed: Mutex<Vec<String>>,
    checked_out: AtomicUsize,
    closed: AtomicBool,
    fail_queries: AtomicBool,
}

/// Shared in-memory catalog; clones observe the same tables
#[derive(Clone, Default)]
pub struct MockMetadataStore {
    state: Arc<MockState>,
}

impl MockMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a table
    pub fn create_table(&self, table: MockTable) {
        self.state.tables.write().insert(table.name.clone(), table);
    }

    pub fn drop_table(&self, name: &str) -> bool {
        self.state.tables.write().remove(name).is_some()
    }

    /// Statements executed so far, in order
    pub fn executed(&self) -> Vec<String> {
        self.state.executed.lock().clone()
    }

    /// Connections currently checked out
    pub fn checked_out(&self) -> usize {
        self.state.checked_out.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    /// Make every statement fail until reset
    pub fn set_fail_queries(&self, fail: bool) {
        self.state.fail_queries.store(fail, Ordering::SeqCst);
    }
}

impl ConnectionPool for MockMetadataStore {
    fn get_conn(&self) -> Result<PooledConn> {
        if self.is_closed() {
            return Err(TabletError::ConnectionClosed);
        }
        self.state.checked_out.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConn {
            state: self.state.clone(),
        }))
    }

    fn close(&self) {
        self.state.closed.store(true, Ordering::SeqCst);
    }
}

struct MockConn {
    state: Arc<MockState>,
}

impl Drop for MockConn {
    fn drop(&mut self) {
        self.state.checked_out.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MetadataConn for MockConn {
    fn execute(&mut self, sql: &str) -> Result<Vec<Vec<Value>>> {
        self.state.executed.lock().push(sql.to_string());
        if self.state.fail_queries.load(Ordering::SeqCst) {
            return Err(TabletError::MetadataError(format!("Query failed: {}", sql)));
        }

        let tables = self.state.tables.read();

        if let Some(rest) = sql.strip_prefix(BASE_SHOW_TABLES) {
            let filter = quoted_after(rest, "table_name = '");
            return Ok(tables
                .values()
                .filter(|t| filter.as_deref().map_or(true, |name| name == t.name))
                .map(|t| {
                    vec![
                        Value::from(t.name.as_str()),
                        Value::from(t.table_type.as_str()),
                        Value::Int64(t.create_time),
                        Value::from(t.comment.as_str()),
                    ]
                })
                .collect());
        }

        let lower = sql.to_lowercase();
        if let Some(name) = lower.strip_prefix("show full columns from ") {
            let table = lookup(&tables, name)?;
            return Ok(table.columns.iter().map(|c| column_row(table, c)).collect());
        }
        if let Some(name) = lower.strip_prefix("show index from ") {
            let table = lookup(&tables, name)?;
            return Ok(table
                .primary_key
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    vec![
                        Value::from(table.name.as_str()),
                        Value::Int64(0),
                        Value::from("PRIMARY"),
                        Value::Int64(i as i64 + 1),
                        Value::from(col.as_str()),
                        Value::from("A"),
                        Value::Null,
                    ]
                })
                .collect());
        }

        Ok(Vec::new())
    }
}

fn lookup<'a>(tables: &'a BTreeMap<String, MockTable>, quoted: &str) -> Result<&'a MockTable> {
    let name = quoted.trim().trim_matches('`').replace("``", "`");
    tables
        .values()
        .find(|t| t.name.eq_ignore_ascii_case(&name))
        .ok_or_else(|| TabletError::MetadataError(format!("Table '{}' doesn't exist", name)))
}

fn quoted_after(s: &str, marker: &str) -> Option<String> {
    let start = s.find(marker)? + marker.len();
    let end = s[start..].find('\'')?;
    Some(s[start..start + end].to_string())
}

fn column_row(table: &MockTable, c: &MockColumn) -> Vec<Value> {
    let key = if table.primary_key.contains(&c.name) { "PRI" } else { "" };
    vec![
        Value::from(c.name.as_str()),
        Value::from(c.type_str.as_str()),
        c.collation.as_deref().map(Value::from).unwrap_or(Value::Null),
        Value::from(if c.nullable { "YES" } else { "NO" }),
        Value::from(key),
        c.default.as_deref().map(Value::from).unwrap_or(Value::Null),
        Value::from(c.extra.as_str()),
        Value::from("select,insert,update,references"),
        Value::from(""),
    ]
}
