// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Table registry entry

use crate::conn_pool::MetadataConn;
use crate::row_cache::{CachePool, CacheStats, RowCache};
use crate::table::{parse_column_type, Table};
use std::sync::Arc;
use tracing::debug;
use ts_common::utils::quote_identifier;
use ts_common::{CacheType, Result, TableColumn, TabletError, Value};

/// Registry entry: table schema plus its row cache assignment
#[derive(Clone)]
pub struct TableInfo {
    pub table: Table,
    pub table_type: String,
    /// Creation time in unix seconds
    pub create_time: i64,
    pub comment: String,
    /// Owned (RW) or aliased (W) row cache, absent when uncached
    pub cache: Option<Arc<RowCache>>,
    cache_pool: Arc<dyn CachePool>,
}

impl TableInfo {
    pub fn new(
        table: Table,
        table_type: impl Into<String>,
        create_time: i64,
        comment: impl Into<String>,
        cache_pool: Arc<dyn CachePool>,
    ) -> Self {
        Self {
            table,
            table_type: table_type.into(),
            create_time,
            comment: comment.into(),
            cache: None,
            cache_pool,
        }
    }

    /// Load column and primary key metadata for `name` over `conn`
    pub fn load(
        conn: &mut dyn MetadataConn,
        name: &str,
        table_type: &str,
        create_time: i64,
        comment: &str,
        cache_pool: Arc<dyn CachePool>,
    ) -> Result<Self> {
        let mut table = Table::new(name);
        let quoted = quote_identifier(name);

        // Field, Type, Collation, Null, Key, Default, Extra, ...
        let columns = conn.execute(&format!("SHOW FULL COLUMNS FROM {}", quoted))?;
        for row in &columns {
            table.add_column(column_from_row(row)?);
        }

        // Table, Non_unique, Key_name, Seq_in_index, Column_name, ...
        let index_rows = conn.execute(&format!("SHOW INDEX FROM {}", quoted))?;
        let mut pk: Vec<(i64, String)> = Vec::new();
        for row in &index_rows {
            if row.len() < 5 {
                return Err(TabletError::MetadataError(format!(
                    "Unexpected index row for {}: {} columns",
                    name,
                    row.len()
                )));
            }
            if row[2].as_text().as_deref() != Some("PRIMARY") {
                continue;
            }
            let seq = row[3].as_i64().unwrap_or(0);
            let column = row[4].as_text().unwrap_or_default();
            pk.push((seq, column));
        }
        pk.sort_by_key(|(seq, _)| *seq);

        if !pk.is_empty() {
            let names: Vec<String> = pk.into_iter().map(|(_, c)| c).collect();
            table.set_pk(&names)?;
        }

        debug!("Loaded table {}: {} columns, pk {:?}", name, table.columns.len(), table.pk_column_names());
        Ok(Self::new(table, table_type, create_time, comment, cache_pool))
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    pub fn cache_type(&self) -> CacheType {
        self.table.cache_type
    }

    pub fn cache_pool(&self) -> &Arc<dyn CachePool> {
        &self.cache_pool
    }

    pub fn set_pk(&mut self, columns: &[String]) -> Result<()> {
        self.table.set_pk(columns)
    }

    /// Give this table its own row cache
    pub fn enable_row_cache(&mut self, prefix: &str) {
        self.cache = Some(Arc::new(RowCache::new(&self.table.name, prefix, self.cache_pool.clone())));
        self.table.cache_type = CacheType::ReadWrite;
    }

    /// Share another table's row cache
    pub fn alias_row_cache(&mut self, cache: Arc<RowCache>) {
        self.cache = Some(cache);
        self.table.cache_type = CacheType::WriteOnly;
    }

    /// Row cache counters, zero when uncached
    pub fn stats(&self) -> CacheStats {
        self.cache.as_ref().map(|c| c.stats()).unwrap_or_default()
    }
}

impl std::fmt::Debug for TableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableInfo")
            .field("table", &self.table)
            .field("table_type", &self.table_type)
            .field("create_time", &self.create_time)
            .field("comment", &self.comment)
            .field("cache", &self.cache)
            .finish()
    }
}

fn column_from_row(row: &[Value]) -> Result<TableColumn> {
    if row.len() < 6 {
        return Err(TabletError::MetadataError(format!(
            "Unexpected column row: {} columns",
            row.len()
        )));
    }

    let name = row[0]
        .as_text()
        .ok_or_else(|| TabletError::MetadataError("Column without name".to_string()))?;
    let type_str = row[1].as_text().unwrap_or_default();
    let (sql_type, is_unsigned) = parse_column_type(&type_str);

    let mut column = TableColumn::new(name, sql_type);
    column.is_unsigned = is_unsigned;
    column.collation = row[2].as_text().unwrap_or_default();
    column.is_nullable = row[3].as_text().as_deref() != Some("NO");
    column.default = row[5].as_text();
    column.is_auto_inc = row
        .get(6)
        .and_then(|v| v.as_text())
        .map_or(false, |extra| extra.contains("auto_increment"));
    Ok(column)
}
