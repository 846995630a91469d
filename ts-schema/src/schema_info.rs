// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Schema & plan cache manager
//!
//! Mirrors table schemas from the backing store, applies override policy,
//! caches compiled plans by raw SQL text and aggregates per-table and
//! per-plan statistics.
//!
//! Locking: the registry lock may be held while taking the plan cache lock,
//! never the other way around.

use crate::conn_pool::ConnectionPool;
use crate::exec_plan::{ExecPlan, PerQueryStats, Plan, PlanBuilder, PlanStats};
use crate::plan_cache::PlanCache;
use crate::row_cache::CachePool;
use crate::schema_override::apply_overrides;
use crate::table::Table;
use crate::table_info::TableInfo;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use ts_common::constants::{JOIN_TABLE_NAME, MAX_TABLE_COUNT};
use ts_common::utils::{current_timestamp_s, escape_string, format_bytes};
use ts_common::{CacheType, Config, Result, SchemaOverride, TabletError, Value};

/// Lists tables of the connected database: name, type, create time, comment
pub const BASE_SHOW_TABLES: &str = "select table_name, table_type, unix_timestamp(create_time), table_comment from information_schema.tables where table_schema = database()";

type Registry = HashMap<String, Arc<TableInfo>>;

pub struct SchemaInfo {
    tables: RwLock<Registry>,
    overrides: RwLock<Vec<SchemaOverride>>,
    queries: Mutex<PlanCache<Arc<ExecPlan>>>,
    /// Bumped under the plan cache lock on every clear
    plan_generation: AtomicU64,
    cache_pool: Arc<dyn CachePool>,
    conn_pool: Arc<dyn ConnectionPool>,
    /// Unix seconds of the last schema reload
    last_change: AtomicI64,
    closed: AtomicBool,
}

impl SchemaInfo {
    /// Create the manager, open the row cache pool and eagerly load every
    /// table named by an override rule.
    ///
    /// Fails if the backing store cannot be reached.
    pub fn new(
        config: &Config,
        conn_pool: Arc<dyn ConnectionPool>,
        cache_pool: Arc<dyn CachePool>,
    ) -> Result<Self> {
        config.validate()?;

        // Check the store is reachable; the connection goes straight back to the pool
        drop(conn_pool.get_conn()?);

        info!(
            "Schema overrides: {:?}, query cache size {}",
            config.schema_overrides,
            format_bytes(config.query_cache_size as u64)
        );
        cache_pool.open();

        let si = Self {
            tables: RwLock::new(HashMap::new()),
            overrides: RwLock::new(config.schema_overrides.clone()),
            queries: Mutex::new(PlanCache::new(config.query_cache_size)),
            plan_generation: AtomicU64::new(0),
            cache_pool,
            conn_pool,
            last_change: AtomicI64::new(current_timestamp_s()),
            closed: AtomicBool::new(false),
        };

        for rule in &config.schema_overrides {
            si.load_or_refresh_table(&rule.name)?;
        }

        Ok(si)
    }

    /// Connect to the store described by `config` and build the manager
    #[cfg(feature = "mysql-integration")]
    pub fn open(config: &Config) -> Result<Self> {
        use crate::conn_pool::MysqlConnPool;
        use crate::row_cache::RowCachePool;

        let conn_pool = Arc::new(MysqlConnPool::connect(config)?);
        let cache_pool = Arc::new(RowCachePool::new(config.db_name.clone(), config.row_cache.clone()));
        Self::new(config, conn_pool, cache_pool)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(TabletError::Closed);
        }
        Ok(())
    }

    /// Release all tables, plans and pools. Later calls only log.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            warn!("Schema manager already closed");
            return;
        }

        self.tables.write().clear();
        self.overrides.write().clear();
        self.clear_plans();
        self.cache_pool.close();
        self.conn_pool.close();
        info!("Schema manager closed");
    }

    /// Run a raw statement against the backing store
    pub fn exec(&self, sql: &str) -> Result<Vec<Vec<Value>>> {
        self.ensure_open()?;
        let mut conn = self.conn_pool.get_conn()?;
        conn.execute(sql)
    }

    /// (Re)load one table from the backing store.
    ///
    /// A table missing from the store is logged and left unregistered.
    /// Replacing an existing entry, or any override-driven change to other
    /// entries, clears the whole plan cache.
    pub fn load_or_refresh_table(&self, name: &str) -> Result<()> {
        self.ensure_open()?;

        let info = {
            let mut conn = self.conn_pool.get_conn()?;
            let sql = format!("{} and table_name = '{}'", BASE_SHOW_TABLES, escape_string(name));
            let rows = conn.execute(&sql)?;

            let Some(row) = rows.first() else {
                warn!("Table {} not exist", name);
                return Ok(());
            };
            if row.len() < 4 {
                return Err(TabletError::MetadataError(format!(
                    "Unexpected table row for {}: {} columns",
                    name,
                    row.len()
                )));
            }

            let table_type = row[1].as_text().unwrap_or_default();
            let create_time = row[2].as_i64().unwrap_or(0);
            let comment = row[3].as_text().unwrap_or_default();

            match TableInfo::load(
                conn.as_mut(),
                name,
                &table_type,
                create_time,
                &comment,
                self.cache_pool.clone(),
            ) {
                Ok(info) => info,
                Err(e) => {
                    // Concurrent DDL can drop the table between the two queries
                    error!("Failed to load table {}: {}", name, e);
                    return Ok(());
                }
            }
        };

        self.register(info);
        Ok(())
    }

    fn register(&self, info: TableInfo) {
        let name = info.name().to_string();
        let mut tables = self.tables.write();

        let replaced = tables.insert(name.clone(), Arc::new(info)).is_some();
        if replaced {
            info!("Updating table {}", name);
        }

        let overridden = apply_overrides(&mut tables, &self.overrides.read(), self.cache_pool.as_ref());
        if replaced || overridden {
            self.clear_plans();
        }

        if let Some(info) = tables.get(&name) {
            match &info.cache {
                Some(cache) if info.cache_type() != CacheType::None => {
                    info!("Initialized cached table: {}, prefix: {}", name, cache.prefix())
                }
                _ => info!("Initialized table: {}", name),
            }
        }
    }

    /// Drop a table from the registry and clear the plan cache
    pub fn forget_table(&self, name: &str) {
        self.tables.write().remove(name);
        self.clear_plans();
        info!("Table {} forgotten", name);
    }

    /// Sync the registry with the store: load new or recreated tables,
    /// forget dropped ones and re-apply overrides.
    pub fn reload(&self) -> Result<()> {
        self.ensure_open()?;

        let rows = {
            let mut conn = self.conn_pool.get_conn()?;
            conn.execute(BASE_SHOW_TABLES)?
        };
        if rows.len() > MAX_TABLE_COUNT {
            return Err(TabletError::NotSupported(format!(
                "Too many tables: {} (max {})",
                rows.len(),
                MAX_TABLE_COUNT
            )));
        }

        let reload_time = current_timestamp_s();
        let last_change = self.last_change.load(Ordering::SeqCst);

        let mut live = HashSet::with_capacity(rows.len());
        for row in &rows {
            let Some(name) = row.first().and_then(|v| v.as_text()) else {
                continue;
            };
            let create_time = row.get(2).and_then(|v| v.as_i64()).unwrap_or(0);
            let known = self.tables.read().contains_key(&name);
            if !known || create_time >= last_change {
                self.load_or_refresh_table(&name)?;
            }
            live.insert(name);
        }

        let gone: Vec<String> = self
            .tables
            .read()
            .keys()
            .filter(|name| !live.contains(*name))
            .cloned()
            .collect();
        for name in gone {
            self.forget_table(&name);
        }

        {
            let mut tables = self.tables.write();
            if apply_overrides(&mut tables, &self.overrides.read(), self.cache_pool.as_ref()) {
                self.clear_plans();
            }
        }
        self.last_change.store(reload_time, Ordering::SeqCst);
        Ok(())
    }

    /// Unix seconds of the last reload (or construction)
    pub fn last_change(&self) -> i64 {
        self.last_change.load(Ordering::SeqCst)
    }

    pub fn get_table(&self, name: &str) -> Option<Arc<TableInfo>> {
        self.tables.read().get(name).cloned()
    }

    /// Snapshot of all registered table schemas
    pub fn get_schema(&self) -> Vec<Table> {
        self.tables.read().values().map(|t| t.table.clone()).collect()
    }

    /// Cached plan for the exact SQL text; marks it recently used
    pub fn get_plan(&self, sql: &str) -> Option<Arc<ExecPlan>> {
        self.queries.lock().get(sql)
    }

    /// Cache a compiled plan under its SQL text, bound to its table entry
    pub fn put_plan(&self, sql: &str, plan: Plan) -> Result<Arc<ExecPlan>> {
        self.ensure_open()?;
        let generation = self.plan_generation.load(Ordering::SeqCst);
        Ok(self.cache_plan(sql, plan, generation))
    }

    /// Cached plan, compiling and caching it through `builder` on a miss.
    ///
    /// A plan whose compilation raced with a schema change is returned to
    /// the caller but not cached.
    pub fn get_or_build_plan(&self, sql: &str, builder: &dyn PlanBuilder) -> Result<Arc<ExecPlan>> {
        self.ensure_open()?;
        if let Some(plan) = self.get_plan(sql) {
            return Ok(plan);
        }

        let generation = self.plan_generation.load(Ordering::SeqCst);
        let lookup = |name: &str| self.get_table(name);
        let plan = builder.build(sql, &lookup)?;
        Ok(self.cache_plan(sql, plan, generation))
    }

    /// Bind `plan` to its table entry and cache it unless the plan cache was
    /// cleared since `generation` was read
    fn cache_plan(&self, sql: &str, plan: Plan, generation: u64) -> Arc<ExecPlan> {
        let table_info = if plan.table_name.is_empty() {
            None
        } else {
            self.get_table(&plan.table_name)
        };
        let exec_plan = Arc::new(ExecPlan::new(plan, table_info));

        let mut queries = self.queries.lock();
        if self.plan_generation.load(Ordering::SeqCst) == generation {
            queries.set(sql.to_string(), exec_plan.clone());
        } else {
            debug!("Schema changed while compiling {:?}, plan not cached", sql);
        }
        exec_plan
    }

    fn clear_plans(&self) {
        let mut queries = self.queries.lock();
        queries.clear();
        self.plan_generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Set the plan cache budget in bytes; must be positive
    pub fn set_query_cache_size(&self, size: i64) -> Result<()> {
        if size <= 0 {
            return Err(TabletError::InvalidArgument(format!(
                "cache size {} out of range",
                size
            )));
        }
        self.ensure_open()?;
        self.queries.lock().set_capacity(size as usize);
        info!("Query cache size set to {}", format_bytes(size as u64));
        Ok(())
    }

    pub fn query_cache_len(&self) -> usize {
        self.queries.lock().len()
    }

    pub fn query_cache_size(&self) -> usize {
        self.queries.lock().size()
    }

    pub fn query_cache_capacity(&self) -> usize {
        self.queries.lock().capacity()
    }

    pub fn query_cache_keys(&self) -> Vec<String> {
        self.queries.lock().keys()
    }

    /// Row cache counters per table (`<table>.Hits|Absent|Misses`), zero for uncached tables
    pub fn table_stats(&self) -> HashMap<String, i64> {
        let tables = self.tables.read();
        let mut stats = HashMap::with_capacity(tables.len() * 3);
        for (name, info) in tables.iter() {
            let s = info.stats();
            stats.insert(format!("{}.Hits", name), s.hits);
            stats.insert(format!("{}.Absent", name), s.absent);
            stats.insert(format!("{}.Misses", name), s.misses);
        }
        stats
    }

    pub fn table_invalidations(&self) -> HashMap<String, i64> {
        self.tables
            .read()
            .iter()
            .map(|(name, info)| (name.clone(), info.stats().invalidations))
            .collect()
    }

    pub fn query_counts(&self) -> HashMap<String, i64> {
        self.query_stats(|s| s.query_count)
    }

    /// Cumulative execution time in nanoseconds
    pub fn query_times(&self) -> HashMap<String, i64> {
        self.query_stats(|s| duration_nanos(s.time))
    }

    pub fn query_row_counts(&self) -> HashMap<String, i64> {
        self.query_stats(|s| s.row_count)
    }

    pub fn query_error_counts(&self) -> HashMap<String, i64> {
        self.query_stats(|s| s.error_count)
    }

    /// Sum one stat per `<table>.<PLAN_TYPE>` over the cached plans.
    ///
    /// Plans evicted after the key snapshot are skipped.
    fn query_stats(&self, f: impl Fn(&PlanStats) -> i64) -> HashMap<String, i64> {
        let mut stats = HashMap::new();
        for plan in self.snapshot_plans().into_iter().map(|(_, p)| p) {
            let table = if plan.table_name().is_empty() {
                JOIN_TABLE_NAME
            } else {
                plan.table_name()
            };
            *stats.entry(format!("{}.{}", table, plan.plan_type())).or_insert(0) += f(&plan.stats());
        }
        stats
    }

    /// One row per cached plan
    pub fn query_stats_list(&self) -> Vec<PerQueryStats> {
        self.snapshot_plans()
            .into_iter()
            .map(|(query, plan)| {
                let s = plan.stats();
                PerQueryStats {
                    query,
                    table: plan.table_name().to_string(),
                    plan: plan.plan_type(),
                    query_count: s.query_count,
                    time: duration_nanos(s.time),
                    row_count: s.row_count,
                    error_count: s.error_count,
                }
            })
            .collect()
    }

    fn snapshot_plans(&self) -> Vec<(String, Arc<ExecPlan>)> {
        let keys = self.queries.lock().keys();
        keys.into_iter()
            .filter_map(|key| {
                let plan = self.queries.lock().peek(&key)?;
                Some((key, plan))
            })
            .collect()
    }
}

fn duration_nanos(d: std::time::Duration) -> i64 {
    i64::try_from(d.as_nanos()).unwrap_or(i64::MAX)
}
