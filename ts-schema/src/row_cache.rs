// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Row cache collaborators
//!
//! The cache server itself is external. This module tracks the pool's
//! open/closed lifecycle and per-table cache handles with their accounting.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use ts_common::constants::DEFAULT_CACHE_POOL_TIMEOUT_MS;
use ts_common::RowCacheConfig;

/// Lifecycle of the shared row cache pool
pub trait CachePool: Send + Sync {
    fn open(&self);
    fn close(&self);
    fn is_closed(&self) -> bool;
    /// Pool name (the served database)
    fn name(&self) -> &str;
}

/// Pool backed by a configured cache server
pub struct RowCachePool {
    name: String,
    config: RowCacheConfig,
    capacity: usize,
    idle_timeout: Duration,
    closed: AtomicBool,
}

impl RowCachePool {
    pub fn new(name: impl Into<String>, config: RowCacheConfig) -> Self {
        let capacity = if config.connections > 0 { config.connections } else { 1 };
        Self {
            name: name.into(),
            config,
            capacity,
            idle_timeout: Duration::from_millis(DEFAULT_CACHE_POOL_TIMEOUT_MS),
            closed: AtomicBool::new(true),
        }
    }
}

impl CachePool for RowCachePool {
    fn open(&self) {
        if !self.config.is_enabled() {
            info!("Row cache not enabled for {}", self.name);
            return;
        }
        if !self.closed.swap(false, Ordering::SeqCst) {
            warn!("Row cache pool {} already open", self.name);
            return;
        }
        info!(
            "Opened row cache pool {}: {} ({} connections, idle timeout {:?})",
            self.name,
            self.config.command_line().join(" "),
            self.capacity,
            self.idle_timeout
        );
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Closed row cache pool {}", self.name);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Snapshot of a row cache's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: i64,
    pub absent: i64,
    pub misses: i64,
    pub invalidations: i64,
}

/// Per-table row cache handle
pub struct RowCache {
    prefix: String,
    table_name: String,
    pool: Arc<dyn CachePool>,
    hits: AtomicI64,
    absent: AtomicI64,
    misses: AtomicI64,
    invalidations: AtomicI64,
}

impl RowCache {
    /// Keys are `prefix` + encoded primary key; an empty prefix falls back to `<table>.`
    pub fn new(table_name: &str, prefix: &str, pool: Arc<dyn CachePool>) -> Self {
        let prefix = if prefix.is_empty() {
            format!("{}.", table_name)
        } else {
            prefix.to_string()
        };
        Self {
            prefix,
            table_name: table_name.to_string(),
            pool,
            hits: AtomicI64::new(0),
            absent: AtomicI64::new(0),
            misses: AtomicI64::new(0),
            invalidations: AtomicI64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Table the cache was created for
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn pool(&self) -> &Arc<dyn CachePool> {
        &self.pool
    }

    pub fn record_hits(&self, n: i64) {
        self.hits.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_absent(&self, n: i64) {
        self.absent.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_misses(&self, n: i64) {
        self.misses.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_invalidations(&self, n: i64) {
        self.invalidations.fetch_add(n, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for RowCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowCache")
            .field("prefix", &self.prefix)
            .field("table_name", &self.table_name)
            .field("pool", &self.pool.name())
            .field("stats", &self.stats())
            .finish()
    }
}
