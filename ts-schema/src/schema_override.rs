// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Override resolution
//!
//! Applies operator-declared primary keys and row cache policy to registry
//! entries. Every problem is logged and the rule skipped; resolution never
//! fails and can be re-run after any table (re)load.

use crate::row_cache::CachePool;
use crate::table_info::TableInfo;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use ts_common::{CacheType, OverrideCacheDesc, SchemaOverride};

/// Cache descriptor type owning a read-write cache
pub const CACHE_RW: &str = "RW";
/// Cache descriptor type aliasing another table's cache
pub const CACHE_W: &str = "W";

/// Apply `overrides` in order against `tables`.
///
/// Entries are replaced copy-on-write. Returns true if any entry was
/// replaced; plans bound to the previous entries are then stale.
pub fn apply_overrides(
    tables: &mut HashMap<String, Arc<TableInfo>>,
    overrides: &[SchemaOverride],
    cache_pool: &dyn CachePool,
) -> bool {
    let mut any_changed = false;
    for rule in overrides {
        let Some(current) = tables.get(&rule.name) else {
            warn!("Table not found for override: {:?}", rule);
            continue;
        };

        let mut updated = (**current).clone();
        let mut changed = false;

        if let Some(pk) = &rule.pk_columns {
            if let Err(e) = updated.set_pk(pk) {
                error!("Invalid pk override for {}: {}", rule.name, e);
                continue;
            }
            if updated.table.pk_columns != current.table.pk_columns {
                info!("SetPK table {}, pk {:?}", rule.name, pk);
                changed = true;
            }
        }

        match &rule.cache {
            Some(desc) if !cache_pool.is_closed() => {
                changed |= resolve_cache(&mut updated, desc, tables);
            }
            _ => debug!("No row cache for override {:?}", rule),
        }

        if changed {
            tables.insert(rule.name.clone(), Arc::new(updated));
            any_changed = true;
        }
    }
    any_changed
}

/// Returns true if the entry's cache assignment changed
fn resolve_cache(
    info: &mut TableInfo,
    desc: &OverrideCacheDesc,
    tables: &HashMap<String, Arc<TableInfo>>,
) -> bool {
    match desc.cache_type.as_str() {
        CACHE_RW => {
            if info.cache_type() == CacheType::ReadWrite && info.cache.is_some() {
                return false;
            }
            info.enable_row_cache(&desc.prefix);
            info!("Enabled row cache for {}", info.name());
            true
        }
        CACHE_W => {
            if desc.table.is_empty() {
                warn!("Incomplete cache override for {}: {:?}", info.name(), desc);
                return false;
            }
            let Some(target) = tables.get(&desc.table) else {
                warn!("Cache alias target {} not found for {}", desc.table, info.name());
                return false;
            };
            let Some(cache) = target.cache.clone() else {
                warn!("Cache alias target {} has no cache, {} stays uncached", desc.table, info.name());
                return false;
            };
            if info.cache_type() == CacheType::WriteOnly
                && info.cache.as_ref().map_or(false, |c| Arc::ptr_eq(c, &cache))
            {
                return false;
            }
            info!("Table {} shares row cache of {}", info.name(), desc.table);
            info.alias_row_cache(cache);
            true
        }
        other => {
            warn!("Ignoring cache override type {:?} for {}", other, info.name());
            false
        }
    }
}
