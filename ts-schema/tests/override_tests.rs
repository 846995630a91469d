// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Override resolution through the schema manager

use std::sync::Arc;
use ts_common::{CacheType, Config, RowCacheConfig, SchemaOverride};
use ts_schema::mock::{MockMetadataStore, MockTable};
use ts_schema::{Plan, PlanType, RowCachePool, SchemaInfo};

fn store() -> MockMetadataStore {
    let store = MockMetadataStore::new();
    store.create_table(
        MockTable::new("items", 100)
            .column("id", "bigint(20)")
            .column("sku", "varchar(32)")
            .primary_key(&["id"]),
    );
    store.create_table(
        MockTable::new("items_view", 100)
            .column("id", "bigint(20)")
            .column("sku", "varchar(32)")
            .view(),
    );
    store
}

fn row_cache_config(enabled: bool) -> RowCacheConfig {
    RowCacheConfig {
        binary: if enabled { "memcached".to_string() } else { String::new() },
        memory: 128,
        ..Default::default()
    }
}

fn manager(store: &MockMetadataStore, overrides: Vec<SchemaOverride>, cache: bool) -> SchemaInfo {
    let config = Config {
        schema_overrides: overrides,
        row_cache: row_cache_config(cache),
        ..Default::default()
    };
    let pool = Arc::new(RowCachePool::new("test", config.row_cache.clone()));
    SchemaInfo::new(&config, Arc::new(store.clone()), pool).unwrap()
}

#[test]
fn test_override_for_missing_table_is_noop() {
    let store = store();
    let si = manager(&store, vec![SchemaOverride::new("ghost").with_cache("RW", "", "")], true);

    assert!(si.get_table("ghost").is_none());
    assert!(si.get_schema().is_empty());
    assert!(si.table_stats().is_empty());
}

#[test]
fn test_read_write_cache() {
    let store = store();
    let si = manager(&store, vec![SchemaOverride::new("items").with_cache("RW", "it.", "")], true);

    let items = si.get_table("items").unwrap();
    assert_eq!(items.cache_type(), CacheType::ReadWrite);
    assert_eq!(items.cache.as_ref().unwrap().prefix(), "it.");
}

#[test]
fn test_write_only_aliases_target_cache() {
    let store = store();
    let si = manager(
        &store,
        vec![
            SchemaOverride::new("items").with_cache("RW", "", ""),
            SchemaOverride::new("items_view").with_cache("W", "", "items"),
        ],
        true,
    );

    let items = si.get_table("items").unwrap();
    let view = si.get_table("items_view").unwrap();
    assert_eq!(view.cache_type(), CacheType::WriteOnly);
    let cache = items.cache.clone().unwrap();
    assert!(Arc::ptr_eq(&cache, view.cache.as_ref().unwrap()));

    // One invalidation stream for both tables
    cache.record_invalidations(2);
    let invalidations = si.table_invalidations();
    assert_eq!(invalidations["items"], 2);
    assert_eq!(invalidations["items_view"], 2);
}

#[test]
fn test_write_only_on_uncached_target_stays_none() {
    let store = store();
    let si = manager(
        &store,
        vec![
            SchemaOverride::new("items"),
            SchemaOverride::new("items_view").with_cache("W", "", "items"),
        ],
        true,
    );

    let view = si.get_table("items_view").unwrap();
    assert_eq!(view.cache_type(), CacheType::None);
    assert!(view.cache.is_none());
}

#[test]
fn test_closed_cache_pool_degrades_to_uncached() {
    let store = store();
    let si = manager(&store, vec![SchemaOverride::new("items").with_cache("RW", "", "")], false);

    let items = si.get_table("items").unwrap();
    assert_eq!(items.cache_type(), CacheType::None);
    assert_eq!(si.table_stats()["items.Hits"], 0);
}

#[test]
fn test_pk_override_applied_and_bad_pk_skipped() {
    let store = store();
    let si = manager(
        &store,
        vec![
            SchemaOverride::new("items_view").with_pk(&["sku"]),
            SchemaOverride::new("items").with_pk(&["missing"]).with_cache("RW", "", ""),
        ],
        true,
    );

    assert_eq!(si.get_table("items_view").unwrap().table.pk_column_names(), vec!["sku"]);

    let items = si.get_table("items").unwrap();
    assert_eq!(items.table.pk_column_names(), vec!["id"]);
    assert_eq!(items.cache_type(), CacheType::None);
}

#[test]
fn test_overrides_reapplied_after_refresh() {
    let store = store();
    let si = manager(
        &store,
        vec![
            SchemaOverride::new("items").with_cache("RW", "", ""),
            SchemaOverride::new("items_view").with_cache("W", "", "items"),
        ],
        true,
    );

    si.load_or_refresh_table("items").unwrap();
    let items = si.get_table("items").unwrap();
    let view = si.get_table("items_view").unwrap();
    assert_eq!(items.cache_type(), CacheType::ReadWrite);

    // The alias follows the refreshed target's new cache
    assert!(Arc::ptr_eq(items.cache.as_ref().unwrap(), view.cache.as_ref().unwrap()));
}

#[test]
fn test_alias_survives_target_removal() {
    let store = store();
    let si = manager(
        &store,
        vec![
            SchemaOverride::new("items").with_cache("RW", "", ""),
            SchemaOverride::new("items_view").with_cache("W", "", "items"),
        ],
        true,
    );

    si.forget_table("items");
    let view = si.get_table("items_view").unwrap();
    assert_eq!(view.cache_type(), CacheType::WriteOnly);
    let cache = view.cache.as_ref().unwrap();
    assert_eq!(cache.table_name(), "items");
    assert!(!cache.pool().is_closed());
}

#[test]
fn test_alias_gaining_cache_clears_plans() {
    let store = MockMetadataStore::new();
    store.create_table(
        MockTable::new("items_view", 100)
            .column("id", "bigint(20)")
            .view(),
    );
    let si = manager(
        &store,
        vec![
            SchemaOverride::new("items").with_cache("RW", "", ""),
            SchemaOverride::new("items_view").with_cache("W", "", "items"),
        ],
        true,
    );
    assert_eq!(si.get_table("items_view").unwrap().cache_type(), CacheType::None);

    let sql = "update items_view set id = 2 where id = 1";
    let stale = si.put_plan(sql, Plan::new(PlanType::DmlPk, "items_view", sql)).unwrap();
    assert_eq!(stale.table_info.as_ref().unwrap().cache_type(), CacheType::None);

    store.create_table(MockTable::new("items", 100).column("id", "bigint(20)").primary_key(&["id"]));
    si.load_or_refresh_table("items").unwrap();

    assert_eq!(si.get_table("items_view").unwrap().cache_type(), CacheType::WriteOnly);
    assert_eq!(si.query_cache_len(), 0);
    assert!(si.get_plan(sql).is_none());

    let fresh = si.put_plan(sql, Plan::new(PlanType::DmlPk, "items_view", sql)).unwrap();
    let view = fresh.table_info.as_ref().unwrap();
    assert_eq!(view.cache_type(), CacheType::WriteOnly);
    assert!(view.cache.is_some());
}

#[test]
fn test_unchanged_pk_override_keeps_plans() {
    let store = store();
    let si = manager(&store, vec![SchemaOverride::new("items_view").with_pk(&["sku"])], true);
    let before = si.get_table("items_view").unwrap();
    si.put_plan("select 1", Plan::new(PlanType::PassSelect, "", "select 1")).unwrap();

    // Loading another table re-runs the rule without touching the entry
    si.load_or_refresh_table("items").unwrap();
    assert!(Arc::ptr_eq(&before, &si.get_table("items_view").unwrap()));
    assert_eq!(si.query_cache_len(), 1);
}
