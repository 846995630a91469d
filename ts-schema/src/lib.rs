// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Schema and plan cache management for the tablet server
//!
//! This module handles:
//! - Table schemas mirrored from the backing MySQL store
//! - Schema override rules (primary keys, row cache policy and aliasing)
//! - The LRU cache of compiled plans and their execution statistics
//! - Row cache and metadata connection pool collaborators

pub mod table;
pub mod table_info;
pub mod row_cache;
pub mod conn_pool;
pub mod plan_cache;
pub mod exec_plan;
pub mod schema_override;
pub mod schema_info;
pub mod mock;

pub use table::Table;
pub use table_info::TableInfo;
pub use row_cache::{CachePool, CacheStats, RowCache, RowCachePool};
pub use conn_pool::{ConnectionPool, MetadataConn, PooledConn};
#[cfg(feature = "mysql-integration")]
pub use conn_pool::MysqlConnPool;
pub use plan_cache::{CacheValue, PlanCache};
pub use exec_plan::{ExecPlan, PerQueryStats, Plan, PlanBuilder, PlanStats, PlanType};
pub use schema_override::apply_overrides;
pub use schema_info::{SchemaInfo, BASE_SHOW_TABLES};
