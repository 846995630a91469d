// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Constants used throughout the tablet server query core

/// Default plan cache budget (bytes). Each plan weighs one unit.
pub const DEFAULT_QUERY_CACHE_SIZE: usize = 128 * 1024 * 1024;

/// Default number of idle metadata connections kept by the pool
pub const DEFAULT_MAX_IDLE_CONNS: usize = 100;

/// Default backing store port
pub const DEFAULT_DB_PORT: u16 = 3306;

/// Upper bound on tables fetched by a full schema reload
pub const MAX_TABLE_COUNT: usize = 10000;

/// Row cache pool capacity/idle timeouts (milliseconds)
pub const DEFAULT_CACHE_POOL_TIMEOUT_MS: u64 = 3000;

/// Stats key used for plans that do not target a single table
pub const JOIN_TABLE_NAME: &str = "Join";

