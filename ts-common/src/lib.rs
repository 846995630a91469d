// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Common utilities and foundational types for the tablet server query core
//!
//! This module provides:
//! - Error types and result handling
//! - Configuration management
//! - Cell values and column metadata shared by the schema and protocol crates
//! - Utility functions
//! - Constants

pub mod error;
pub mod config;
pub mod types;
pub mod utils;
pub mod constants;

pub use error::{TabletError, Result};
pub use config::{Config, RowCacheConfig, SchemaOverride, OverrideCacheDesc};
pub use types::{CacheType, TableColumn, Value, ValueCategory};
