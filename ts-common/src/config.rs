// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Configuration management for the tablet server query core

use crate::constants::*;
use crate::error::TabletError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing MySQL host
    pub db_host: String,

    /// Backing MySQL port
    pub db_port: u16,

    pub db_user: String,

    pub db_password: String,

    /// Database whose tables are served
    pub db_name: String,

    /// Idle connections kept by the metadata pool
    pub max_idle_conns: usize,

    /// Plan cache budget (bytes)
    pub query_cache_size: usize,

    /// Row cache settings
    pub row_cache: RowCacheConfig,

    /// Operator-declared per-table overrides
    pub schema_overrides: Vec<SchemaOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_host: "127.0.0.1".to_string(),
            db_port: DEFAULT_DB_PORT,
            db_user: "root".to_string(),
            db_password: String::new(),
            db_name: "test".to_string(),
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            query_cache_size: DEFAULT_QUERY_CACHE_SIZE,
            row_cache: RowCacheConfig::default(),
            schema_overrides: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| TabletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.db_port == 0 {
            return Err(TabletError::InvalidArgument(
                "db_port cannot be 0".to_string(),
            ));
        }
        if self.db_name.is_empty() {
            return Err(TabletError::InvalidArgument(
                "db_name cannot be empty".to_string(),
            ));
        }
        if self.query_cache_size == 0 {
            return Err(TabletError::InvalidArgument(
                "query_cache_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Connection URL for the backing store
    pub fn db_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
        )
    }
}

/// Row cache (memcache-style) process settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowCacheConfig {
    /// Cache server binary; the row cache is disabled when empty
    pub binary: String,

    /// Memory in MB
    pub memory: usize,

    pub socket: String,

    pub tcp_port: u16,

    pub connections: usize,

    pub threads: usize,

    pub lock_paged: bool,
}

impl RowCacheConfig {
    pub fn is_enabled(&self) -> bool {
        !self.binary.is_empty()
    }

    /// Command line for launching the cache server
    pub fn command_line(&self) -> Vec<String> {
        if !self.is_enabled() {
            return Vec::new();
        }
        let mut cmd = vec![self.binary.clone()];
        if self.memory > 0 {
            cmd.push("-m".to_string());
            cmd.push(self.memory.to_string());
        }
        if !self.socket.is_empty() {
            cmd.push("-s".to_string());
            cmd.push(self.socket.clone());
        }
        if self.tcp_port > 0 {
            cmd.push("-p".to_string());
            cmd.push(self.tcp_port.to_string());
        }
        if self.connections > 0 {
            cmd.push("-c".to_string());
            cmd.push(self.connections.to_string());
        }
        if self.threads > 0 {
            cmd.push("-t".to_string());
            cmd.push(self.threads.to_string());
        }
        if self.lock_paged {
            cmd.push("-k".to_string());
        }
        cmd
    }
}

/// Cache descriptor of an override rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideCacheDesc {
    /// "RW", "W", anything else is ignored
    #[serde(rename = "type")]
    pub cache_type: String,

    #[serde(default)]
    pub prefix: String,

    /// Aliasing target for "W"
    #[serde(default)]
    pub table: String,
}

/// Operator-declared per-table customization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaOverride {
    pub name: String,

    #[serde(default)]
    pub pk_columns: Option<Vec<String>>,

    #[serde(default)]
    pub cache: Option<OverrideCacheDesc>,
}

impl SchemaOverride {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pk_columns: None,
            cache: None,
        }
    }

    pub fn with_pk(mut self, columns: &[&str]) -> Self {
        self.pk_columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_cache(mut self, cache_type: &str, prefix: &str, table: &str) -> Self {
        self.cache = Some(OverrideCacheDesc {
            cache_type: cache_type.to_string(),
            prefix: prefix.to_string(),
            table: table.to_string(),
        });
        self
    }
}
