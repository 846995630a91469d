// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Metadata connection pool
//!
//! Connections to the backing store are checked out for one statement and
//! returned to their pool when the handle is dropped.

use ts_common::{Result, Value};

/// A connection able to run one raw statement against the backing store
pub trait MetadataConn: Send {
    /// Execute `sql` and return all result rows (empty for statements without rows)
    fn execute(&mut self, sql: &str) -> Result<Vec<Vec<Value>>>;
}

/// Checked-out connection; dropping it releases the connection
pub type PooledConn = Box<dyn MetadataConn>;

pub trait ConnectionPool: Send + Sync {
    fn get_conn(&self) -> Result<PooledConn>;

    fn close(&self);
}

#[cfg(feature = "mysql-integration")]
pub use self::mysql_pool::MysqlConnPool;

#[cfg(feature = "mysql-integration")]
mod mysql_pool {
    use super::{ConnectionPool, MetadataConn, PooledConn};
    use mysql::prelude::Queryable;
    use parking_lot::RwLock;
    use tracing::info;
    use ts_common::{Config, Result, TabletError, Value};

    /// Pool of connections to the backing MySQL instance
    pub struct MysqlConnPool {
        pool: RwLock<Option<mysql::Pool>>,
    }

    impl MysqlConnPool {
        /// Connect using the store settings in `config`
        pub fn connect(config: &Config) -> Result<Self> {
            let opts = mysql::Opts::from_url(&config.db_url())
                .map_err(|e| TabletError::Config(format!("Invalid database url: {}", e)))?;

            let constraints = mysql::PoolConstraints::new(0, config.max_idle_conns.max(1))
                .ok_or_else(|| TabletError::Config("Invalid pool constraints".to_string()))?;
            let opts = mysql::OptsBuilder::from_opts(opts)
                .pool_opts(mysql::PoolOpts::default().with_constraints(constraints));

            let pool = mysql::Pool::new(opts).map_err(|e| {
                TabletError::NetworkError(format!(
                    "Failed to connect to {}:{}: {}",
                    config.db_host, config.db_port, e
                ))
            })?;

            info!("Connected to backing store {}:{}/{}", config.db_host, config.db_port, config.db_name);
            Ok(Self { pool: RwLock::new(Some(pool)) })
        }
    }

    impl ConnectionPool for MysqlConnPool {
        fn get_conn(&self) -> Result<PooledConn> {
            let guard = self.pool.read();
            let pool = guard.as_ref().ok_or(TabletError::ConnectionClosed)?;
            let conn = pool
                .get_conn()
                .map_err(|e| TabletError::NetworkError(format!("Failed to get connection: {}", e)))?;
            Ok(Box::new(MysqlConn(conn)))
        }

        fn close(&self) {
            // Idle connections are disconnected once the last pool handle drops
            self.pool.write().take();
        }
    }

    struct MysqlConn(mysql::PooledConn);

    impl MetadataConn for MysqlConn {
        fn execute(&mut self, sql: &str) -> Result<Vec<Vec<Value>>> {
            let rows: Vec<mysql::Row> = self
                .0
                .query(sql)
                .map_err(|e| TabletError::MetadataError(format!("Query failed: {}", e)))?;

            Ok(rows
                .into_iter()
                .map(|row| {
                    (0..row.len())
                        .map(|i| row.as_ref(i).map(convert_value).unwrap_or(Value::Null))
                        .collect()
                })
                .collect())
        }
    }

    fn convert_value(value: &mysql::Value) -> Value {
        match value {
            mysql::Value::NULL => Value::Null,
            mysql::Value::Bytes(b) => Value::Bytes(b.clone()),
            mysql::Value::Int(v) => Value::Int64(*v),
            mysql::Value::UInt(v) => Value::UInt64(*v),
            mysql::Value::Float(v) => Value::Float32(*v),
            mysql::Value::Double(v) => Value::Float64(*v),
            other => Value::String(other.as_sql(true).trim_matches('\'').to_string()),
        }
    }
}
