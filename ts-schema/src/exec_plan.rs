// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Compiled plans and their execution statistics

use crate::plan_cache::CacheValue;
use crate::table_info::TableInfo;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use ts_common::Result;

/// Kind of compiled plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    PassSelect,
    PassDml,
    PkEqual,
    PkIn,
    SelectSubquery,
    DmlPk,
    DmlSubquery,
    InsertPk,
    InsertSubquery,
    Set,
    Ddl,
    SelectStream,
    Other,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::PassSelect => "PASS_SELECT",
            PlanType::PassDml => "PASS_DML",
            PlanType::PkEqual => "PK_EQUAL",
            PlanType::PkIn => "PK_IN",
            PlanType::SelectSubquery => "SELECT_SUBQUERY",
            PlanType::DmlPk => "DML_PK",
            PlanType::DmlSubquery => "DML_SUBQUERY",
            PlanType::InsertPk => "INSERT_PK",
            PlanType::InsertSubquery => "INSERT_SUBQUERY",
            PlanType::Set => "SET",
            PlanType::Ddl => "DDL",
            PlanType::SelectStream => "SELECT_STREAM",
            PlanType::Other => "OTHER",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plan as produced by the plan compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_type: PlanType,
    /// Target table, empty for joins and multi-table statements
    pub table_name: String,
    pub full_query: String,
    /// Selected columns, when the compiler resolved them
    pub columns: Vec<String>,
}

impl Plan {
    pub fn new(plan_type: PlanType, table_name: impl Into<String>, full_query: impl Into<String>) -> Self {
        Self {
            plan_type,
            table_name: table_name.into(),
            full_query: full_query.into(),
            columns: Vec::new(),
        }
    }
}

/// SQL plan compiler
pub trait PlanBuilder {
    /// Compile `sql`, resolving table names through `lookup`
    fn build(&self, sql: &str, lookup: &dyn Fn(&str) -> Option<Arc<TableInfo>>) -> Result<Plan>;
}

/// Accumulated execution statistics of one plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub query_count: i64,
    pub time: Duration,
    pub row_count: i64,
    pub error_count: i64,
}

/// Cached plan bound to its table and stats
pub struct ExecPlan {
    pub plan: Plan,
    pub table_info: Option<Arc<TableInfo>>,
    stats: Mutex<PlanStats>,
}

impl ExecPlan {
    pub fn new(plan: Plan, table_info: Option<Arc<TableInfo>>) -> Self {
        Self {
            plan,
            table_info,
            stats: Mutex::new(PlanStats::default()),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.plan.table_name
    }

    pub fn plan_type(&self) -> PlanType {
        self.plan.plan_type
    }

    pub fn add_stats(&self, query_count: i64, duration: Duration, row_count: i64, error_count: i64) {
        let mut stats = self.stats.lock();
        stats.query_count += query_count;
        stats.time += duration;
        stats.row_count += row_count;
        stats.error_count += error_count;
    }

    pub fn stats(&self) -> PlanStats {
        *self.stats.lock()
    }
}

impl CacheValue for ExecPlan {
    fn size(&self) -> usize {
        1
    }
}

impl fmt::Debug for ExecPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecPlan")
            .field("plan", &self.plan)
            .field("table", &self.table_info.as_ref().map(|t| t.name().to_string()))
            .field("stats", &self.stats())
            .finish()
    }
}

/// Per-query row of the statistics export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerQueryStats {
    pub query: String,
    pub table: String,
    pub plan: PlanType,
    pub query_count: i64,
    /// Nanoseconds
    pub time: i64,
    pub row_count: i64,
    pub error_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_plan_type_names() {
        assert_eq!(PlanType::PassSelect.to_string(), "PASS_SELECT");
        assert_eq!(PlanType::InsertSubquery.to_string(), "INSERT_SUBQUERY");
    }

    #[test]
    fn test_add_stats_accumulates() {
        let plan = ExecPlan::new(Plan::new(PlanType::PkEqual, "users", "select 1"), None);
        plan.add_stats(1, Duration::from_millis(5), 10, 0);
        plan.add_stats(2, Duration::from_millis(7), 0, 1);

        let stats = plan.stats();
        assert_eq!(stats.query_count, 3);
        assert_eq!(stats.time, Duration::from_millis(12));
        assert_eq!(stats.row_count, 10);
        assert_eq!(stats.error_count, 1);
        assert_eq!(plan.size(), 1);
    }

    #[test]
    fn test_concurrent_add_stats() {
        let plan = Arc::new(ExecPlan::new(Plan::new(PlanType::PassSelect, "", "select 1"), None));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let plan = plan.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        plan.add_stats(1, Duration::from_nanos(i + 1), 2, i as i64 % 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = plan.stats();
        assert_eq!(stats.query_count, 8000);
        assert_eq!(stats.time, Duration::from_nanos((1..=8).sum::<u64>() * 1000));
        assert_eq!(stats.row_count, 16000);
        assert_eq!(stats.error_count, 4000);
    }
}
