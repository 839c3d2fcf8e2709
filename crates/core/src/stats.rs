// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock-free run statistics.

use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Default)]
struct OpCounters {
    total: AtomicU64,
    success: AtomicU64,
    error: AtomicU64,
}

/// Per-operation counters plus run-wide retry and parse-failure tallies.
///
/// Shared by reference (`Arc<Stats>`) between the pool and the reporter.
#[derive(Debug)]
pub struct Stats {
    ops: [OpCounters; Operation::ALL.len()],
    retries: AtomicU64,
    parse_failures: AtomicU64,
    started: Instant,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Self {
            ops: Default::default(),
            retries: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// A job of this operation started its first attempt.
    pub fn record_start(&self, op: Operation) {
        self.ops[op.index()].total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, op: Operation) {
        self.ops[op.index()].success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, op: Operation) {
        self.ops[op.index()].error.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let operations = Operation::ALL
            .iter()
            .map(|op| {
                let c = &self.ops[op.index()];
                OpStats {
                    operation: *op,
                    total: c.total.load(Ordering::Relaxed),
                    success: c.success.load(Ordering::Relaxed),
                    error: c.error.load(Ordering::Relaxed),
                }
            })
            .collect();

        StatsSnapshot {
            operations,
            retries: self.retries.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

/// Counters for one operation at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpStats {
    pub operation: Operation,
    pub total: u64,
    pub success: u64,
    pub error: u64,
}

impl OpStats {
    /// Completed jobs per second over `elapsed_ms`.
    pub fn ops_per_sec(&self, elapsed_ms: u64) -> f64 {
        if elapsed_ms == 0 {
            return 0.0;
        }
        (self.success + self.error) as f64 * 1000.0 / elapsed_ms as f64
    }
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub operations: Vec<OpStats>,
    pub retries: u64,
    pub parse_failures: u64,
    pub elapsed_ms: u64,
}

impl StatsSnapshot {
    pub fn get(&self, op: Operation) -> Option<&OpStats> {
        self.operations.iter().find(|s| s.operation == op)
    }

    /// Operations that ran at least once.
    pub fn active(&self) -> impl Iterator<Item = &OpStats> {
        self.operations.iter().filter(|s| s.total > 0)
    }

    pub fn total_success(&self) -> u64 {
        self.operations.iter().map(|s| s.success).sum()
    }

    /// Execution failures plus parse failures.
    pub fn total_failures(&self) -> u64 {
        self.operations.iter().map(|s| s.error).sum::<u64>() + self.parse_failures
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
