// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker pool configuration

use crate::error::EngineError;
use std::time::Duration;

pub const DEFAULT_WORKERS: i64 = 256;
pub const DEFAULT_RETRIES: i64 = 10;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(100);
pub const DEFAULT_RETRY_MAX: Duration = Duration::from_secs(10);

/// Fewest workers a CPU-relative worker count resolves to.
const MIN_CPU_WORKERS: usize = 2;

/// Validated pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub workers: usize,
    /// Additional attempts after a retryable failure
    pub retries: u32,
    pub queue_capacity: usize,
    pub retry_base: Duration,
    pub retry_max: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS as usize,
            retries: DEFAULT_RETRIES as u32,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            retry_base: DEFAULT_RETRY_BASE,
            retry_max: DEFAULT_RETRY_MAX,
        }
    }
}

impl PoolConfig {
    /// Build from user-facing values.
    ///
    /// A negative `workers` means that many workers per CPU (at least two in
    /// total); a negative `retries` is rejected.
    pub fn new(workers: i64, retries: i64) -> Result<Self, EngineError> {
        let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());
        Ok(Self {
            workers: resolve_workers(workers, cpus)?,
            retries: resolve_retries(retries)?,
            retry_base: crate::env::retry_base(),
            retry_max: crate::env::retry_max(),
            ..Self::default()
        })
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.retry_base = base;
        self.retry_max = max;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.workers == 0 {
            return Err(EngineError::InvalidConfig("worker count must be positive".into()));
        }
        if self.queue_capacity == 0 {
            return Err(EngineError::InvalidConfig("queue capacity must be positive".into()));
        }
        if self.retry_base > self.retry_max {
            return Err(EngineError::InvalidConfig(format!(
                "retry base {}ms exceeds retry cap {}ms",
                self.retry_base.as_millis(),
                self.retry_max.as_millis()
            )));
        }
        Ok(())
    }

    /// Delay before retry number `attempt` (1-based): base × 2^(attempt-1),
    /// capped at `retry_max`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.retry_base
            .checked_mul(factor)
            .map_or(self.retry_max, |d| d.min(self.retry_max))
    }
}

pub fn resolve_workers(requested: i64, cpus: usize) -> Result<usize, EngineError> {
    match requested {
        0 => Err(EngineError::InvalidConfig("numworkers cannot be zero".into())),
        n if n > 0 => Ok(n as usize),
        n => {
            let per_cpu = n.unsigned_abs() as usize;
            Ok(cpus.saturating_mul(per_cpu).max(MIN_CPU_WORKERS))
        }
    }
}

pub fn resolve_retries(requested: i64) -> Result<u32, EngineError> {
    if requested < 0 {
        return Err(EngineError::InvalidConfig(format!(
            "retry count cannot be negative: {requested}"
        )));
    }
    u32::try_from(requested)
        .map_err(|_| EngineError::InvalidConfig(format!("retry count too large: {requested}")))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
