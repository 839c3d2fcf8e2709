// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake executor for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ExecOutcome, JobExecutor};
use crate::error::ExecError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use xf_core::{Job, Operation};

/// Recorded executor call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    /// Canonical rendering of the job (`keyword arg...`)
    pub job: String,
    pub operation: Operation,
}

#[derive(Default)]
struct FakeExecState {
    calls: Vec<ExecCall>,
    /// Per-job queue of results, consumed one per call
    scripted: HashMap<String, VecDeque<Result<ExecOutcome, ExecError>>>,
    /// Per-job error returned on every call once the script runs out
    always: HashMap<String, ExecError>,
    delay: Option<Duration>,
    in_flight: usize,
    max_in_flight: usize,
}

/// Fake executor for testing
#[derive(Clone, Default)]
pub struct FakeExecutor {
    inner: Arc<Mutex<FakeExecState>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the job rendered as `job` `times` times with `error`, then succeed.
    pub fn fail_times(&self, job: &str, times: usize, error: ExecError) {
        let mut inner = self.inner.lock();
        let queue = inner.scripted.entry(job.to_string()).or_default();
        for _ in 0..times {
            queue.push_back(Err(error.clone()));
        }
    }

    /// Fail every execution of `job` with `error`.
    pub fn fail_always(&self, job: &str, error: ExecError) {
        self.inner.lock().always.insert(job.to_string(), error);
    }

    /// Queue a specific successful outcome for the next call of `job`.
    pub fn respond(&self, job: &str, outcome: ExecOutcome) {
        self.inner
            .lock()
            .scripted
            .entry(job.to_string())
            .or_default()
            .push_back(Ok(outcome));
    }

    /// Make every call take `delay` (cut short by cancellation).
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = Some(delay);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ExecCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of calls for the job rendered as `job`
    pub fn call_count(&self, job: &str) -> usize {
        self.inner.lock().calls.iter().filter(|c| c.job == job).count()
    }

    /// Highest number of concurrent executions observed
    pub fn max_in_flight(&self) -> usize {
        self.inner.lock().max_in_flight
    }
}

#[async_trait]
impl JobExecutor for FakeExecutor {
    async fn execute(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        let rendered = job.to_string();
        let delay = {
            let mut inner = self.inner.lock();
            inner.calls.push(ExecCall {
                job: rendered.clone(),
                operation: job.operation,
            });
            inner.in_flight += 1;
            inner.max_in_flight = inner.max_in_flight.max(inner.in_flight);
            inner.delay
        };

        let cancelled = match delay {
            Some(delay) => tokio::select! {
                _ = cancel.cancelled() => true,
                _ = tokio::time::sleep(delay) => false,
            },
            None => cancel.is_cancelled(),
        };

        let mut inner = self.inner.lock();
        inner.in_flight -= 1;
        if cancelled {
            return Err(ExecError::Cancelled);
        }
        if let Some(result) = inner.scripted.get_mut(&rendered).and_then(VecDeque::pop_front) {
            return result;
        }
        match inner.always.get(&rendered) {
            Some(error) => Err(error.clone()),
            None => Ok(ExecOutcome::default()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
