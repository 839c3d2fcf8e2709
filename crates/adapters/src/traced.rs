// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::error::{ExecError, ExpandError};
use crate::executor::{ExecOutcome, JobExecutor};
use crate::expand::{Expander, SubJobSender};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use xf_core::Job;

/// Wrapper that adds tracing to any JobExecutor
#[derive(Clone)]
pub struct TracedExecutor<E> {
    inner: E,
}

impl<E> TracedExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: JobExecutor> JobExecutor for TracedExecutor<E> {
    async fn execute(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        async {
            tracing::debug!(args = job.arguments.len(), "starting");
            let start = std::time::Instant::now();
            let result = self.inner.execute(job, cancel).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(outcome) => match &outcome.warning {
                    Some(warning) => tracing::info!(elapsed_ms, warning = %warning, "skipped"),
                    None => tracing::info!(elapsed_ms, bytes = outcome.bytes, "completed"),
                },
                Err(ExecError::Cancelled) => tracing::info!(elapsed_ms, "cancelled"),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(elapsed_ms, error = %e, "failed (retryable)")
                }
                // reported on stdout as -ERR
                Err(e) => tracing::debug!(elapsed_ms, error = %e, "failed"),
            }
            result
        }
        .instrument(tracing::info_span!("exec", op = %job.operation, job = %job))
        .await
    }
}

/// Wrapper that adds tracing to any Expander
#[derive(Clone)]
pub struct TracedExpander<X> {
    inner: X,
}

impl<X> TracedExpander<X> {
    pub fn new(inner: X) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<X: Expander> Expander for TracedExpander<X> {
    async fn expand(
        &self,
        job: &Job,
        tx: &SubJobSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExpandError> {
        async {
            tracing::info!("listing");
            let start = std::time::Instant::now();
            let result = self.inner.expand(job, tx, cancel).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "listing finished"),
                Err(ExpandError::Cancelled) => tracing::info!(elapsed_ms, "listing cancelled"),
                Err(e) => tracing::debug!(elapsed_ms, error = %e, "listing failed"),
            }
            result
        }
        .instrument(tracing::info_span!("expand", op = %job.operation, job = %job))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
