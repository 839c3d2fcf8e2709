// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feeding job descriptions into the pool.

use crate::output::Reporter;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use xf_adapters::{Expander, JobExecutor};
use xf_engine::{EngineError, WorkerPool};
use xf_grammar::JobParser;

/// Parses lines and queues the resulting jobs.
pub struct Feeder<'a, E, X> {
    parser: &'a JobParser,
    pool: &'a WorkerPool<E, X>,
    reporter: Reporter,
}

impl<'a, E: JobExecutor, X: Expander> Feeder<'a, E, X> {
    pub fn new(parser: &'a JobParser, pool: &'a WorkerPool<E, X>, reporter: Reporter) -> Self {
        Self {
            parser,
            pool,
            reporter,
        }
    }

    /// Parse one job description and queue it. Blank lines and comments are
    /// skipped; parse errors are reported and counted as failures.
    ///
    /// Returns whether a job was queued.
    pub async fn submit_line(&self, line: &str) -> Result<bool, EngineError> {
        match self.parser.parse(line) {
            Ok(Some(job)) => {
                self.pool.submit(job).await?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                tracing::debug!(line, error = %e, "rejected job description");
                self.pool.stats().record_parse_failure();
                self.reporter.print_parse_error(line.trim(), &e);
                Ok(false)
            }
        }
    }

    /// Queue every line of `reader` until EOF or cancellation.
    pub async fn submit_lines<R: AsyncBufRead + Unpin>(&self, reader: R) -> Result<usize> {
        let cancel = self.pool.cancel_token();
        let mut lines = reader.lines();
        let mut queued = 0;
        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = lines.next_line() => line.context("failed to read commands")?,
            };
            let Some(line) = line else {
                break;
            };
            if self.submit_line(&line).await? {
                queued += 1;
            }
        }
        tracing::debug!(queued, "input finished");
        Ok(queued)
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
