// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job executor adapters

mod standard;

pub use standard::StandardExecutor;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecCall, FakeExecutor};

use crate::error::ExecError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use xf_core::Job;

/// What a successful execution produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Bytes transferred
    pub bytes: u64,
    /// Output lines for the result sink (listings, sizes, command output)
    pub messages: Vec<String>,
    /// Set when the job succeeded without doing its work (e.g. `-n` skips)
    pub warning: Option<String>,
}

impl ExecOutcome {
    pub fn bytes(bytes: u64) -> Self {
        Self {
            bytes,
            ..Self::default()
        }
    }

    pub fn messages(messages: Vec<String>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    pub fn warning(reason: impl Into<String>) -> Self {
        Self {
            warning: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// Performs one concrete (non-batch) job.
#[async_trait]
pub trait JobExecutor: Clone + Send + Sync + 'static {
    /// Run the job to completion.
    ///
    /// Implementations must observe `cancel` and return
    /// [`ExecError::Cancelled`] promptly once it fires.
    async fn execute(&self, job: &Job, cancel: &CancellationToken)
        -> Result<ExecOutcome, ExecError>;
}
