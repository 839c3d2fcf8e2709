// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch expansion: turning a wildcard, glob, or directory job into the
//! concrete sub-jobs it stands for.

mod standard;

pub use standard::{StandardExpander, BATCH_DELETE_CHUNK};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeExpander;

use crate::error::ExpandError;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use xf_core::{Job, JobArgument, Operation};

/// One concrete job derived from a batch parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubJobSpec {
    pub operation: Operation,
    pub arguments: Vec<JobArgument>,
}

impl SubJobSpec {
    pub fn new(operation: Operation, arguments: Vec<JobArgument>) -> Self {
        Self {
            operation,
            arguments,
        }
    }
}

/// Sender half handed to expanders; per-entry failures travel as `Err`.
pub type SubJobSender = mpsc::Sender<Result<SubJobSpec, ExpandError>>;

/// Enumerates the matches of a batch job.
#[async_trait]
pub trait Expander: Clone + Send + Sync + 'static {
    /// Stream sub-jobs into `tx` until the matches are exhausted.
    ///
    /// Returning `Err` means the listing itself failed; sub-jobs already sent
    /// still run.
    async fn expand(
        &self,
        job: &Job,
        tx: &SubJobSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExpandError>;
}

/// Send one item, giving up when cancelled or when nobody is listening.
pub(crate) async fn send(
    tx: &SubJobSender,
    item: Result<SubJobSpec, ExpandError>,
    cancel: &CancellationToken,
) -> Result<(), ExpandError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExpandError::Cancelled),
        sent = tx.send(item) => sent.map_err(|_| ExpandError::Cancelled),
    }
}
