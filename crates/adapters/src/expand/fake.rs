// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake expander for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{send, Expander, SubJobSender, SubJobSpec};
use crate::error::ExpandError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use xf_core::Job;

#[derive(Clone, Default)]
struct Script {
    items: Vec<Result<SubJobSpec, ExpandError>>,
    /// Listing error returned after the items are sent
    error: Option<ExpandError>,
}

#[derive(Default)]
struct FakeExpandState {
    calls: Vec<String>,
    scripts: HashMap<String, Script>,
}

/// Fake expander for testing; unscripted jobs expand to nothing
#[derive(Clone, Default)]
pub struct FakeExpander {
    inner: Arc<Mutex<FakeExpandState>>,
}

impl FakeExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand the job rendered as `job` into `specs`.
    pub fn set_matches(&self, job: &str, specs: Vec<SubJobSpec>) {
        let mut inner = self.inner.lock();
        let script = inner.scripts.entry(job.to_string()).or_default();
        script.items = specs.into_iter().map(Ok).collect();
    }

    /// Report a per-entry failure after the matches.
    pub fn add_entry_error(&self, job: &str, error: ExpandError) {
        self.inner
            .lock()
            .scripts
            .entry(job.to_string())
            .or_default()
            .items
            .push(Err(error));
    }

    /// Fail the listing once every scripted item has been sent.
    pub fn fail_listing(&self, job: &str, error: ExpandError) {
        self.inner
            .lock()
            .scripts
            .entry(job.to_string())
            .or_default()
            .error = Some(error);
    }

    /// Jobs expanded so far, rendered
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl Expander for FakeExpander {
    async fn expand(
        &self,
        job: &Job,
        tx: &SubJobSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExpandError> {
        let rendered = job.to_string();
        let script = {
            let mut inner = self.inner.lock();
            inner.calls.push(rendered.clone());
            inner.scripts.get(&rendered).cloned().unwrap_or_default()
        };
        for item in script.items {
            send(tx, item, cancel).await?;
        }
        match script.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
