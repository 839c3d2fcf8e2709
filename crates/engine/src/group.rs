// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion tracking for one expanded batch job.

use parking_lot::Mutex;
use xf_adapters::ExpandError;
use xf_core::{Job, JobStatus, SubJobSummary};

#[derive(Debug, Default)]
struct GroupState {
    /// Sub-jobs in flight, plus one while the listing is still running
    pending: usize,
    succeeded: u32,
    failed: u32,
    cancelled: u32,
    listing_error: Option<ExpandError>,
}

/// A batch parent and the tallies of the sub-jobs expanded from it.
///
/// The group completes exactly once: when the listing has finished and the
/// last sub-job has reported. Whichever of the two happens last sees `true`.
#[derive(Debug)]
pub(crate) struct BatchGroup {
    parent: Job,
    /// The parent runs because an earlier job failed
    recovers: bool,
    state: Mutex<GroupState>,
}

impl BatchGroup {
    pub(crate) fn new(parent: Job) -> Self {
        Self {
            parent,
            recovers: false,
            state: Mutex::new(GroupState {
                pending: 1,
                ..GroupState::default()
            }),
        }
    }

    pub(crate) fn recovering(mut self, recovers: bool) -> Self {
        self.recovers = recovers;
        self
    }

    pub(crate) fn recovers(&self) -> bool {
        self.recovers
    }

    pub(crate) fn parent(&self) -> &Job {
        &self.parent
    }

    pub(crate) fn add_sub_job(&self) {
        self.state.lock().pending += 1;
    }

    /// Tally a finished sub-job. Returns whether the group is now complete.
    pub(crate) fn sub_job_done(&self, status: JobStatus) -> bool {
        let mut state = self.state.lock();
        match status {
            JobStatus::Succeeded | JobStatus::Warning => state.succeeded += 1,
            JobStatus::Failed => state.failed += 1,
            JobStatus::Cancelled => state.cancelled += 1,
        }
        state.pending = state.pending.saturating_sub(1);
        state.pending == 0
    }

    /// A match that never became a sub-job.
    pub(crate) fn entry_failed(&self) {
        self.state.lock().failed += 1;
    }

    /// The listing has finished. Returns whether the group is now complete.
    pub(crate) fn listing_done(&self, error: Option<ExpandError>) -> bool {
        let mut state = self.state.lock();
        state.listing_error = error;
        state.pending = state.pending.saturating_sub(1);
        state.pending == 0
    }

    pub(crate) fn summary(&self) -> SubJobSummary {
        let state = self.state.lock();
        SubJobSummary {
            succeeded: state.succeeded,
            failed: state.failed,
        }
    }

    pub(crate) fn listing_error(&self) -> Option<ExpandError> {
        self.state.lock().listing_error.clone()
    }

    pub(crate) fn had_cancelled(&self) -> bool {
        self.state.lock().cancelled > 0
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
