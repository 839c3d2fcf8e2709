// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job outcome records sent to the result sink.

use crate::job::Job;
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded,
    /// Succeeded with a warning (e.g. skipped by `-n`)
    Warning,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Warnings count as success for continuation routing and stats.
    pub fn is_success(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Warning)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Warning => write!(f, "warning"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Sub-job tallies of a batch parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubJobSummary {
    pub succeeded: u32,
    pub failed: u32,
}

/// What happened to one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub source_description: String,
    /// Rendered job (`keyword arg...`)
    pub job: String,
    pub operation: Operation,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Present for batch parents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_jobs: Option<SubJobSummary>,
    /// Whether this job was expanded from a batch parent
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_sub_job: bool,
    #[serde(default)]
    pub attempts: u32,
}

impl JobResult {
    pub fn new(job: &Job, status: JobStatus) -> Self {
        Self {
            source_description: job.source_description.clone(),
            job: job.to_string(),
            operation: job.operation,
            status,
            error: None,
            messages: Vec::new(),
            sub_jobs: None,
            is_sub_job: false,
            attempts: 0,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_sub_jobs(mut self, summary: SubJobSummary) -> Self {
        self.sub_jobs = Some(summary);
        self
    }

    pub fn as_sub_job(mut self) -> Self {
        self.is_sub_job = true;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
