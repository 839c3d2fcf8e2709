// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validated, executable jobs.

use crate::location::Location;
use crate::operation::{Operation, Options};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// One validated argument of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobArgument {
    /// Canonical rendering of the argument
    pub text: String,
    /// Set only for storage arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl JobArgument {
    /// A local path or free-form token.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    /// A storage location; the text is its canonical `s3://` form.
    pub fn storage(location: Location) -> Self {
        Self {
            text: location.to_string(),
            location: Some(location),
        }
    }

    pub fn is_storage(&self) -> bool {
        self.location.is_some()
    }
}

impl fmt::Display for JobArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Success/failure tallies shared between a job and the sub-jobs expanded
/// from it. Cloning shares the underlying counters.
#[derive(Debug, Clone, Default)]
pub struct JobCounters {
    success: Arc<AtomicU32>,
    failure: Arc<AtomicU32>,
}

impl JobCounters {
    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failure.fetch_add(1, Ordering::Relaxed);
    }

    pub fn successes(&self) -> u32 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u32 {
        self.failure.load(Ordering::Relaxed)
    }

    /// Whether two handles point at the same counters.
    pub fn shares_with(&self, other: &JobCounters) -> bool {
        Arc::ptr_eq(&self.success, &other.success)
    }
}

/// A validated unit of work with optional continuations.
///
/// Continuations are at most one level deep: a job scheduled from
/// `on_success` or `on_failure` never carries continuations of its own.
#[derive(Debug, Clone)]
pub struct Job {
    /// The input line this job came from
    pub source_description: String,
    /// Keyword the job was written with (`cp`, `mv`, `rm`, ...)
    pub keyword: String,
    pub operation: Operation,
    pub options: Options,
    pub arguments: Vec<JobArgument>,
    pub on_success: Option<Box<Job>>,
    pub on_failure: Option<Box<Job>>,
    pub counters: JobCounters,
}

impl Job {
    /// Create a job with fresh counters and no continuations.
    pub fn new(
        keyword: impl Into<String>,
        operation: Operation,
        options: Options,
        arguments: Vec<JobArgument>,
    ) -> Self {
        let mut job = Self {
            source_description: String::new(),
            keyword: keyword.into(),
            operation,
            options,
            arguments,
            on_success: None,
            on_failure: None,
            counters: JobCounters::default(),
        };
        job.source_description = job.to_string();
        job
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_description = source.into();
        self
    }

    pub fn with_on_success(mut self, job: Job) -> Self {
        self.on_success = Some(Box::new(job));
        self
    }

    pub fn with_on_failure(mut self, job: Job) -> Self {
        self.on_failure = Some(Box::new(job));
        self
    }

    pub fn argument(&self, index: usize) -> Option<&JobArgument> {
        self.arguments.get(index)
    }

    /// Storage location of the argument at `index`, if it is one.
    pub fn location(&self, index: usize) -> Option<&Location> {
        self.arguments.get(index).and_then(|a| a.location.as_ref())
    }

    /// The continuation to schedule for the given outcome.
    pub fn continuation(&self, succeeded: bool) -> Option<&Job> {
        if succeeded {
            self.on_success.as_deref()
        } else {
            self.on_failure.as_deref()
        }
    }

    pub fn has_continuations(&self) -> bool {
        self.on_success.is_some() || self.on_failure.is_some()
    }

    /// Derive a concrete job from an expanded match.
    ///
    /// The sub-job keeps the parent's keyword, options, source description and
    /// counter handles, so its outcome is tallied against the parent. It never
    /// carries continuations; those belong to the parent.
    pub fn make_sub_job(&self, operation: Operation, arguments: Vec<JobArgument>) -> Job {
        Job {
            source_description: self.source_description.clone(),
            keyword: self.keyword.clone(),
            operation,
            options: self.options,
            arguments,
            on_success: None,
            on_failure: None,
            counters: self.counters.clone(),
        }
    }

    /// Record the outcome against the shared counters.
    pub fn record(&self, succeeded: bool) {
        if succeeded {
            self.counters.record_success();
        } else {
            self.counters.record_failure();
        }
    }
}

impl PartialEq for Job {
    /// Structural equality; counter handles are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.source_description == other.source_description
            && self.keyword == other.keyword
            && self.operation == other.operation
            && self.options == other.options
            && self.arguments == other.arguments
            && self.on_success == other.on_success
            && self.on_failure == other.on_failure
    }
}

impl Eq for Job {}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword)?;
        for arg in &self.arguments {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
