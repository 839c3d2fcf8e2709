// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution and expansion errors.

use std::io;
use thiserror::Error;

/// Errors from executing a concrete job.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecError {
    #[error("no such bucket: {0}")]
    NoSuchBucket(String),
    #[error("no such object: {0}")]
    NoSuchObject(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Io(String),
    /// Failures worth another attempt (interrupted I/O, resets, throttling)
    #[error("transient failure: {0}")]
    Transient(String),
    #[error("timed out after {0}ms")]
    Timeout(u64),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("{failed} of {total} objects failed")]
    PartialFailure { failed: usize, total: usize },
    #[error("cancelled")]
    Cancelled,
}

impl ExecError {
    /// Whether the scheduler should try the job again.
    ///
    /// Cancellation is always terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExecError::Transient(_) | ExecError::Timeout(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecError::Cancelled)
    }

    /// Classify an I/O error on `context` (a path or object name).
    pub fn from_io(err: &io::Error, context: impl std::fmt::Display) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ExecError::NoSuchObject(context.to_string()),
            io::ErrorKind::PermissionDenied => ExecError::PermissionDenied(context.to_string()),
            io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => ExecError::Transient(format!("{context}: {err}")),
            _ => ExecError::Io(format!("{context}: {err}")),
        }
    }
}

/// Errors from enumerating the matches of a batch job.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// The listing itself failed; the whole batch fails.
    #[error("listing failed: {0}")]
    Listing(String),
    /// One entry could not be turned into a sub-job.
    #[error("{path}: {message}")]
    Entry { path: String, message: String },
    #[error("invalid pattern: {0}")]
    Pattern(String),
    #[error("invalid batch source: {0}")]
    InvalidSource(String),
    #[error("cancelled")]
    Cancelled,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
