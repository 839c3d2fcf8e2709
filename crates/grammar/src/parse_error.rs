// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job description parse errors.

use crate::validate::ValidationError;
use thiserror::Error;

/// Errors from parsing a job description.
///
/// All of them surface before anything executes and are never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The first token matches no command keyword.
    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),

    /// Every overload of the keyword was rejected.
    ///
    /// `last_error` is the validator error of the last candidate that passed
    /// its arity check, if any did.
    #[error(
        "Invalid parameters to \"{keyword}\"{}",
        last_error.as_ref().map(|e| format!(": {e}")).unwrap_or_default()
    )]
    InvalidParameters {
        keyword: String,
        last_error: Option<ValidationError>,
    },

    /// A chained segment itself contains `&&` or `||`.
    #[error("Nested commands are not supported")]
    NestedCommand,

    /// A chained segment is empty or only a comment.
    #[error("Empty continuation in \"{0}\"")]
    EmptyContinuation(String),
}

impl ParseError {
    /// Validator reason code, when the failure came from argument validation.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ParseError::InvalidParameters {
                last_error: Some(e),
                ..
            } => Some(e.reason()),
            _ => None,
        }
    }
}
