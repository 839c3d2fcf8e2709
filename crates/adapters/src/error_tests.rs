// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    transient   = { ExecError::Transient("reset".into()), true },
    timeout     = { ExecError::Timeout(500), true },
    cancelled   = { ExecError::Cancelled, false },
    not_found   = { ExecError::NoSuchObject("k".into()), false },
    denied      = { ExecError::PermissionDenied("k".into()), false },
    io          = { ExecError::Io("disk full".into()), false },
    command     = { ExecError::CommandFailed("exit 1".into()), false },
    partial     = { ExecError::PartialFailure { failed: 1, total: 3 }, false },
)]
fn retry_classification(err: ExecError, retryable: bool) {
    assert_eq!(err.is_retryable(), retryable);
}

#[yare::parameterized(
    not_found   = { io::ErrorKind::NotFound, "no such object: f" },
    denied      = { io::ErrorKind::PermissionDenied, "permission denied: f" },
    interrupted = { io::ErrorKind::Interrupted, "transient failure: f: boom" },
    timed_out   = { io::ErrorKind::TimedOut, "transient failure: f: boom" },
    other       = { io::ErrorKind::InvalidData, "f: boom" },
)]
fn io_classification(kind: io::ErrorKind, expected: &str) {
    let err = io::Error::new(kind, "boom");
    assert_eq!(ExecError::from_io(&err, "f").to_string(), expected);
}

#[test]
fn partial_failure_message() {
    let err = ExecError::PartialFailure {
        failed: 2,
        total: 5,
    };
    assert_eq!(err.to_string(), "2 of 5 objects failed");
}
