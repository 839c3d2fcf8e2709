// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Job, JobArgument, Location, Operation, Options};

/// Storage argument from `s3://` text.
///
/// Panics on malformed input; test-only.
#[allow(clippy::panic)]
pub fn s3(text: &str) -> JobArgument {
    match Location::parse(text) {
        Ok(loc) => JobArgument::storage(loc),
        Err(e) => panic!("bad test location {text:?}: {e}"),
    }
}

/// Local path argument.
pub fn local(text: &str) -> JobArgument {
    JobArgument::plain(text)
}

/// A job with the operation's conventional keyword and no options.
pub fn job(operation: Operation, args: Vec<JobArgument>) -> Job {
    let keyword = match operation {
        Operation::Abort => "exit",
        Operation::Download | Operation::BatchDownload => "get",
        Operation::Delete | Operation::BatchDelete | Operation::LocalDelete => "rm",
        Operation::BatchDeleteActual => "batch-rm",
        Operation::List | Operation::ListBuckets => "ls",
        Operation::Size => "du",
        Operation::ShellExec => "!",
        _ => "cp",
    };
    Job::new(keyword, operation, Options::NONE, args)
}

/// `! <words...>`
pub fn shell_job(words: &[&str]) -> Job {
    job(
        Operation::ShellExec,
        words.iter().map(|w| JobArgument::plain(*w)).collect(),
    )
}

/// `exit [code]`
pub fn exit_job(code: Option<i32>) -> Job {
    job(
        Operation::Abort,
        code.map(|c| JobArgument::plain(c.to_string())).into_iter().collect(),
    )
}
