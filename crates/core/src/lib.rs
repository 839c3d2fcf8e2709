// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xf-core: Data model for the xf bulk transfer tool

pub mod command;
pub mod job;
pub mod location;
pub mod operation;
pub mod param;
pub mod result;
pub mod stats;
pub mod units;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use command::{CommandSpec, CommandTable};
pub use job::{Job, JobArgument, JobCounters};
pub use location::{
    has_glob_meta, has_wildcard, KeyMatcher, Location, LocationError, GLOB_CHARS, KEY_SEPARATOR,
    STORAGE_SCHEME, WILDCARD_CHARS,
};
pub use operation::{OptionFlag, Operation, Options};
pub use param::ParameterKind;
pub use result::{JobResult, JobStatus, SubJobSummary};
pub use stats::{OpStats, Stats, StatsSnapshot};
pub use units::{format_elapsed_ms, format_size};
