// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: object storage, the local filesystem, and
//! subprocesses, behind the executor and expander traits the scheduler uses.

mod env;
pub mod error;
pub mod executor;
pub mod expand;
pub mod local;
pub mod store;
pub mod subprocess;
pub mod traced;

pub use error::{ExecError, ExpandError};
pub use executor::{ExecOutcome, JobExecutor, StandardExecutor};
pub use expand::{Expander, StandardExpander, SubJobSender, SubJobSpec, BATCH_DELETE_CHUNK};
pub use local::LocalFs;
pub use store::{
    BucketInfo, DirectoryStore, Listing, ObjectInfo, ObjectStore, ObjectStream, StorageClass,
    LISTING_BUFFER,
};
pub use subprocess::ShellRunner;
pub use traced::{TracedExecutor, TracedExpander};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use executor::{ExecCall, FakeExecutor};
#[cfg(any(test, feature = "test-support"))]
pub use expand::FakeExpander;
