// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xf execution engine: the worker pool that runs parsed jobs

pub mod config;
pub mod env;
mod error;
mod group;
mod pool;

pub use config::PoolConfig;
pub use error::EngineError;
pub use pool::{exit_code_of, WorkerPool, INVALID_EXIT_CODE};
