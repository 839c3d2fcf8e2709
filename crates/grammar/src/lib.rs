// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Job description grammar for xf.
//!
//! Turns input lines such as
//!
//! ```text
//! cp -n s3://bucket/logs/*.gz ./archive/ && rm s3://bucket/logs/*.gz || exit 2
//! ```
//!
//! into validated [`xf_core::Job`] values. Parsing happens in two layers:
//!
//! - [`parser`] splits the line into at most three chained segments and
//!   resolves each segment's keyword against the command table, trying
//!   overloads in order
//! - [`validate`] checks each token against the parameter kind its slot
//!   declares, canonicalising storage locations and inferring destination
//!   filenames

mod parse_error;
pub mod parser;
pub mod validate;

pub use parse_error::ParseError;
pub use parser::{parse_job_description, parse_single_job, preprocess, JobParser};
pub use validate::{validate, ValidationError};
