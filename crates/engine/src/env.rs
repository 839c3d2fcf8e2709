// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Worker count override; negative values mean a multiple of the CPU count.
pub fn numworkers() -> Option<i64> {
    std::env::var("XF_NUMWORKERS")
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
}

/// First retry delay (default: 100ms).
pub fn retry_base() -> Duration {
    parse_duration_ms("XF_RETRY_BASE_MS").unwrap_or(crate::config::DEFAULT_RETRY_BASE)
}

/// Upper bound on any retry delay (default: 10000ms).
pub fn retry_max() -> Duration {
    parse_duration_ms("XF_RETRY_MAX_MS").unwrap_or(crate::config::DEFAULT_RETRY_MAX)
}
