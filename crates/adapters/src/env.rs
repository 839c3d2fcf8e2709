// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use crate::subprocess::SHELL_COMMAND_TIMEOUT;
use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for `!` shell commands (default: 600000ms).
pub fn shell_timeout() -> Duration {
    parse_duration_ms("XF_SHELL_TIMEOUT_MS").unwrap_or(SHELL_COMMAND_TIMEOUT)
}
