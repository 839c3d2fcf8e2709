// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared human-readable size and duration formatting.

const SIZE_UNITS: [(&str, u64); 4] = [("K", 1 << 10), ("M", 1 << 20), ("G", 1 << 30), ("T", 1 << 40)];

/// Format a byte count: `"512"`, `"1.5K"`, `"20.0M"`.
///
/// The largest unit strictly below the value is used; values up to 1024
/// are printed as plain integers.
pub fn format_size(bytes: u64) -> String {
    match SIZE_UNITS.iter().rev().find(|(_, div)| bytes > *div) {
        Some((suffix, div)) => format!("{:.1}{}", bytes as f64 / *div as f64, suffix),
        None => bytes.to_string(),
    }
}

/// Format milliseconds as seconds with millisecond precision: `"1.250s"`.
pub fn format_elapsed_ms(ms: u64) -> String {
    format!("{}.{:03}s", ms / 1000, ms % 1000)
}

#[cfg(test)]
#[path = "units_tests.rs"]
mod tests;
