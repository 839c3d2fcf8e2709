// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{format_elapsed_ms, format_size};

#[yare::parameterized(
    zero          = { 0, "0" },
    small         = { 512, "512" },
    exactly_kib   = { 1024, "1024" },
    just_over_kib = { 1536, "1.5K" },
    mebibytes     = { 20 * 1024 * 1024 + 1, "20.0M" },
    gibibytes     = { 3 * (1 << 30) + (1 << 29), "3.5G" },
    tebibytes     = { 2 * (1 << 40) + 1, "2.0T" },
)]
fn size(bytes: u64, expected: &str) {
    assert_eq!(format_size(bytes), expected);
}

#[yare::parameterized(
    zero          = { 0, "0.000s" },
    sub_second    = { 42, "0.042s" },
    seconds       = { 1_250, "1.250s" },
    minutes       = { 125_000, "125.000s" },
)]
fn elapsed(ms: u64, expected: &str) {
    assert_eq!(format_elapsed_ms(ms), expected);
}
