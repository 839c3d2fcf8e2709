// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

/// Root directory of the object store: XF_STORAGE_ROOT > current directory
pub fn storage_root() -> PathBuf {
    match std::env::var("XF_STORAGE_ROOT") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("."),
    }
}

