// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local filesystem primitives

use crate::error::ExecError;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// Read/write buffer size; cancellation is checked between chunks.
pub const CHUNK_SIZE: usize = 1 << 20;

/// Copy `src` to `dst` in chunks, creating `dst`'s parent directories.
///
/// Copying a file onto itself is rejected before anything is opened, since
/// creating the destination would truncate the source. A cancelled or failed
/// copy removes the partial destination.
pub async fn copy_file(src: &Path, dst: &Path, cancel: &CancellationToken) -> Result<u64, ExecError> {
    if same_file(src, dst).await {
        return Err(ExecError::InvalidArguments(format!(
            "{} and {} are the same file",
            src.display(),
            dst.display()
        )));
    }
    let mut reader = tokio::fs::File::open(src)
        .await
        .map_err(|e| ExecError::from_io(&e, src.display()))?;
    ensure_parent(dst).await?;
    let mut writer = tokio::fs::File::create(dst)
        .await
        .map_err(|e| ExecError::from_io(&e, dst.display()))?;

    let result = pump(&mut reader, &mut writer, dst, cancel).await;
    if result.is_err() {
        drop(writer);
        let _ = tokio::fs::remove_file(dst).await;
    }
    result
}

/// Whether both paths resolve to one existing file.
async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

async fn pump(
    reader: &mut tokio::fs::File,
    writer: &mut tokio::fs::File,
    dst: &Path,
    cancel: &CancellationToken,
) -> Result<u64, ExecError> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        let n = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExecError::Cancelled),
            read = reader.read(&mut buf) => read.map_err(|e| ExecError::from_io(&e, dst.display()))?,
        };
        if n == 0 {
            break;
        }
        writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| ExecError::from_io(&e, dst.display()))?;
        total += n as u64;
    }
    writer
        .flush()
        .await
        .map_err(|e| ExecError::from_io(&e, dst.display()))?;
    Ok(total)
}

/// Create the parent directory of `path` if it has one.
pub async fn ensure_parent(path: &Path) -> Result<(), ExecError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ExecError::from_io(&e, parent.display())),
        _ => Ok(()),
    }
}

/// Local file operations used by the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    /// Copy a file; with `remove_source` the source is deleted afterwards.
    pub async fn copy(
        &self,
        src: &Path,
        dst: &Path,
        remove_source: bool,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError> {
        let bytes = copy_file(src, dst, cancel).await?;
        if remove_source {
            self.delete(src).await?;
        }
        Ok(bytes)
    }

    pub async fn delete(&self, path: &Path) -> Result<(), ExecError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| ExecError::from_io(&e, path.display()))
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
