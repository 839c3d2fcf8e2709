// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object store backed by a local directory tree.
//!
//! Every sub-directory of the root is a bucket and every regular file below
//! it is an object keyed by its `/`-separated relative path. Non-standard
//! storage classes are kept in sidecar files under `<root>/.xf-meta/`.

use super::{
    BucketInfo, DeleteOutcome, Listing, ObjectInfo, ObjectStore, ObjectStream, StorageClass,
    LISTING_BUFFER,
};
use crate::error::ExecError;
use crate::local::{copy_file, ensure_parent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;
use xf_core::{Location, KEY_SEPARATOR};

const META_DIR: &str = ".xf-meta";

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: Arc<PathBuf>,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, ExecError> {
        if bucket.is_empty() || bucket.starts_with('.') || bucket.contains(['/', '\\']) {
            return Err(ExecError::NoSuchBucket(bucket.to_string()));
        }
        Ok(self.root.join(bucket))
    }

    async fn existing_bucket(&self, bucket: &str) -> Result<PathBuf, ExecError> {
        let path = self.bucket_path(bucket)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(ExecError::NoSuchBucket(bucket.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExecError::NoSuchBucket(bucket.to_string()))
            }
            Err(e) => Err(ExecError::from_io(&e, path.display())),
        }
    }

    /// Path of an object file, rejecting keys that cannot name a file.
    async fn object_path(&self, location: &Location) -> Result<PathBuf, ExecError> {
        check_key(location)?;
        let bucket = self.existing_bucket(location.bucket()).await?;
        Ok(bucket.join(location.key()))
    }

    fn meta_path(&self, location: &Location) -> PathBuf {
        self.root
            .join(META_DIR)
            .join(location.bucket())
            .join(location.key())
    }

    async fn read_class(&self, location: &Location) -> StorageClass {
        match tokio::fs::read_to_string(self.meta_path(location)).await {
            Ok(text) => StorageClass::parse(&text).unwrap_or_default(),
            Err(_) => StorageClass::Standard,
        }
    }

    async fn write_class(&self, location: &Location, class: StorageClass) -> Result<(), ExecError> {
        let path = self.meta_path(location);
        if class == StorageClass::Standard {
            let _ = tokio::fs::remove_file(&path).await;
            return Ok(());
        }
        ensure_parent(&path).await?;
        tokio::fs::write(&path, class.as_str())
            .await
            .map_err(|e| ExecError::from_io(&e, path.display()))
    }

    async fn info(&self, location: &Location, path: &Path) -> Result<Option<ObjectInfo>, ExecError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => Ok(Some(ObjectInfo {
                key: location.key().to_string(),
                size: meta.len(),
                modified: modified_time(&meta),
                storage_class: self.read_class(location).await,
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ExecError::from_io(&e, location)),
        }
    }

    async fn require_object(&self, location: &Location) -> Result<PathBuf, ExecError> {
        let path = self.object_path(location).await?;
        match self.info(location, &path).await? {
            Some(_) => Ok(path),
            None => Err(ExecError::NoSuchObject(location.to_string())),
        }
    }
}

fn check_key(location: &Location) -> Result<(), ExecError> {
    let key = location.key();
    let bad = key.is_empty()
        || key.ends_with(KEY_SEPARATOR)
        || key
            .split(KEY_SEPARATOR)
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(ExecError::InvalidArguments(format!(
            "{location} does not name an object"
        )));
    }
    Ok(())
}

fn modified_time(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.modified().map(DateTime::<Utc>::from).unwrap_or_default()
}

fn relative_key(base: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn class_from_sidecar(path: &Path) -> StorageClass {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|text| StorageClass::parse(&text))
        .unwrap_or_default()
}

enum WalkEntry {
    Object(String, std::fs::Metadata),
    Prefix(String),
}

/// Walk `bucket_dir` below the directory part of `prefix`, handing each
/// matching entry to `visit` until it breaks.
///
/// Siblings are visited in file-name order.
fn walk_bucket(
    bucket_dir: &Path,
    prefix: &str,
    delimited: bool,
    mut visit: impl FnMut(WalkEntry) -> ControlFlow<()>,
) -> Result<(), ExecError> {
    let dir_part = match prefix.rfind(KEY_SEPARATOR) {
        Some(i) => &prefix[..=i],
        None => "",
    };
    let start = bucket_dir.join(dir_part);
    if !start.is_dir() {
        return Ok(());
    }

    let walker = WalkDir::new(&start)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = entry.map_err(|e| ExecError::Io(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(key) = relative_key(bucket_dir, entry.path()) else {
            continue;
        };
        let Some(rest) = key.strip_prefix(prefix) else {
            continue;
        };
        if delimited {
            if let Some(i) = rest.find(KEY_SEPARATOR) {
                let folded = format!("{prefix}{}", &rest[..=i]);
                if visit(WalkEntry::Prefix(folded)).is_break() {
                    return Ok(());
                }
                continue;
            }
        }
        let meta = entry
            .metadata()
            .map_err(|e| ExecError::Io(format!("{key}: {e}")))?;
        if visit(WalkEntry::Object(key, meta)).is_break() {
            return Ok(());
        }
    }
    Ok(())
}

/// Collect a whole listing: objects sorted by key, folded prefixes deduplicated.
fn collect_bucket(
    bucket_dir: &Path,
    prefix: &str,
    delimited: bool,
) -> Result<(Vec<(String, std::fs::Metadata)>, Vec<String>), ExecError> {
    let mut objects = Vec::new();
    let mut prefixes = BTreeSet::new();
    walk_bucket(bucket_dir, prefix, delimited, |entry| {
        match entry {
            WalkEntry::Object(key, meta) => objects.push((key, meta)),
            WalkEntry::Prefix(folded) => {
                prefixes.insert(folded);
            }
        }
        ControlFlow::Continue(())
    })?;
    objects.sort_by(|a, b| a.0.cmp(&b.0));
    Ok((objects, prefixes.into_iter().collect()))
}

/// Walk a bucket on the blocking pool, sending each object as it is found.
struct StreamWalk {
    bucket_dir: PathBuf,
    meta_dir: PathBuf,
    prefix: String,
}

impl StreamWalk {
    fn run(self, tx: &mpsc::Sender<Result<ObjectInfo, ExecError>>) {
        let mut sent = 0usize;
        let walked = walk_bucket(&self.bucket_dir, &self.prefix, false, |entry| {
            let WalkEntry::Object(key, meta) = entry else {
                return ControlFlow::Continue(());
            };
            let info = ObjectInfo {
                size: meta.len(),
                modified: modified_time(&meta),
                storage_class: class_from_sidecar(&self.meta_dir.join(&key)),
                key,
            };
            if tx.blocking_send(Ok(info)).is_err() {
                // consumer went away
                return ControlFlow::Break(());
            }
            sent += 1;
            ControlFlow::Continue(())
        });
        match walked {
            Ok(()) => tracing::debug!(prefix = %self.prefix, objects = sent, "streamed listing"),
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
            }
        }
    }
}

#[async_trait]
impl ObjectStore for DirectoryStore {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, ExecError> {
        let mut entries = tokio::fs::read_dir(self.root.as_path())
            .await
            .map_err(|e| ExecError::from_io(&e, self.root.display()))?;
        let mut buckets = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ExecError::from_io(&e, self.root.display()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if !meta.is_dir() {
                continue;
            }
            let created = meta
                .created()
                .or_else(|_| meta.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_default();
            buckets.push(BucketInfo { name, created });
        }
        buckets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buckets)
    }

    async fn head(&self, location: &Location) -> Result<Option<ObjectInfo>, ExecError> {
        let path = self.object_path(location).await?;
        self.info(location, &path).await
    }

    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        delimited: bool,
    ) -> Result<Listing, ExecError> {
        let bucket_dir = self.existing_bucket(bucket).await?;
        let owned_prefix = prefix.to_string();
        let (entries, prefixes) = tokio::task::spawn_blocking(move || {
            collect_bucket(&bucket_dir, &owned_prefix, delimited)
        })
        .await
        .map_err(|e| ExecError::Io(format!("listing task failed: {e}")))??;

        let base = Location::new(bucket, "");
        let mut objects = Vec::with_capacity(entries.len());
        for (key, meta) in entries {
            let location = base.with_key(key.as_str());
            objects.push(ObjectInfo {
                size: meta.len(),
                modified: modified_time(&meta),
                storage_class: self.read_class(&location).await,
                key,
            });
        }
        tracing::debug!(bucket, prefix, objects = objects.len(), "listed");
        Ok(Listing { objects, prefixes })
    }

    async fn list_stream(&self, bucket: &str, prefix: &str) -> Result<ObjectStream, ExecError> {
        let walk = StreamWalk {
            bucket_dir: self.existing_bucket(bucket).await?,
            meta_dir: self.root.join(META_DIR).join(bucket),
            prefix: prefix.to_string(),
        };
        let (tx, rx) = mpsc::channel(LISTING_BUFFER);
        tokio::task::spawn_blocking(move || walk.run(&tx));
        Ok(rx)
    }

    async fn get(
        &self,
        location: &Location,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError> {
        let path = self.require_object(location).await?;
        copy_file(&path, dest, cancel).await
    }

    async fn put(
        &self,
        src: &Path,
        location: &Location,
        class: StorageClass,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError> {
        let path = self.object_path(location).await?;
        let bytes = copy_file(src, &path, cancel).await?;
        self.write_class(location, class).await?;
        Ok(bytes)
    }

    async fn copy(
        &self,
        src: &Location,
        dst: &Location,
        class: StorageClass,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError> {
        if src == dst {
            return Err(ExecError::InvalidArguments(format!(
                "{src} cannot be copied onto itself"
            )));
        }
        let src_path = self.require_object(src).await?;
        let dst_path = self.object_path(dst).await?;
        let bytes = copy_file(&src_path, &dst_path, cancel).await?;
        self.write_class(dst, class).await?;
        Ok(bytes)
    }

    async fn delete(&self, location: &Location) -> Result<(), ExecError> {
        let path = self.object_path(location).await?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                let _ = tokio::fs::remove_file(self.meta_path(location)).await;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExecError::NoSuchObject(location.to_string()))
            }
            Err(e) => Err(ExecError::from_io(&e, location)),
        }
    }

    async fn delete_many(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<DeleteOutcome>, ExecError> {
        self.existing_bucket(bucket).await?;
        let base = Location::new(bucket, "");
        let mut outcomes = Vec::with_capacity(keys.len());
        for key in keys {
            let error = self
                .delete(&base.with_key(key.as_str()))
                .await
                .err()
                .map(|e| e.to_string());
            outcomes.push(DeleteOutcome {
                key: key.clone(),
                error,
            });
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
