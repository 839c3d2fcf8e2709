// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object store abstraction

mod directory;

pub use directory::DirectoryStore;

use crate::error::ExecError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use xf_core::{Location, OptionFlag, Options};

/// How an object is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageClass {
    #[default]
    Standard,
    ReducedRedundancy,
    InfrequentAccess,
    Glacier,
}

impl StorageClass {
    /// One-letter code shown in listings (empty for standard).
    pub fn short_code(self) -> &'static str {
        match self {
            StorageClass::Standard => "",
            StorageClass::ReducedRedundancy => "R",
            StorageClass::InfrequentAccess => "I",
            StorageClass::Glacier => "G",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::ReducedRedundancy => "REDUCED_REDUNDANCY",
            StorageClass::InfrequentAccess => "STANDARD_IA",
            StorageClass::Glacier => "GLACIER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "STANDARD" => Some(StorageClass::Standard),
            "REDUCED_REDUNDANCY" => Some(StorageClass::ReducedRedundancy),
            "STANDARD_IA" => Some(StorageClass::InfrequentAccess),
            "GLACIER" => Some(StorageClass::Glacier),
            _ => None,
        }
    }

    /// Storage class requested by a job's options.
    pub fn from_options(options: Options) -> Self {
        if options.has(OptionFlag::ReducedRedundancy) {
            StorageClass::ReducedRedundancy
        } else if options.has(OptionFlag::InfrequentAccess) {
            StorageClass::InfrequentAccess
        } else {
            StorageClass::Standard
        }
    }
}

/// Metadata for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Full key inside the bucket
    pub key: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub storage_class: StorageClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInfo {
    pub name: String,
    pub created: DateTime<Utc>,
}

/// Result of a listing: objects plus, for delimited listings, the common
/// prefixes ("directories") one level below the requested prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub objects: Vec<ObjectInfo>,
    pub prefixes: Vec<String>,
}

/// Objects a streamed listing buffers ahead of its consumer.
pub const LISTING_BUFFER: usize = 1000;

/// Receiving half of a streamed listing. The stream ends early, after an
/// `Err`, when the walk fails part way.
pub type ObjectStream = mpsc::Receiver<Result<ObjectInfo, ExecError>>;

/// Outcome of deleting one key from a multi-key delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub key: String,
    pub error: Option<String>,
}

/// Bucket/key addressed object storage.
#[async_trait]
pub trait ObjectStore: Clone + Send + Sync + 'static {
    async fn list_buckets(&self) -> Result<Vec<BucketInfo>, ExecError>;

    /// Metadata for an object, or `None` if it does not exist.
    async fn head(&self, location: &Location) -> Result<Option<ObjectInfo>, ExecError>;

    /// List objects whose key starts with `prefix`, sorted by key.
    ///
    /// With `delimited`, keys containing a `/` past the prefix are folded into
    /// [`Listing::prefixes`].
    async fn list(&self, bucket: &str, prefix: &str, delimited: bool)
        -> Result<Listing, ExecError>;

    /// Stream every object whose key starts with `prefix`.
    ///
    /// A missing bucket fails up front. Objects arrive while the listing is
    /// still running and at most [`LISTING_BUFFER`] wait unread; dropping the
    /// stream stops the listing.
    async fn list_stream(&self, bucket: &str, prefix: &str) -> Result<ObjectStream, ExecError>;

    /// Download an object into a local file; returns bytes written.
    async fn get(
        &self,
        location: &Location,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError>;

    /// Upload a local file; returns bytes written.
    async fn put(
        &self,
        src: &Path,
        location: &Location,
        class: StorageClass,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError>;

    async fn copy(
        &self,
        src: &Location,
        dst: &Location,
        class: StorageClass,
        cancel: &CancellationToken,
    ) -> Result<u64, ExecError>;

    async fn delete(&self, location: &Location) -> Result<(), ExecError>;

    /// Delete many keys in one bucket, reporting per-key outcomes.
    async fn delete_many(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<DeleteOutcome>, ExecError>;
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
