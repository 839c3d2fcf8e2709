// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage locations and wildcard/glob classification.
//!
//! A storage location is written `s3://bucket[/key]`. The bucket never
//! contains wildcard characters; the key may, in which case the location
//! stands for every object whose key matches it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Scheme prefix every storage location starts with.
pub const STORAGE_SCHEME: &str = "s3://";

/// Key separator inside a bucket.
pub const KEY_SEPARATOR: char = '/';

/// Characters that turn a storage key into a wildcard.
pub const WILDCARD_CHARS: &[char] = &['*', '?'];

/// Characters that make a local path a glob pattern.
pub const GLOB_CHARS: &[char] = &['*', '?', '[', ']'];

/// Errors from parsing a storage location
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("storage url should start with {STORAGE_SCHEME}")]
    NotStorageUrl,
    #[error("storage url should have a bucket")]
    MissingBucket,
    #[error("bucket name cannot contain wildcards: {0}")]
    WildcardInBucket(String),
    #[error("invalid wildcard pattern: {0}")]
    InvalidPattern(String),
}

/// Check if a string contains any storage wildcard characters.
pub fn has_wildcard(s: &str) -> bool {
    s.contains(WILDCARD_CHARS)
}

/// Check if a string contains any glob metacharacters.
pub fn has_glob_meta(s: &str) -> bool {
    s.contains(GLOB_CHARS)
}

/// A bucket + key pair addressing an object, a prefix, or a wildcard set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    bucket: String,
    key: String,
}

impl Location {
    /// Build a location from already-validated parts.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse `s3://bucket[/key]`.
    ///
    /// Leading slashes of the key are dropped, so `s3://b//k` and `s3://b/k`
    /// address the same object.
    pub fn parse(text: &str) -> Result<Self, LocationError> {
        let rest = text
            .strip_prefix(STORAGE_SCHEME)
            .ok_or(LocationError::NotStorageUrl)?;

        let (bucket, key) = match rest.split_once(KEY_SEPARATOR) {
            Some((bucket, key)) => (bucket, key.trim_start_matches(KEY_SEPARATOR)),
            None => (rest, ""),
        };

        if bucket.is_empty() {
            return Err(LocationError::MissingBucket);
        }
        if has_wildcard(bucket) {
            return Err(LocationError::WildcardInBucket(bucket.to_string()));
        }

        Ok(Self::new(bucket, key))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Render as `bucket` or `bucket/key`.
    pub fn format(&self) -> String {
        if self.key.is_empty() {
            self.bucket.clone()
        } else {
            format!("{}{}{}", self.bucket, KEY_SEPARATOR, self.key)
        }
    }

    /// Same bucket, different key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self::new(self.bucket.clone(), key)
    }

    /// The bucket itself, without any key.
    pub fn bucket_only(&self) -> Self {
        Self::new(self.bucket.clone(), "")
    }

    /// Whether the key contains wildcard characters.
    pub fn is_wildcard(&self) -> bool {
        has_wildcard(&self.key)
    }

    /// Whether the location names a prefix (empty key or trailing `/`).
    pub fn is_prefix(&self) -> bool {
        self.key.is_empty() || self.key.ends_with(KEY_SEPARATOR)
    }

    /// Last path segment of the key (empty for prefixes).
    pub fn basename(&self) -> &str {
        match self.key.rfind(KEY_SEPARATOR) {
            Some(i) => &self.key[i + 1..],
            None => &self.key,
        }
    }

    /// The literal part of the key before the first wildcard.
    pub fn list_prefix(&self) -> &str {
        match self.key.find(WILDCARD_CHARS) {
            Some(i) => &self.key[..i],
            None => &self.key,
        }
    }

    /// Compile a matcher for object keys under this location.
    ///
    /// Wildcard keys translate `?` to a single character and `*` to any run
    /// of characters (including `/`). Plain keys match everything they prefix.
    pub fn matcher(&self) -> Result<KeyMatcher, LocationError> {
        let prefix = self.list_prefix();
        let filter = &self.key[prefix.len()..];

        let mut pattern = String::from("^");
        pattern.push_str(&regex::escape(prefix));
        if filter.is_empty() {
            pattern.push_str(".*");
        } else {
            for c in filter.chars() {
                match c {
                    '?' => pattern.push('.'),
                    '*' => pattern.push_str(".*"),
                    c => pattern.push_str(&regex::escape(&c.to_string())),
                }
            }
        }
        pattern.push('$');

        let regex =
            Regex::new(&pattern).map_err(|e| LocationError::InvalidPattern(e.to_string()))?;
        Ok(KeyMatcher {
            regex,
            prefix: prefix.to_string(),
            wildcard: !filter.is_empty(),
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", STORAGE_SCHEME, self.format())
    }
}

/// Compiled key matcher for a (possibly wildcard) location.
#[derive(Debug, Clone)]
pub struct KeyMatcher {
    regex: Regex,
    prefix: String,
    wildcard: bool,
}

impl KeyMatcher {
    /// The literal listing prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The part of a matched key that should be preserved at a destination.
    ///
    /// For wildcard matches this is everything after the last `/` preceding
    /// the wildcard (`a/b/te*` matching `a/b/test/c.txt` yields `test/c.txt`).
    /// For plain prefixes it is the key relative to the prefix.
    pub fn relative_key<'a>(&self, key: &'a str) -> &'a str {
        if !key.starts_with(&self.prefix) {
            return key;
        }
        if self.wildcard {
            match self.prefix.rfind(KEY_SEPARATOR) {
                Some(i) => &key[i + 1..],
                None => key,
            }
        } else {
            let rel = &key[self.prefix.len()..];
            rel.trim_start_matches(KEY_SEPARATOR)
        }
    }
}

#[cfg(test)]
#[path = "location_tests.rs"]
mod tests;
