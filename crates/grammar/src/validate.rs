// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-parameter argument validation.
//!
//! Each token of a command is checked against the [`ParameterKind`] its
//! command spec declares for that slot. Validation may rewrite the token:
//! storage locations are canonicalised, directories gain a trailing `/`, and
//! directory-style destinations inherit the basename of the reference
//! argument (the first object-like argument of the same command).

use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;
use xf_core::{has_glob_meta, JobArgument, Location, LocationError, ParameterKind, KEY_SEPARATOR};

/// Why a token was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("storage url should start with s3://")]
    NotAStorageUrl,
    #[error("storage url should have a bucket")]
    MissingBucket,
    #[error("bucket name cannot contain wildcards")]
    WildcardInBucket,
    #[error("storage key cannot contain wildcards")]
    WildcardForbidden,
    #[error("storage key should contain wildcards")]
    WildcardRequired,
    #[error("storage key should not be empty")]
    EmptyKey,
    #[error("storage key should not end with /")]
    TrailingSlashForbidden,
    #[error("storage dir should end with /")]
    MustEndInSlash,
    #[error("file param resembles storage url")]
    ResemblesStorageUrl,
    #[error("param should not contain glob characters")]
    ContainsGlobCharacters,
    #[error("file param should not be a directory")]
    IsADirectory,
    #[error("dir param can not be a file")]
    NotADirectory,
    #[error("could not stat {path}: {message}")]
    StatFailed { path: String, message: String },
    #[error("param does not look like a glob")]
    NotAGlob,
    #[error("invalid glob pattern: {0}")]
    InvalidGlobPattern(String),
}

impl ValidationError {
    /// Stable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::NotAStorageUrl => "not-a-storage-url",
            ValidationError::MissingBucket => "missing-bucket",
            ValidationError::WildcardInBucket => "wildcard-in-bucket",
            ValidationError::WildcardForbidden => "wildcard-forbidden",
            ValidationError::WildcardRequired => "wildcard-required",
            ValidationError::EmptyKey => "empty-key",
            ValidationError::TrailingSlashForbidden => "trailing-slash-forbidden",
            ValidationError::MustEndInSlash => "must-end-in-slash",
            ValidationError::ResemblesStorageUrl => "resembles-storage-url",
            ValidationError::ContainsGlobCharacters => "contains-glob-characters",
            ValidationError::IsADirectory => "is-a-directory",
            ValidationError::NotADirectory => "not-a-directory",
            ValidationError::StatFailed { .. } => "stat-failed",
            ValidationError::NotAGlob => "not-a-glob",
            ValidationError::InvalidGlobPattern(_) => "invalid-glob-pattern",
        }
    }
}

impl From<LocationError> for ValidationError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::NotStorageUrl => ValidationError::NotAStorageUrl,
            LocationError::MissingBucket => ValidationError::MissingBucket,
            LocationError::WildcardInBucket(_) => ValidationError::WildcardInBucket,
            LocationError::InvalidPattern(msg) => ValidationError::InvalidGlobPattern(msg),
        }
    }
}

/// Basename a directory-style argument may inherit from `reference`.
fn reference_basename(reference: Option<&JobArgument>) -> Option<String> {
    let arg = reference?;
    let base = match &arg.location {
        Some(loc) => loc.basename().to_string(),
        None => Path::new(&arg.text)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    (!base.is_empty()).then_some(base)
}

/// Validate one token against `kind`.
///
/// `reference` is the first storage-object, storage-simple-object or
/// local-file-object argument already validated in the same command.
pub fn validate(
    token: &str,
    kind: ParameterKind,
    reference: Option<&JobArgument>,
) -> Result<JobArgument, ValidationError> {
    let basename = if kind.infers_basename() {
        reference_basename(reference)
    } else {
        None
    };

    let result = match kind {
        ParameterKind::Unchecked | ParameterKind::UncheckedOneOrMore => {
            Ok(JobArgument::plain(token))
        }
        ParameterKind::Glob => validate_glob(token),
        k if k.is_storage() => validate_storage(token, k, basename.as_deref()),
        k => validate_local(token, k, basename.as_deref()),
    };

    match &result {
        Ok(arg) => tracing::trace!(token, %kind, canonical = %arg.text, "validated argument"),
        Err(e) => tracing::debug!(token, %kind, reason = e.reason(), "rejected argument"),
    }
    result
}

fn validate_storage(
    token: &str,
    kind: ParameterKind,
    basename: Option<&str>,
) -> Result<JobArgument, ValidationError> {
    let loc = Location::parse(token)?;
    let key = loc.key();
    let wildcard = loc.is_wildcard();

    match kind {
        ParameterKind::StorageObject
        | ParameterKind::StorageSimpleObject
        | ParameterKind::StorageObjectOrDir
            if wildcard =>
        {
            return Err(ValidationError::WildcardForbidden);
        }
        ParameterKind::StorageWildcardObject if !wildcard => {
            return Err(ValidationError::WildcardRequired);
        }
        ParameterKind::StorageWildcardObject | ParameterKind::StorageSimpleObject
            if key.is_empty() =>
        {
            return Err(ValidationError::EmptyKey);
        }
        _ => {}
    }

    let ends_in_slash = key.ends_with(KEY_SEPARATOR);
    match kind {
        ParameterKind::StorageObject | ParameterKind::StorageSimpleObject if ends_in_slash => {
            return Err(ValidationError::TrailingSlashForbidden);
        }
        ParameterKind::StorageDir if !key.is_empty() && !ends_in_slash => {
            return Err(ValidationError::MustEndInSlash);
        }
        _ => {}
    }

    let loc = match (kind, basename) {
        (ParameterKind::StorageObjectOrDir, Some(base)) if loc.is_prefix() => {
            loc.with_key(format!("{key}{base}"))
        }
        _ => loc,
    };
    Ok(JobArgument::storage(loc))
}

fn validate_local(
    token: &str,
    kind: ParameterKind,
    basename: Option<&str>,
) -> Result<JobArgument, ValidationError> {
    let token = if token.is_empty() && kind.is_optional() {
        "."
    } else {
        token
    };

    if Location::parse(token).is_ok() {
        return Err(ValidationError::ResemblesStorageUrl);
    }

    let mut path = if token == "." {
        format!(".{KEY_SEPARATOR}")
    } else {
        token.to_string()
    };
    let ends_in_slash = path.ends_with(KEY_SEPARATOR);

    if has_glob_meta(&path) {
        return Err(ValidationError::ContainsGlobCharacters);
    }

    match kind {
        ParameterKind::LocalFileObject => {
            if ends_in_slash {
                return Err(ValidationError::TrailingSlashForbidden);
            }
            if std::fs::metadata(&path).is_ok_and(|m| m.is_dir()) {
                return Err(ValidationError::IsADirectory);
            }
        }
        ParameterKind::LocalFileOrDir | ParameterKind::OptionalLocalFileOrDir => {
            if ends_in_slash {
                if let Some(base) = basename {
                    path.push_str(base);
                }
            } else if stat(&path)?.is_some_and(|m| m.is_dir()) {
                path.push(KEY_SEPARATOR);
            }
        }
        ParameterKind::LocalDir | ParameterKind::OptionalLocalDir => {
            if !ends_in_slash {
                if stat(&path)?.is_some_and(|m| !m.is_dir()) {
                    return Err(ValidationError::NotADirectory);
                }
                path.push(KEY_SEPARATOR);
            }
        }
        _ => {}
    }

    Ok(JobArgument::plain(path))
}

fn validate_glob(token: &str) -> Result<JobArgument, ValidationError> {
    if Location::parse(token).is_ok() {
        return Err(ValidationError::ResemblesStorageUrl);
    }
    if !has_glob_meta(token) {
        return Err(ValidationError::NotAGlob);
    }
    glob::Pattern::new(token).map_err(|e| ValidationError::InvalidGlobPattern(e.to_string()))?;
    Ok(JobArgument::plain(token))
}

/// Stat a path; a missing path is `Ok(None)`.
fn stat(path: &str) -> Result<Option<std::fs::Metadata>, ValidationError> {
    match std::fs::metadata(path) {
        Ok(m) => Ok(Some(m)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ValidationError::StatFailed {
            path: path.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
