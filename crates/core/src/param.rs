// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parameter kinds declared by command specs.

use std::fmt;

/// How a single command-line token is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Any single token
    Unchecked,
    /// One or more trailing free-form tokens (only valid as the last kind)
    UncheckedOneOrMore,
    /// Bucket or bucket + key, no wildcard, no trailing slash
    StorageObject,
    /// Bucket + non-empty key, no wildcard, no trailing slash
    StorageSimpleObject,
    /// Object or prefix; a prefix inherits the reference basename
    StorageObjectOrDir,
    /// Bucket + non-empty key containing a wildcard
    StorageWildcardObject,
    /// Bucket or prefix ending in `/`
    StorageDir,
    /// Local file, not a directory
    LocalFileObject,
    /// Local file or directory (existing directories get a trailing `/`)
    LocalFileOrDir,
    /// Local directory (normalised with a trailing `/`)
    LocalDir,
    /// Like [`ParameterKind::LocalFileOrDir`], defaulting to `.`
    OptionalLocalFileOrDir,
    /// Like [`ParameterKind::LocalDir`], defaulting to `.`
    OptionalLocalDir,
    /// Local glob pattern
    Glob,
}

impl ParameterKind {
    pub fn is_unchecked(self) -> bool {
        matches!(
            self,
            ParameterKind::Unchecked | ParameterKind::UncheckedOneOrMore
        )
    }

    pub fn is_storage(self) -> bool {
        matches!(
            self,
            ParameterKind::StorageObject
                | ParameterKind::StorageSimpleObject
                | ParameterKind::StorageObjectOrDir
                | ParameterKind::StorageWildcardObject
                | ParameterKind::StorageDir
        )
    }

    pub fn is_local(self) -> bool {
        matches!(
            self,
            ParameterKind::LocalFileObject
                | ParameterKind::LocalFileOrDir
                | ParameterKind::LocalDir
                | ParameterKind::OptionalLocalFileOrDir
                | ParameterKind::OptionalLocalDir
        )
    }

    /// Optional kinds may be omitted when they are the last parameter.
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            ParameterKind::OptionalLocalFileOrDir | ParameterKind::OptionalLocalDir
        )
    }

    /// Kinds whose basename later directory-style arguments may inherit.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            ParameterKind::StorageObject
                | ParameterKind::StorageSimpleObject
                | ParameterKind::LocalFileObject
        )
    }

    /// Kinds that append the reference basename to a directory-style token.
    pub fn infers_basename(self) -> bool {
        matches!(
            self,
            ParameterKind::StorageObjectOrDir
                | ParameterKind::LocalFileOrDir
                | ParameterKind::OptionalLocalFileOrDir
        )
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterKind::Unchecked => "param",
            ParameterKind::UncheckedOneOrMore => "param...",
            ParameterKind::StorageObject => "s3://bucket[/object]",
            ParameterKind::StorageSimpleObject => "s3://bucket/object",
            ParameterKind::StorageObjectOrDir => "s3://bucket[/object[/]]",
            ParameterKind::StorageWildcardObject => "s3://bucket/wild/*/obj*",
            ParameterKind::StorageDir => "s3://bucket[/prefix/]",
            ParameterKind::LocalFileObject => "filename",
            ParameterKind::LocalFileOrDir => "file-or-directory",
            ParameterKind::LocalDir => "directory",
            ParameterKind::OptionalLocalFileOrDir => "[file-or-directory]",
            ParameterKind::OptionalLocalDir => "[directory]",
            ParameterKind::Glob => "glob-pattern*",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[path = "param_tests.rs"]
mod tests;
