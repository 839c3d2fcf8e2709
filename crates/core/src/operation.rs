// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation codes and per-job option flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a job does once it reaches an executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Stop the run (`exit [code]`)
    Abort,
    /// Storage object to local file
    Download,
    /// Wildcard storage objects to a local directory
    BatchDownload,
    /// Local file to storage object
    Upload,
    /// Glob or local directory to a storage prefix
    BatchUpload,
    /// Storage object to storage object
    Copy,
    /// Wildcard storage objects to a storage prefix
    BatchCopy,
    /// Delete one storage object
    Delete,
    /// Delete every object matching a wildcard
    BatchDelete,
    /// Multi-key delete inside one bucket
    BatchDeleteActual,
    /// List objects under a prefix or wildcard
    List,
    /// List buckets
    ListBuckets,
    /// Count objects and total size
    Size,
    /// Local file to local file
    LocalCopy,
    /// Glob or local directory to a local directory
    BatchLocalCopy,
    /// Delete a local file
    LocalDelete,
    /// Run an arbitrary program
    ShellExec,
}

impl Operation {
    /// Every operation, in declaration order.
    pub const ALL: [Operation; 17] = [
        Operation::Abort,
        Operation::Download,
        Operation::BatchDownload,
        Operation::Upload,
        Operation::BatchUpload,
        Operation::Copy,
        Operation::BatchCopy,
        Operation::Delete,
        Operation::BatchDelete,
        Operation::BatchDeleteActual,
        Operation::List,
        Operation::ListBuckets,
        Operation::Size,
        Operation::LocalCopy,
        Operation::BatchLocalCopy,
        Operation::LocalDelete,
        Operation::ShellExec,
    ];

    /// Stable index into per-operation counter arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether this operation fans out into sub-jobs instead of doing I/O itself.
    pub fn is_batch(self) -> bool {
        matches!(
            self,
            Operation::BatchDownload
                | Operation::BatchUpload
                | Operation::BatchCopy
                | Operation::BatchDelete
                | Operation::BatchLocalCopy
        )
    }

    /// Internal operations are not reported as standalone `+OK` lines.
    pub fn is_internal(self) -> bool {
        self == Operation::BatchDeleteActual
    }

    /// Option flags the parser accepts in front of this operation's arguments.
    pub fn accepted_options(self) -> &'static [OptionFlag] {
        use OptionFlag::*;
        match self {
            Operation::Download | Operation::LocalCopy => &[IfNotExists],
            Operation::Upload | Operation::Copy => &[IfNotExists, ReducedRedundancy, InfrequentAccess],
            Operation::BatchDownload | Operation::BatchLocalCopy => &[IfNotExists, Parents],
            Operation::BatchUpload | Operation::BatchCopy => {
                &[IfNotExists, Parents, ReducedRedundancy, InfrequentAccess]
            }
            Operation::List | Operation::Size => &[HumanReadable],
            _ => &[],
        }
    }

    /// Human description, aware of the delete-source option.
    pub fn describe(self, options: Options) -> &'static str {
        let mv = options.has(OptionFlag::DeleteSource);
        match self {
            Operation::Abort => "Exit program",
            Operation::Download if mv => "Download from storage and delete source objects",
            Operation::Download => "Download from storage",
            Operation::BatchDownload if mv => {
                "Batch download from storage and delete source objects"
            }
            Operation::BatchDownload => "Batch download from storage",
            Operation::Upload if mv => "Upload to storage and delete source files",
            Operation::Upload => "Upload to storage",
            Operation::BatchUpload if mv => "Batch upload to storage and delete source files",
            Operation::BatchUpload => "Batch upload to storage",
            Operation::Copy if mv => "Move storage object",
            Operation::Copy => "Copy storage object",
            Operation::BatchCopy if mv => "Batch move storage objects",
            Operation::BatchCopy => "Batch copy storage objects",
            Operation::Delete => "Delete from storage",
            Operation::BatchDelete | Operation::BatchDeleteActual => "Batch delete from storage",
            Operation::List => "List objects",
            Operation::ListBuckets => "List buckets",
            Operation::Size => "Count objects and size",
            Operation::LocalCopy if mv => "Move local files",
            Operation::LocalCopy => "Copy local files",
            Operation::BatchLocalCopy if mv => "Batch move local files",
            Operation::BatchLocalCopy => "Batch copy local files",
            Operation::LocalDelete => "Delete local files",
            Operation::ShellExec => "Arbitrary shell-execute",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Abort => "abort",
            Operation::Download => "download",
            Operation::BatchDownload => "batch-download",
            Operation::Upload => "upload",
            Operation::BatchUpload => "batch-upload",
            Operation::Copy => "copy",
            Operation::BatchCopy => "batch-copy",
            Operation::Delete => "delete",
            Operation::BatchDelete => "batch-delete",
            Operation::BatchDeleteActual => "batch-delete-actual",
            Operation::List => "ls",
            Operation::ListBuckets => "ls-buckets",
            Operation::Size => "du",
            Operation::LocalCopy => "local-copy",
            Operation::BatchLocalCopy => "batch-local-copy",
            Operation::LocalDelete => "local-delete",
            Operation::ShellExec => "shell-exec",
        };
        f.write_str(s)
    }
}

/// A single job option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionFlag {
    /// Remove the source after a successful transfer (`mv`)
    DeleteSource,
    /// Skip when the destination already exists (`-n`)
    IfNotExists,
    /// Keep the matched directory structure at the destination (`--parents`)
    Parents,
    /// Store with reduced redundancy (`-rr`)
    ReducedRedundancy,
    /// Store as infrequent access (`-ia`)
    InfrequentAccess,
    /// Print sizes in human-readable units (`-H`)
    HumanReadable,
}

impl OptionFlag {
    /// Command-line spelling, if the option can be given explicitly.
    pub fn param(self) -> Option<&'static str> {
        match self {
            OptionFlag::DeleteSource => None,
            OptionFlag::IfNotExists => Some("-n"),
            OptionFlag::Parents => Some("--parents"),
            OptionFlag::ReducedRedundancy => Some("-rr"),
            OptionFlag::InfrequentAccess => Some("-ia"),
            OptionFlag::HumanReadable => Some("-H"),
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of option flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Options(u8);

impl Options {
    pub const NONE: Options = Options(0);

    pub fn with(self, flag: OptionFlag) -> Self {
        Options(self.0 | flag.bit())
    }

    pub fn insert(&mut self, flag: OptionFlag) {
        self.0 |= flag.bit();
    }

    pub fn has(self, flag: OptionFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Explicit flags rendered as they would be typed, space separated.
    pub fn params(self) -> Vec<&'static str> {
        [
            OptionFlag::IfNotExists,
            OptionFlag::Parents,
            OptionFlag::ReducedRedundancy,
            OptionFlag::InfrequentAccess,
            OptionFlag::HumanReadable,
        ]
        .into_iter()
        .filter(|f| self.has(*f))
        .filter_map(OptionFlag::param)
        .collect()
    }
}

impl From<&[OptionFlag]> for Options {
    fn from(flags: &[OptionFlag]) -> Self {
        flags.iter().fold(Options::NONE, |acc, f| acc.with(*f))
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
