// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{send, Expander, SubJobSender, SubJobSpec};
use crate::error::ExpandError;
use crate::store::{ObjectStore, StorageClass};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;
use xf_core::{
    has_glob_meta, Job, JobArgument, KeyMatcher, Location, Operation, OptionFlag, GLOB_CHARS,
    KEY_SEPARATOR,
};

/// Most keys a single multi-key delete may carry.
pub const BATCH_DELETE_CHUNK: usize = 1000;

/// Expands batch jobs against an object store and the local filesystem.
#[derive(Clone)]
pub struct StandardExpander<S> {
    store: S,
}

impl<S: ObjectStore> StandardExpander<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn expand_storage(
        &self,
        job: &Job,
        tx: &SubJobSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExpandError> {
        let src = job
            .location(0)
            .ok_or_else(|| ExpandError::InvalidSource(job.to_string()))?;
        let matcher = src
            .matcher()
            .map_err(|e| ExpandError::Pattern(e.to_string()))?;
        let mut objects = self
            .store
            .list_stream(src.bucket(), matcher.prefix())
            .await
            .map_err(|e| ExpandError::Listing(e.to_string()))?;

        let parents = job.options.has(OptionFlag::Parents);
        let mut chunk = Vec::new();
        let mut matched = 0usize;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ExpandError::Cancelled),
                next = objects.recv() => next,
            };
            let Some(object) = next else {
                break;
            };
            let object = object.map_err(|e| ExpandError::Listing(e.to_string()))?;
            if !matcher.is_match(&object.key) {
                continue;
            }
            matched += 1;
            let source = src.with_key(object.key.as_str());

            let item = match job.operation {
                Operation::BatchDelete => {
                    chunk.push(JobArgument::storage(source));
                    if chunk.len() < BATCH_DELETE_CHUNK {
                        continue;
                    }
                    Ok(SubJobSpec::new(
                        Operation::BatchDeleteActual,
                        std::mem::take(&mut chunk),
                    ))
                }
                Operation::BatchDownload if object.storage_class == StorageClass::Glacier => {
                    Err(ExpandError::Entry {
                        path: source.to_string(),
                        message: "cannot download glacier object".into(),
                    })
                }
                Operation::BatchDownload => {
                    let dir = job.argument(1).map(|a| a.text.as_str()).unwrap_or("./");
                    let name = destination_name(&matcher, &object.key, parents);
                    Ok(SubJobSpec::new(
                        Operation::Download,
                        vec![
                            JobArgument::storage(source),
                            JobArgument::plain(format!("{dir}{name}")),
                        ],
                    ))
                }
                Operation::BatchCopy => {
                    let dst = job
                        .location(1)
                        .ok_or_else(|| ExpandError::InvalidSource(job.to_string()))?;
                    let name = destination_name(&matcher, &object.key, parents);
                    Ok(SubJobSpec::new(
                        Operation::Copy,
                        vec![
                            JobArgument::storage(source),
                            JobArgument::storage(dst.with_key(format!("{}{name}", dst.key()))),
                        ],
                    ))
                }
                op => return Err(ExpandError::InvalidSource(format!("{op} is not a storage batch"))),
            };
            send(tx, item, cancel).await?;
        }

        if !chunk.is_empty() {
            send(
                tx,
                Ok(SubJobSpec::new(Operation::BatchDeleteActual, chunk)),
                cancel,
            )
            .await?;
        }
        tracing::debug!(job = %job, matched, "storage expansion finished");
        Ok(())
    }

    async fn expand_local(
        &self,
        job: &Job,
        tx: &SubJobSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExpandError> {
        let source = job
            .argument(0)
            .map(|a| a.text.clone())
            .ok_or_else(|| ExpandError::InvalidSource(job.to_string()))?;
        let target = match job.operation {
            Operation::BatchUpload => Target::Storage(
                job.location(1)
                    .cloned()
                    .ok_or_else(|| ExpandError::InvalidSource(job.to_string()))?,
            ),
            Operation::BatchLocalCopy => Target::Local(
                job.argument(1)
                    .map(|a| a.text.clone())
                    .ok_or_else(|| ExpandError::InvalidSource(job.to_string()))?,
            ),
            op => return Err(ExpandError::InvalidSource(format!("{op} is not a local batch"))),
        };
        let walk = LocalWalk {
            source,
            target,
            parents: job.options.has(OptionFlag::Parents),
            tx: tx.clone(),
            cancel: cancel.clone(),
        };

        tokio::task::spawn_blocking(move || walk.run())
            .await
            .map_err(|e| ExpandError::Listing(format!("expansion task failed: {e}")))?
    }
}

#[async_trait]
impl<S: ObjectStore> Expander for StandardExpander<S> {
    async fn expand(
        &self,
        job: &Job,
        tx: &SubJobSender,
        cancel: &CancellationToken,
    ) -> Result<(), ExpandError> {
        match job.operation {
            Operation::BatchDownload | Operation::BatchCopy | Operation::BatchDelete => {
                self.expand_storage(job, tx, cancel).await
            }
            Operation::BatchUpload | Operation::BatchLocalCopy => {
                self.expand_local(job, tx, cancel).await
            }
            op => Err(ExpandError::InvalidSource(format!("{op} is not a batch operation"))),
        }
    }
}

/// Name a matched key gets below the destination prefix.
fn destination_name<'a>(matcher: &KeyMatcher, key: &'a str, parents: bool) -> &'a str {
    if parents {
        matcher.relative_key(key)
    } else {
        match key.rfind(KEY_SEPARATOR) {
            Some(i) => &key[i + 1..],
            None => key,
        }
    }
}

#[derive(Debug, Clone)]
enum Target {
    Storage(Location),
    Local(String),
}

impl Target {
    fn spec(&self, path: &Path, name: &str) -> SubJobSpec {
        let src = JobArgument::plain(path.display().to_string());
        match self {
            Target::Storage(dst) => SubJobSpec::new(
                Operation::Upload,
                vec![
                    src,
                    JobArgument::storage(dst.with_key(format!("{}{name}", dst.key()))),
                ],
            ),
            Target::Local(dir) => {
                SubJobSpec::new(Operation::LocalCopy, vec![src, JobArgument::plain(format!("{dir}{name}"))])
            }
        }
    }
}

/// Local enumeration, run on the blocking pool.
struct LocalWalk {
    source: String,
    target: Target,
    parents: bool,
    tx: SubJobSender,
    cancel: CancellationToken,
}

impl LocalWalk {
    fn run(self) -> Result<(), ExpandError> {
        if has_glob_meta(&self.source) {
            self.walk_glob()
        } else {
            self.walk_dir()
        }
    }

    fn emit(&self, item: Result<SubJobSpec, ExpandError>) -> Result<(), ExpandError> {
        if self.cancel.is_cancelled() {
            return Err(ExpandError::Cancelled);
        }
        self.tx.blocking_send(item).map_err(|_| ExpandError::Cancelled)
    }

    /// Every file below the directory, named by its relative path.
    fn walk_dir(&self) -> Result<(), ExpandError> {
        let root = PathBuf::from(&self.source);
        if !root.is_dir() {
            return Err(ExpandError::InvalidSource(format!("{} is not a directory", self.source)));
        }
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    self.emit(Err(ExpandError::Entry {
                        path,
                        message: e.to_string(),
                    }))?;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = relative_name(&root, entry.path()) else {
                continue;
            };
            self.emit(Ok(self.target.spec(entry.path(), &name)))?;
        }
        Ok(())
    }

    /// Files matching the pattern, named by basename or, with `--parents`,
    /// by their path below the pattern's literal directory.
    fn walk_glob(&self) -> Result<(), ExpandError> {
        let paths = glob::glob(&self.source).map_err(|e| ExpandError::Pattern(e.to_string()))?;
        let base = PathBuf::from(glob_base(&self.source));
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    self.emit(Err(ExpandError::Entry {
                        path: e.path().display().to_string(),
                        message: e.error().to_string(),
                    }))?;
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let name = if self.parents {
                relative_name(&base, &path)
            } else {
                path.file_name().map(|n| n.to_string_lossy().into_owned())
            };
            let Some(name) = name else {
                continue;
            };
            self.emit(Ok(self.target.spec(&path, &name)))?;
        }
        Ok(())
    }
}

/// `./a/b` and `a/b` name the same file.
fn without_curdir(path: &Path) -> &Path {
    let mut components = path.components();
    while components.clone().next() == Some(Component::CurDir) {
        components.next();
    }
    components.as_path()
}

/// The literal directory part of a glob: text before the first
/// metacharacter, cut back to the last `/`.
pub(crate) fn glob_base(pattern: &str) -> &str {
    let literal = match pattern.find(GLOB_CHARS) {
        Some(i) => &pattern[..i],
        None => pattern,
    };
    match literal.rfind(KEY_SEPARATOR) {
        Some(i) => &literal[..=i],
        None => "",
    }
}

fn relative_name(base: &Path, path: &Path) -> Option<String> {
    let rel = without_curdir(path).strip_prefix(without_curdir(base)).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
#[path = "standard_tests.rs"]
mod tests;
