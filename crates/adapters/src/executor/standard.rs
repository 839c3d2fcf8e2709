// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor dispatching every concrete operation to the store, the local
//! filesystem, or a subprocess.

use super::{ExecOutcome, JobExecutor};
use crate::error::ExecError;
use crate::local::LocalFs;
use crate::store::{ObjectInfo, ObjectStore, StorageClass};
use crate::subprocess::ShellRunner;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use xf_core::{format_size, Job, Location, Operation, OptionFlag, KEY_SEPARATOR};

const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Reason attached to `-n` skips.
pub const ALREADY_EXISTS: &str = "object already exists";

#[derive(Clone)]
pub struct StandardExecutor<S> {
    store: S,
    local: LocalFs,
    shell: ShellRunner,
}

impl<S: ObjectStore> StandardExecutor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            local: LocalFs::new(),
            shell: ShellRunner::from_env(),
        }
    }

    pub fn with_shell(mut self, shell: ShellRunner) -> Self {
        self.shell = shell;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn download(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        let src = location(job, 0)?;
        let dst = local_path(job, 1)?;
        if job.options.has(OptionFlag::IfNotExists) && self.local.exists(dst).await {
            return Ok(ExecOutcome::warning(ALREADY_EXISTS));
        }
        let bytes = self.store.get(src, dst, cancel).await?;
        if job.options.has(OptionFlag::DeleteSource) {
            self.store.delete(src).await?;
        }
        Ok(ExecOutcome::bytes(bytes))
    }

    async fn upload(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        let src = local_path(job, 0)?;
        let dst = location(job, 1)?;
        if job.options.has(OptionFlag::IfNotExists) && self.store.head(dst).await?.is_some() {
            return Ok(ExecOutcome::warning(ALREADY_EXISTS));
        }
        let class = StorageClass::from_options(job.options);
        let bytes = self.store.put(src, dst, class, cancel).await?;
        if job.options.has(OptionFlag::DeleteSource) {
            self.local.delete(src).await?;
        }
        Ok(ExecOutcome::bytes(bytes))
    }

    async fn copy(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        let src = location(job, 0)?;
        let dst = location(job, 1)?;
        if job.options.has(OptionFlag::IfNotExists) && self.store.head(dst).await?.is_some() {
            return Ok(ExecOutcome::warning(ALREADY_EXISTS));
        }
        let class = StorageClass::from_options(job.options);
        let bytes = self.store.copy(src, dst, class, cancel).await?;
        if job.options.has(OptionFlag::DeleteSource) {
            self.store.delete(src).await?;
        }
        Ok(ExecOutcome::bytes(bytes))
    }

    async fn local_copy(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        let src = local_path(job, 0)?;
        let dst = local_path(job, 1)?;
        if job.options.has(OptionFlag::IfNotExists) && self.local.exists(dst).await {
            return Ok(ExecOutcome::warning(ALREADY_EXISTS));
        }
        let remove = job.options.has(OptionFlag::DeleteSource);
        let bytes = self.local.copy(src, dst, remove, cancel).await?;
        Ok(ExecOutcome::bytes(bytes))
    }

    /// Multi-key delete; every argument must address the same bucket.
    async fn delete_keys(&self, job: &Job) -> Result<ExecOutcome, ExecError> {
        let first = location(job, 0)?;
        let bucket = first.bucket();
        let mut keys = Vec::with_capacity(job.arguments.len());
        for index in 0..job.arguments.len() {
            let loc = location(job, index)?;
            if loc.bucket() != bucket {
                return Err(ExecError::InvalidArguments(format!(
                    "batch delete spans buckets {bucket} and {}",
                    loc.bucket()
                )));
            }
            keys.push(loc.key().to_string());
        }

        let outcomes = self.store.delete_many(bucket, &keys).await?;
        let mut messages = Vec::with_capacity(outcomes.len());
        let mut failed = 0;
        for outcome in &outcomes {
            match &outcome.error {
                None => messages.push(format!("Batch-delete s3://{bucket}/{}", outcome.key)),
                Some(error) => {
                    failed += 1;
                    tracing::warn!(bucket, key = %outcome.key, error = %error, "batch delete failed");
                }
            }
        }
        if failed > 0 {
            return Err(ExecError::PartialFailure {
                failed,
                total: outcomes.len(),
            });
        }
        Ok(ExecOutcome::messages(messages))
    }

    async fn list(&self, job: &Job) -> Result<ExecOutcome, ExecError> {
        let loc = location(job, 0)?;
        let human = job.options.has(OptionFlag::HumanReadable);
        let mut lines = Vec::new();

        if loc.is_wildcard() {
            let matcher = loc
                .matcher()
                .map_err(|e| ExecError::InvalidArguments(e.to_string()))?;
            let trim = dir_part(matcher.prefix());
            let listing = self.store.list(loc.bucket(), matcher.prefix(), false).await?;
            for object in listing.objects.iter().filter(|o| matcher.is_match(&o.key)) {
                let shown = object.key.strip_prefix(trim).unwrap_or(&object.key);
                lines.push(object_line(object, shown, human));
            }
        } else {
            let trim = dir_part(loc.key());
            let name = &loc.key()[trim.len()..];
            let listing = self.store.list(loc.bucket(), loc.key(), true).await?;
            for prefix in &listing.prefixes {
                lines.push(dir_line(prefix.strip_prefix(trim).unwrap_or(prefix)));
            }
            for object in &listing.objects {
                let shown = object.key.strip_prefix(trim).unwrap_or(&object.key);
                // "ls s3://b/key" must not list s3://b/keyword
                if !name.is_empty() && shown != name {
                    continue;
                }
                lines.push(object_line(object, shown, human));
            }
        }
        Ok(ExecOutcome::messages(lines))
    }

    async fn list_buckets(&self) -> Result<ExecOutcome, ExecError> {
        let lines = self
            .store
            .list_buckets()
            .await?
            .into_iter()
            .map(|b| format!("{}  s3://{}", format_date(&b.created), b.name))
            .collect();
        Ok(ExecOutcome::messages(lines))
    }

    async fn size(&self, job: &Job) -> Result<ExecOutcome, ExecError> {
        let loc = location(job, 0)?;
        let matcher = loc
            .matcher()
            .map_err(|e| ExecError::InvalidArguments(e.to_string()))?;
        let listing = self.store.list(loc.bucket(), matcher.prefix(), false).await?;

        let (count, total) = listing
            .objects
            .iter()
            .filter(|o| matcher.is_match(&o.key))
            .fold((0u64, 0u64), |(count, total), o| (count + 1, total + o.size));
        let size = if job.options.has(OptionFlag::HumanReadable) {
            format_size(total)
        } else {
            total.to_string()
        };
        Ok(ExecOutcome {
            bytes: 0,
            messages: vec![format!("{size} bytes in {count} objects: {loc}")],
            warning: None,
        })
    }

    async fn shell(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        let (program, args) = job
            .arguments
            .split_first()
            .ok_or_else(|| ExecError::InvalidArguments("no command given".into()))?;
        let args: Vec<String> = args.iter().map(|a| a.text.clone()).collect();
        let lines = self.shell.run(&program.text, &args, cancel).await?;
        Ok(ExecOutcome::messages(lines))
    }
}

#[async_trait]
impl<S: ObjectStore> JobExecutor for StandardExecutor<S> {
    async fn execute(&self, job: &Job, cancel: &CancellationToken) -> Result<ExecOutcome, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        match job.operation {
            Operation::Download => self.download(job, cancel).await,
            Operation::Upload => self.upload(job, cancel).await,
            Operation::Copy => self.copy(job, cancel).await,
            Operation::Delete => {
                self.store.delete(location(job, 0)?).await?;
                Ok(ExecOutcome::default())
            }
            Operation::BatchDeleteActual => self.delete_keys(job).await,
            Operation::List => self.list(job).await,
            Operation::ListBuckets => self.list_buckets().await,
            Operation::Size => self.size(job).await,
            Operation::LocalCopy => self.local_copy(job, cancel).await,
            Operation::LocalDelete => {
                self.local.delete(local_path(job, 0)?).await?;
                Ok(ExecOutcome::default())
            }
            Operation::ShellExec => self.shell(job, cancel).await,
            Operation::Abort => Err(ExecError::InvalidArguments(
                "exit is handled by the scheduler".into(),
            )),
            op => Err(ExecError::InvalidArguments(format!(
                "{op} must be expanded before execution"
            ))),
        }
    }
}

fn location(job: &Job, index: usize) -> Result<&Location, ExecError> {
    job.location(index).ok_or_else(|| {
        ExecError::InvalidArguments(format!("argument {} is not a storage location", index + 1))
    })
}

fn local_path(job: &Job, index: usize) -> Result<&Path, ExecError> {
    job.argument(index)
        .map(|a| Path::new(a.text.as_str()))
        .ok_or_else(|| ExecError::InvalidArguments(format!("missing argument {}", index + 1)))
}

/// Everything up to and including the last `/`.
fn dir_part(key: &str) -> &str {
    match key.rfind(KEY_SEPARATOR) {
        Some(i) => &key[..=i],
        None => "",
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn object_line(object: &ObjectInfo, shown: &str, human: bool) -> String {
    let size = if human {
        format_size(object.size)
    } else {
        object.size.to_string()
    };
    format!(
        "{:>19} {:>1}  {:>12}  {}",
        format_date(&object.modified),
        object.storage_class.short_code(),
        size,
        shown
    )
}

fn dir_line(shown: &str) -> String {
    format!("{:>19} {:>1}  {:>12}  {}", "", "", "DIR", shown)
}

#[cfg(test)]
#[path = "standard_tests.rs"]
mod tests;
