// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-size worker pool.
//!
//! Workers pull jobs from one bounded FIFO queue. Concrete jobs run through
//! the executor with retry; batch jobs are handed to an expansion task that
//! feeds sub-jobs back into the same queue. Continuations are re-submitted
//! from detached tasks so a worker never waits on its own queue.
//!
//! A failure only counts against the run when nothing recovers from it: a
//! failed job with an `||` continuation is settled by that continuation.

use crate::config::PoolConfig;
use crate::error::EngineError;
use crate::group::BatchGroup;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use xf_adapters::{ExecError, ExecOutcome, ExpandError, Expander, JobExecutor};
use xf_core::{Job, JobResult, JobStatus, Operation, Stats};

/// Exit code recorded by `exit` when its argument is not a valid code.
pub const INVALID_EXIT_CODE: i32 = 255;

/// A job waiting in the queue, with the batch it belongs to if any.
struct Queued {
    job: Job,
    group: Option<Arc<BatchGroup>>,
    /// Runs because an earlier job failed
    recovers: bool,
}

struct Shared<E, X> {
    executor: E,
    expander: X,
    config: PoolConfig,
    stats: Arc<Stats>,
    results: mpsc::Sender<JobResult>,
    cancel: CancellationToken,
    /// Stops the workers once the pool is joined
    shutdown: CancellationToken,
    queue_tx: mpsc::Sender<Queued>,
    queue_rx: tokio::sync::Mutex<mpsc::Receiver<Queued>>,
    /// Queued + running + expanding
    outstanding: AtomicUsize,
    idle_workers: AtomicUsize,
    /// Failures no continuation recovered from
    unhandled: AtomicU64,
    quiescent: Notify,
    exit_code: Mutex<Option<i32>>,
}

/// Runs jobs on a fixed number of tokio tasks.
pub struct WorkerPool<E, X> {
    shared: Arc<Shared<E, X>>,
    workers: Vec<JoinHandle<()>>,
}

impl<E: JobExecutor, X: Expander> WorkerPool<E, X> {
    /// Start the workers; every finished job is reported on `results`.
    pub fn start(
        config: PoolConfig,
        executor: E,
        expander: X,
        results: mpsc::Sender<JobResult>,
    ) -> Result<Self, EngineError> {
        Self::with_cancel(config, executor, expander, results, CancellationToken::new())
    }

    /// Like [`WorkerPool::start`], sharing an externally owned cancel token.
    pub fn with_cancel(
        config: PoolConfig,
        executor: E,
        expander: X,
        results: mpsc::Sender<JobResult>,
        cancel: CancellationToken,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity);
        let workers = config.workers;
        let shared = Arc::new(Shared {
            executor,
            expander,
            config,
            stats: Arc::new(Stats::new()),
            results,
            cancel,
            shutdown: CancellationToken::new(),
            queue_tx,
            queue_rx: tokio::sync::Mutex::new(queue_rx),
            outstanding: AtomicUsize::new(0),
            idle_workers: AtomicUsize::new(workers),
            unhandled: AtomicU64::new(0),
            quiescent: Notify::new(),
            exit_code: Mutex::new(None),
        });

        let workers = (0..workers)
            .map(|id| tokio::spawn(worker_loop(Arc::clone(&shared), id)))
            .collect();
        tracing::info!(
            workers = shared.config.workers,
            retries = shared.config.retries,
            "pool started"
        );
        Ok(Self { shared, workers })
    }

    /// Queue a job, waiting while the queue is full.
    pub async fn submit(&self, job: Job) -> Result<(), EngineError> {
        self.shared
            .enqueue(Queued {
                job,
                group: None,
                recovers: false,
            })
            .await
    }

    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.shared.stats)
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.shared.cancel.clone()
    }

    /// Stop scheduling: running jobs are asked to abort and queued jobs are
    /// reported as cancelled.
    pub fn cancel(&self) {
        self.shared.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Code requested by an `exit` job, if one ran.
    pub fn exit_code(&self) -> Option<i32> {
        *self.shared.exit_code.lock()
    }

    /// Failed jobs (batch parents included, sub-jobs not) that no `||`
    /// continuation recovered from. A cancelled recovery leaves the failure
    /// standing.
    pub fn unhandled_failures(&self) -> u64 {
        self.shared.unhandled.load(Ordering::SeqCst)
    }

    pub fn outstanding(&self) -> usize {
        self.shared.outstanding.load(Ordering::SeqCst)
    }

    pub fn idle_workers(&self) -> usize {
        self.shared.idle_workers.load(Ordering::SeqCst)
    }

    /// Wait until every submitted job (with its continuations and sub-jobs)
    /// has finished. Call after the last `submit`.
    pub async fn wait(&self) {
        loop {
            let notified = self.shared.quiescent.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.shared.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait for quiescence, then stop the workers.
    pub async fn join(self) {
        self.wait().await;
        self.shared.shutdown.cancel();
        for worker in self.workers {
            let _ = worker.await;
        }
        tracing::debug!("pool stopped");
    }
}

async fn worker_loop<E: JobExecutor, X: Expander>(shared: Arc<Shared<E, X>>, id: usize) {
    loop {
        let next = {
            let mut rx = shared.queue_rx.lock().await;
            tokio::select! {
                _ = shared.shutdown.cancelled() => None,
                item = rx.recv() => item,
            }
        };
        let Some(item) = next else {
            break;
        };
        shared.idle_workers.fetch_sub(1, Ordering::SeqCst);
        Arc::clone(&shared).process(item).await;
        shared.idle_workers.fetch_add(1, Ordering::SeqCst);
    }
    tracing::trace!(worker = id, "worker exiting");
}

impl<E: JobExecutor, X: Expander> Shared<E, X> {
    async fn enqueue(&self, item: Queued) -> Result<(), EngineError> {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        if self.queue_tx.send(item).await.is_err() {
            self.release();
            return Err(EngineError::QueueClosed);
        }
        Ok(())
    }

    /// One unit of outstanding work is done.
    fn release(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.quiescent.notify_waiters();
        }
    }

    async fn process(self: Arc<Self>, item: Queued) {
        let Queued {
            job,
            group,
            recovers,
        } = item;

        if self.cancel.is_cancelled() {
            let result = JobResult::new(&job, JobStatus::Cancelled).with_error("cancelled");
            self.finish(&job, group, recovers, result).await;
            return;
        }

        match job.operation {
            Operation::Abort => self.abort(job, group, recovers).await,
            op if op.is_batch() => self.start_batch(job, recovers),
            _ => self.run(job, group, recovers).await,
        }
    }

    async fn run(&self, job: Job, group: Option<Arc<BatchGroup>>, recovers: bool) {
        self.stats.record_start(job.operation);
        let (outcome, attempts) = self.execute_with_retry(&job).await;
        let result = match outcome {
            Ok(ExecOutcome {
                messages, warning, ..
            }) => {
                let status = if warning.is_some() {
                    JobStatus::Warning
                } else {
                    JobStatus::Succeeded
                };
                let mut result = JobResult::new(&job, status).with_messages(messages);
                if let Some(warning) = warning {
                    result = result.with_error(warning);
                }
                result
            }
            Err(ExecError::Cancelled) => JobResult::new(&job, JobStatus::Cancelled).with_error("cancelled"),
            Err(e) => JobResult::new(&job, JobStatus::Failed).with_error(e.to_string()),
        };
        let result = result.with_attempts(attempts);
        match result.status {
            JobStatus::Succeeded | JobStatus::Warning => self.stats.record_success(job.operation),
            JobStatus::Failed => self.stats.record_failure(job.operation),
            JobStatus::Cancelled => {}
        }
        self.finish(&job, group, recovers, result).await;
    }

    async fn execute_with_retry(&self, job: &Job) -> (Result<ExecOutcome, ExecError>, u32) {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self.executor.execute(job, &self.cancel).await;
            match result {
                Err(e) if e.is_retryable() && attempt <= self.config.retries => {
                    let delay = self.config.backoff(attempt);
                    self.stats.record_retry();
                    tracing::warn!(
                        job = %job,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying"
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => return (Err(ExecError::Cancelled), attempt),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                other => return (other, attempt),
            }
        }
    }

    /// `exit [code]`: record the code, then cancel everything else.
    async fn abort(&self, job: Job, group: Option<Arc<BatchGroup>>, recovers: bool) {
        self.stats.record_start(job.operation);
        let code = exit_code_of(&job);
        if let Some(code) = code {
            self.exit_code.lock().get_or_insert(code);
        }
        tracing::info!(job = %job, code = ?code, "exit requested");
        self.stats.record_success(job.operation);
        let result = JobResult::new(&job, JobStatus::Succeeded).with_attempts(1);
        self.cancel.cancel();
        self.finish(&job, group, recovers, result).await;
    }

    /// Report a finished concrete job and route its outcome.
    async fn finish(
        &self,
        job: &Job,
        group: Option<Arc<BatchGroup>>,
        recovers: bool,
        mut result: JobResult,
    ) {
        let status = result.status;
        if status != JobStatus::Cancelled {
            job.record(status.is_success());
        }
        if group.is_some() {
            result = result.as_sub_job();
        }
        let _ = self.results.send(result).await;

        match group {
            Some(group) => {
                if group.sub_job_done(status) {
                    self.complete_batch(&group).await;
                }
            }
            None => self.settle(job, status, recovers),
        }
        self.release();
    }

    /// Route a finished top-level job: queue its continuation, and count a
    /// failure that nothing will recover from.
    fn settle(&self, job: &Job, status: JobStatus, recovers: bool) {
        let unhandled = match status {
            // the failure this job was recovering from still stands
            JobStatus::Cancelled => recovers,
            JobStatus::Failed => !self.schedule_continuation(job, false),
            JobStatus::Succeeded | JobStatus::Warning => {
                self.schedule_continuation(job, true);
                false
            }
        };
        if unhandled {
            self.unhandled.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(job = %job, %status, "unhandled failure");
        }
    }

    /// Queue the continuation for this outcome from a detached task.
    /// Returns whether one was queued.
    fn schedule_continuation(&self, job: &Job, succeeded: bool) -> bool {
        let Some(next) = job.continuation(succeeded).cloned() else {
            return false;
        };
        if self.cancel.is_cancelled() {
            return false;
        }
        tracing::debug!(job = %job, next = %next, succeeded, "scheduling continuation");
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let tx = self.queue_tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the pool; a closed queue means
            // shutdown and the count no longer matters.
            let queued = Queued {
                job: next,
                group: None,
                recovers: !succeeded,
            };
            let _ = tx.send(queued).await;
        });
        true
    }

    /// Hand a batch job to an expansion task outside the worker slots.
    fn start_batch(self: Arc<Self>, job: Job, recovers: bool) {
        self.stats.record_start(job.operation);
        let group = Arc::new(BatchGroup::new(job).recovering(recovers));
        tokio::spawn(async move { self.expand(group).await });
    }

    async fn expand(self: Arc<Self>, group: Arc<BatchGroup>) {
        let parent = group.parent().clone();
        let (tx, mut rx) = mpsc::channel(self.config.queue_capacity);
        let listing = {
            let expander = self.expander.clone();
            let cancel = self.cancel.clone();
            let job = parent.clone();
            tokio::spawn(async move { expander.expand(&job, &tx, &cancel).await })
        };

        while let Some(item) = rx.recv().await {
            match item {
                Ok(spec) => {
                    let sub = parent.make_sub_job(spec.operation, spec.arguments);
                    group.add_sub_job();
                    let queued = Queued {
                        job: sub,
                        group: Some(Arc::clone(&group)),
                        recovers: false,
                    };
                    if let Err(e) = self.enqueue(queued).await {
                        tracing::error!(job = %parent, error = %e, "could not queue sub-job");
                        group.sub_job_done(JobStatus::Failed);
                    }
                }
                Err(e) => self.entry_failed(&group, e).await,
            }
        }

        let outcome = match listing.await {
            Ok(outcome) => outcome,
            Err(e) => Err(ExpandError::Listing(format!("expansion task failed: {e}"))),
        };
        if let Err(ref e) = outcome {
            tracing::warn!(job = %parent, error = %e, "expansion failed");
        }
        if group.listing_done(outcome.err()) {
            self.complete_batch(&group).await;
        }
    }

    /// A single match could not become a sub-job.
    async fn entry_failed(&self, group: &BatchGroup, error: ExpandError) {
        let parent = group.parent();
        group.entry_failed();
        parent.record(false);
        let result = JobResult::new(parent, JobStatus::Failed)
            .with_error(error.to_string())
            .as_sub_job();
        let _ = self.results.send(result).await;
    }

    /// Every sub-job and the listing are done: report the parent once.
    async fn complete_batch(&self, group: &BatchGroup) {
        let parent = group.parent();
        let summary = group.summary();
        let listing_error = group.listing_error();

        let status = match &listing_error {
            Some(ExpandError::Cancelled) => JobStatus::Cancelled,
            Some(_) => JobStatus::Failed,
            None if summary.failed > 0 => JobStatus::Failed,
            None if self.cancel.is_cancelled() && group.had_cancelled() => JobStatus::Cancelled,
            None => JobStatus::Succeeded,
        };
        // Sub-job failures show in the summary; only a failed listing
        // carries an error of its own.
        let mut result = JobResult::new(parent, status).with_sub_jobs(summary);
        if let Some(e) = &listing_error {
            result = result.with_error(e.to_string());
        }
        match status {
            JobStatus::Succeeded => self.stats.record_success(parent.operation),
            JobStatus::Failed => self.stats.record_failure(parent.operation),
            _ => {}
        }
        tracing::info!(
            job = %parent,
            %status,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch finished"
        );
        let _ = self.results.send(result).await;

        self.settle(parent, status, group.recovers());
        self.release();
    }
}

/// Exit code requested by an `exit` job.
///
/// No argument (or a negative one) keeps the default; an argument that is
/// not a small integer maps to [`INVALID_EXIT_CODE`].
pub fn exit_code_of(job: &Job) -> Option<i32> {
    let arg = job.argument(0)?;
    match arg.text.parse::<i8>() {
        Ok(code) if code >= 0 => Some(i32::from(code)),
        Ok(_) => None,
        Err(_) => Some(INVALID_EXIT_CODE),
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
