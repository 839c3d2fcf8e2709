// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::output::OutputFormat;
use tokio::sync::mpsc;
use xf_adapters::{FakeExecutor, FakeExpander};
use xf_core::{CommandTable, JobResult};
use xf_engine::PoolConfig;

fn pool() -> (
    WorkerPool<FakeExecutor, FakeExpander>,
    FakeExecutor,
    mpsc::Receiver<JobResult>,
) {
    let exec = FakeExecutor::new();
    let (tx, rx) = mpsc::channel(256);
    let config = PoolConfig {
        workers: 2,
        ..PoolConfig::default()
    };
    let pool = WorkerPool::start(config, exec.clone(), FakeExpander::new(), tx).unwrap();
    (pool, exec, rx)
}

fn reporter() -> Reporter {
    Reporter::new(OutputFormat::Text, false)
}

#[tokio::test]
async fn lines_are_parsed_and_queued() {
    let (pool, exec, _rx) = pool();
    let parser = JobParser::new(CommandTable::standard());
    let feeder = Feeder::new(&parser, &pool, reporter());
    let input: &[u8] = b"rm s3://b/one\n\n# just a comment\nfrob x\nls s3://b/dir/ && rm s3://b/two\n";

    let queued = feeder.submit_lines(input).await.unwrap();
    pool.wait().await;

    assert_eq!(queued, 2);
    assert_eq!(pool.stats().snapshot().parse_failures, 1);
    assert_eq!(exec.call_count("rm s3://b/one"), 1);
    assert_eq!(exec.call_count("ls s3://b/dir/"), 1);
    assert_eq!(exec.call_count("rm s3://b/two"), 1);
    pool.join().await;
}

#[tokio::test]
async fn reading_stops_after_cancellation() {
    let (pool, exec, _rx) = pool();
    let parser = JobParser::new(CommandTable::standard());
    let feeder = Feeder::new(&parser, &pool, reporter());
    pool.cancel();

    let input: &[u8] = b"rm s3://b/one\nrm s3://b/two\n";
    let queued = feeder.submit_lines(input).await.unwrap();
    pool.wait().await;

    assert_eq!(queued, 0);
    assert!(exec.calls().is_empty());
    pool.join().await;
}

#[tokio::test]
async fn single_line_reports_parse_failure() {
    let (pool, _exec, _rx) = pool();
    let parser = JobParser::new(CommandTable::standard());
    let feeder = Feeder::new(&parser, &pool, reporter());

    assert!(!feeder.submit_line("cp onlyone").await.unwrap());
    assert!(!feeder.submit_line("   ").await.unwrap());
    assert_eq!(pool.stats().snapshot().parse_failures, 1);
    pool.join().await;
}
