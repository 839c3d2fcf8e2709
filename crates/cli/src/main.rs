// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xf - parallel bulk transfers between local files and object storage

mod env;
mod input;
mod output;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use input::Feeder;
use output::{OutputFormat, Reporter};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use xf_adapters::{
    DirectoryStore, StandardExecutor, StandardExpander, TracedExecutor, TracedExpander,
};
use xf_core::CommandTable;
use xf_engine::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRIES, DEFAULT_WORKERS};
use xf_engine::{PoolConfig, WorkerPool};
use xf_grammar::JobParser;

/// Exit code when any job or input line failed.
const EXIT_FAILURE: i32 = 127;
/// Exit code after an interrupt.
const EXIT_INTERRUPTED: i32 = 130;
/// Exit code for usage errors.
const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "xf",
    version,
    about = "Parallel bulk transfers between local files and object storage",
    override_usage = "xf [OPTIONS] -f <FILE>\n       xf [OPTIONS] <COMMAND>..."
)]
struct Cli {
    /// Read job descriptions from FILE, one per line (`-` for stdin)
    #[arg(short = 'f', value_name = "FILE")]
    file: Option<String>,

    /// Worker count; negative means that many per CPU [env: XF_NUMWORKERS]
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    numworkers: Option<i64>,

    /// Retries for retryable failures
    #[arg(
        short = 'r',
        long,
        value_name = "N",
        default_value_t = DEFAULT_RETRIES,
        allow_negative_numbers = true
    )]
    retries: i64,

    /// Jobs queued ahead of the workers before input blocks
    #[arg(long, value_name = "N", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Directory holding one sub-directory per bucket [env: XF_STORAGE_ROOT]
    #[arg(long, value_name = "DIR")]
    storage_root: Option<PathBuf>,

    /// Print statistics when done
    #[arg(long)]
    stats: bool,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t)]
    output: OutputFormat,

    /// Debug logging, and report cancelled jobs
    #[arg(short = 'v', long)]
    verbose: bool,

    /// A single job description, e.g. `cp s3://bucket/key ./`
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

fn cli_command() -> clap::Command {
    Cli::command().after_help(format!(
        "Commands:\n{}",
        CommandTable::standard().help(None).trim_end()
    ))
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("-ERR {}", format_error(&e));
            std::process::exit(EXIT_USAGE);
        }
    }
}

/// Format an anyhow error, skipping causes already present in the message.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }
    let causes: Vec<String> = err.chain().skip(1).map(|c| c.to_string()).collect();
    format!("{top}: {}", causes.join(": "))
}

fn init_tracing(verbose: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

/// Process exit code: an explicit `exit N` wins, then an interrupt, then
/// any failure nothing recovered from.
fn exit_code(explicit: Option<i32>, interrupted: bool, failures: u64) -> i32 {
    match explicit {
        Some(code) => code,
        None if interrupted => EXIT_INTERRUPTED,
        None if failures > 0 => EXIT_FAILURE,
        None => 0,
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::from_arg_matches(&cli_command().get_matches())?;

    if cli.file.is_none() && cli.command.is_empty() {
        eprintln!("{}", cli_command().render_help());
        return Ok(EXIT_USAGE);
    }
    if cli.file.is_some() && !cli.command.is_empty() {
        bail!("-f cannot be combined with a command");
    }
    init_tracing(cli.verbose);

    let workers = cli
        .numworkers
        .or_else(xf_engine::env::numworkers)
        .unwrap_or(DEFAULT_WORKERS);
    let config = PoolConfig::new(workers, cli.retries)?.with_queue_capacity(cli.queue_capacity);
    let root = cli.storage_root.clone().unwrap_or_else(env::storage_root);
    tracing::debug!(root = %root.display(), "using storage root");

    let store = DirectoryStore::new(root);
    let executor = TracedExecutor::new(StandardExecutor::new(store.clone()));
    let expander = TracedExpander::new(StandardExpander::new(store));
    let reporter = Reporter::new(cli.output, cli.verbose);

    let (results_tx, results_rx) = mpsc::channel(config.queue_capacity);
    let printer = tokio::spawn(reporter.drain(results_rx));
    let file_mode = cli.file.is_some();
    if file_mode {
        eprintln!("# Using {} workers", config.workers);
    }
    let pool = WorkerPool::start(config, executor, expander, results_tx)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        let cancel = pool.cancel_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("# Got signal, cleaning up...");
                interrupted.store(true, Ordering::SeqCst);
                cancel.cancel();
            }
        });
    }

    let parser = JobParser::new(CommandTable::standard());
    let feeder = Feeder::new(&parser, &pool, reporter);
    match cli.file.as_deref() {
        Some("-") => {
            feeder.submit_lines(BufReader::new(tokio::io::stdin())).await?;
        }
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {path}"))?;
            feeder.submit_lines(BufReader::new(file)).await?;
        }
        None => {
            feeder.submit_line(&cli.command.join(" ")).await?;
        }
    }

    pool.wait().await;
    let explicit = pool.exit_code();
    let unhandled = pool.unhandled_failures();
    let stats = pool.stats();
    pool.join().await;
    // every result sender is gone once the pool has stopped
    let _ = printer.await;

    let snapshot = stats.snapshot();
    let code = exit_code(
        explicit,
        interrupted.load(Ordering::SeqCst),
        unhandled + snapshot.parse_failures,
    );
    if file_mode {
        eprintln!("# Exiting with code {code}");
    }
    if file_mode || cli.stats {
        for line in output::stats_lines(&snapshot) {
            eprintln!("{line}");
        }
    }
    Ok(code)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
