// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result reporting: `+OK` / `-ERR` text lines or one JSON object per job.

use clap::ValueEnum;
use std::io::Write;
use tokio::sync::mpsc;
use xf_core::{format_elapsed_ms, JobResult, JobStatus, StatsSnapshot, SubJobSummary};
use xf_grammar::ParseError;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

/// Prefix of lines printed on behalf of a job (sub-jobs, listing output).
const DETAIL_INDENT: &str = "                   ";

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders job results and parse errors to stdout.
#[derive(Clone, Copy, Debug)]
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Lines for one finished job.
    pub fn render(&self, result: &JobResult) -> Vec<String> {
        match self.format {
            OutputFormat::Text => self.render_text(result),
            OutputFormat::Json => match serde_json::to_string(result) {
                Ok(line) => vec![line],
                Err(e) => {
                    tracing::error!(job = %result.job, error = %e, "could not serialize result");
                    Vec::new()
                }
            },
        }
    }

    fn render_text(&self, result: &JobResult) -> Vec<String> {
        let mut lines: Vec<String> = result
            .messages
            .iter()
            .map(|m| format!("{DETAIL_INDENT} + {m}"))
            .collect();
        let job = &result.job;
        let error = result.error.as_deref().map(clean_error).unwrap_or_default();

        let status_line = match result.status {
            JobStatus::Cancelled if !self.verbose => None,
            JobStatus::Cancelled => Some(format!(r#"-ERR "{job}": cancelled"#)),
            _ if result.is_sub_job => match result.status {
                JobStatus::Succeeded if result.operation.is_internal() => None,
                JobStatus::Succeeded => Some(format!(r#"{DETAIL_INDENT} + "{job}""#)),
                JobStatus::Warning => Some(format!(r#"{DETAIL_INDENT} ? "{job}": {error}"#)),
                _ => Some(format!(r#"{DETAIL_INDENT} - "{job}": {error}"#)),
            },
            JobStatus::Succeeded if result.operation.is_internal() => None,
            JobStatus::Succeeded | JobStatus::Failed
                if result.sub_jobs.is_some() && result.error.is_none() =>
            {
                let counts = result.sub_jobs.map(|s| counts(&s)).unwrap_or_default();
                Some(format!(r#"+OK "{job}"{counts}"#))
            }
            JobStatus::Succeeded => Some(format!(r#"+OK "{job}""#)),
            JobStatus::Warning => Some(format!(r#"+OK? "{job}": {error}"#)),
            JobStatus::Failed => Some(format!(r#"-ERR "{job}": {error}"#)),
        };
        lines.extend(status_line);
        lines
    }

    /// Line for an input line that did not parse.
    pub fn render_parse_error(&self, line: &str, error: &ParseError) -> String {
        match self.format {
            OutputFormat::Text => format!(r#"-ERR "{line}": {}"#, clean_error(&error.to_string())),
            OutputFormat::Json => serde_json::json!({
                "source_description": line,
                "status": JobStatus::Failed,
                "error": error.to_string(),
                "parse_error": true,
            })
            .to_string(),
        }
    }

    pub fn print(&self, result: &JobResult) {
        write_lines(&self.render(result));
    }

    pub fn print_parse_error(&self, line: &str, error: &ParseError) {
        write_lines(&[self.render_parse_error(line, error)]);
    }

    /// Print results until every sender is gone.
    pub async fn drain(self, mut rx: mpsc::Receiver<JobResult>) {
        while let Some(result) = rx.recv().await {
            self.print(&result);
        }
    }
}

fn write_lines(lines: &[String]) {
    let mut out = std::io::stdout().lock();
    for line in lines {
        // a closed stdout (e.g. `xf ... | head`) is not worth failing the run
        let _ = writeln!(out, "{line}");
    }
}

/// ` (N)`, ` (N, M failed)`, ` (M failed)` or nothing.
fn counts(summary: &SubJobSummary) -> String {
    match (summary.succeeded, summary.failed) {
        (0, 0) => String::new(),
        (ok, 0) => format!(" ({ok})"),
        (0, failed) => format!(" ({failed} failed)"),
        (ok, failed) => format!(" ({ok}, {failed} failed)"),
    }
}

/// Flatten an error message onto one line.
pub fn clean_error(message: &str) -> String {
    let mut s = message.replace(['\n', '\t'], " ");
    while s.contains("  ") {
        s = s.replace("  ", " ");
    }
    s.trim().to_string()
}

/// `# Stats:` summary lines; zero counters are skipped.
pub fn stats_lines(snapshot: &StatsSnapshot) -> Vec<String> {
    let secs = match snapshot.elapsed_ms {
        0 => 1.0,
        ms => ms as f64 / 1000.0,
    };
    let line = |name: &str, count: u64, extra: &str| {
        let ops = (count as f64 / secs).round() as u64;
        format!("# Stats: {name:<7} {count:>10} {ops:>4} ops/sec{extra}")
    };

    let mut lines: Vec<String> = snapshot
        .active()
        .filter(|op| op.success > 0)
        .map(|op| line(&op.operation.to_string(), op.success, ""))
        .collect();
    if snapshot.retries > 0 {
        lines.push(line("Retried", snapshot.retries, ""));
    }
    let failed = snapshot.total_failures();
    if failed > 0 {
        lines.push(line("Failed", failed, ""));
    }
    let total = snapshot.total_success() + failed;
    if total > 0 {
        let elapsed = format!(" {}", format_elapsed_ms(snapshot.elapsed_ms));
        lines.push(line("Total", total, &elapsed));
    }
    lines
}
