// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job description parser.
//!
//! A job description is one line: a command keyword, optional `-flag`
//! options and arguments, optionally chained with one success (`&&`) and/or
//! one failure (`||`) continuation. Chains are exactly one level deep.

use crate::parse_error::ParseError;
use crate::validate::{validate, ValidationError};
use regex::Regex;
use std::sync::LazyLock;
use xf_core::{CommandSpec, CommandTable, Job, JobArgument, Options, ParameterKind};

// cmd && success-cmd || fail-cmd
#[allow(clippy::expect_used)]
static CHAIN_AND_OR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*&&\s*(.+?)\s*\|\|\s*(.+?)\s*$").expect("constant regex pattern is valid")
});

// cmd && success-cmd
#[allow(clippy::expect_used)]
static CHAIN_AND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*&&\s*(.+?)\s*$").expect("constant regex pattern is valid")
});

// cmd || fail-cmd
#[allow(clippy::expect_used)]
static CHAIN_OR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*\|\|\s*(.+?)\s*$").expect("constant regex pattern is valid")
});

/// Parser bound to a command table.
#[derive(Debug, Clone, Default)]
pub struct JobParser {
    table: CommandTable,
}

impl JobParser {
    pub fn new(table: CommandTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// See [`parse_job_description`].
    pub fn parse(&self, line: &str) -> Result<Option<Job>, ParseError> {
        parse_job_description(line, &self.table)
    }
}

/// Strip a trailing ` #` comment, trim, and collapse runs of spaces.
pub fn preprocess(line: &str) -> String {
    let line = line.split(" #").next().unwrap_or_default();
    line.trim()
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The primary segment and the optional success/failure segments.
fn split_chain(desc: &str) -> (&str, Option<&str>, Option<&str>) {
    if let Some(c) = CHAIN_AND_OR.captures(desc) {
        let seg = |i| c.get(i).map_or("", |m| m.as_str());
        return (seg(1), Some(seg(2)), Some(seg(3)));
    }
    if let Some(c) = CHAIN_AND.captures(desc) {
        let seg = |i| c.get(i).map_or("", |m| m.as_str());
        return (seg(1), Some(seg(2)), None);
    }
    if let Some(c) = CHAIN_OR.captures(desc) {
        let seg = |i| c.get(i).map_or("", |m| m.as_str());
        return (seg(1), None, Some(seg(2)));
    }
    (desc, None, None)
}

/// Parse one input line into a job with its continuations.
///
/// Blank lines and comments yield `Ok(None)`.
pub fn parse_job_description(line: &str, table: &CommandTable) -> Result<Option<Job>, ParseError> {
    let desc = preprocess(line);
    if desc.is_empty() || desc.starts_with('#') {
        return Ok(None);
    }

    let (primary, on_success, on_failure) = split_chain(&desc);
    let Some(mut job) = parse_single_job(primary, table)? else {
        return Ok(None);
    };

    if let Some(seg) = on_success {
        job.on_success = Some(Box::new(parse_continuation(seg, table)?));
    }
    if let Some(seg) = on_failure {
        job.on_failure = Some(Box::new(parse_continuation(seg, table)?));
    }
    Ok(Some(job))
}

fn parse_continuation(segment: &str, table: &CommandTable) -> Result<Job, ParseError> {
    parse_single_job(segment, table)?.ok_or_else(|| ParseError::EmptyContinuation(segment.to_string()))
}

/// Parse a single, unchained job.
///
/// Candidate specs for the keyword are tried in table order; the first whose
/// arity fits and whose arguments all validate wins.
pub fn parse_single_job(segment: &str, table: &CommandTable) -> Result<Option<Job>, ParseError> {
    if segment.is_empty() || segment.starts_with('#') {
        return Ok(None);
    }
    if segment.contains("&&") || segment.contains("||") {
        return Err(ParseError::NestedCommand);
    }

    let parts: Vec<&str> = segment.split(' ').collect();
    let (keyword, rest) = match parts.split_first() {
        Some((k, rest)) => (*k, rest),
        None => return Ok(None),
    };

    let mut known = false;
    let mut last_error: Option<ValidationError> = None;

    for spec in table.candidates(keyword) {
        known = true;
        let (options, tokens) = take_options(spec, rest);

        if !spec.accepts_arity(tokens.len()) {
            tracing::trace!(keyword, candidate = %spec, supplied = tokens.len(), "arity mismatch");
            continue;
        }

        match bind_arguments(spec, tokens) {
            Ok(arguments) => {
                tracing::debug!(keyword, candidate = %spec, "matched command");
                let job = Job::new(keyword, spec.operation, options, arguments).with_source(segment);
                return Ok(Some(job));
            }
            Err(e) => {
                tracing::debug!(keyword, candidate = %spec, error = %e, "candidate rejected");
                last_error = Some(e);
            }
        }
    }

    if known {
        Err(ParseError::InvalidParameters {
            keyword: keyword.to_string(),
            last_error,
        })
    } else {
        Err(ParseError::UnknownCommand(keyword.to_string()))
    }
}

/// Consume leading option tokens the candidate's operation accepts.
///
/// Option parsing stops at the first token that does not start with `-` or
/// is not an accepted spelling; that token starts the arguments.
fn take_options<'a, 'b>(spec: &CommandSpec, tokens: &'a [&'b str]) -> (Options, &'a [&'b str]) {
    let accepted = spec.operation.accepted_options();
    let mut options = spec.default_options;
    let mut consumed = 0;

    for token in tokens {
        if !token.starts_with('-') {
            break;
        }
        match accepted.iter().find(|f| f.param() == Some(*token)) {
            Some(flag) => {
                options.insert(*flag);
                consumed += 1;
            }
            None => break,
        }
    }
    (options, &tokens[consumed..])
}

/// Validate tokens against the command's parameter kinds.
///
/// Fixed kinds are checked left to right; for a variadic command the remaining
/// tokens are checked against the last fixed kind (verbatim when the command
/// has none).
fn bind_arguments(spec: &CommandSpec, tokens: &[&str]) -> Result<Vec<JobArgument>, ValidationError> {
    let fixed: &[ParameterKind] = if spec.is_variadic() {
        &spec.params[..spec.params.len() - 1]
    } else {
        &spec.params
    };

    let mut arguments = Vec::with_capacity(tokens.len().max(fixed.len()));
    let mut reference: Option<JobArgument> = None;

    for (i, kind) in fixed.iter().enumerate() {
        let token = tokens.get(i).copied().unwrap_or_default();
        let arg = validate(token, *kind, reference.as_ref())?;
        if kind.is_reference() && reference.is_none() {
            reference = Some(arg.clone());
        }
        arguments.push(arg);
    }

    if spec.is_variadic() {
        let kind = fixed.last().copied().unwrap_or(ParameterKind::UncheckedOneOrMore);
        for token in tokens.iter().skip(fixed.len()) {
            arguments.push(validate(token, kind, reference.as_ref())?);
        }
    }

    Ok(arguments)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
