// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command table: keyword → operation + parameter kinds.
//!
//! Several specs may share a keyword; the parser tries them in table order
//! and picks the first one whose arguments all validate.

use crate::operation::{OptionFlag, Operation, Options};
use crate::param::ParameterKind;
use std::collections::BTreeMap;
use std::fmt;

/// One accepted signature of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub keyword: &'static str,
    pub operation: Operation,
    pub params: Vec<ParameterKind>,
    /// Options implied by the keyword itself (e.g. delete-source for `mv`)
    pub default_options: Options,
}

impl CommandSpec {
    pub fn new(keyword: &'static str, operation: Operation, params: &[ParameterKind]) -> Self {
        Self {
            keyword,
            operation,
            params: params.to_vec(),
            default_options: Options::NONE,
        }
    }

    pub fn with_option(mut self, flag: OptionFlag) -> Self {
        self.default_options.insert(flag);
        self
    }

    /// Whether the last declared kind is the one-or-more marker.
    pub fn is_variadic(&self) -> bool {
        self.params.last() == Some(&ParameterKind::UncheckedOneOrMore)
    }

    /// Minimum number of argument tokens.
    pub fn min_args(&self) -> usize {
        match self.params.last() {
            Some(ParameterKind::UncheckedOneOrMore) => self.params.len() - 1,
            Some(k) if k.is_optional() => self.params.len() - 1,
            _ => self.params.len(),
        }
    }

    /// Maximum number of argument tokens (`None` = unbounded).
    pub fn max_args(&self) -> Option<usize> {
        if self.is_variadic() {
            None
        } else {
            Some(self.params.len())
        }
    }

    pub fn accepts_arity(&self, n: usize) -> bool {
        n >= self.min_args() && self.max_args().map_or(true, |max| n <= max)
    }

    /// Usage line, e.g. `cp [-n] filename file-or-directory`.
    pub fn usage(&self) -> String {
        let mut s = self.keyword.to_string();
        for flag in self.operation.accepted_options() {
            if let Some(p) = flag.param() {
                s.push_str(&format!(" [{p}]"));
            }
        }
        for p in &self.params {
            s.push(' ');
            s.push_str(&p.to_string());
        }
        s
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.operation, self.keyword)?;
        for p in &self.params {
            write!(f, " [{p}]")?;
        }
        Ok(())
    }
}

/// Ordered, read-only list of command specs.
#[derive(Debug, Clone)]
pub struct CommandTable {
    specs: Vec<CommandSpec>,
}

impl CommandTable {
    pub fn new(specs: Vec<CommandSpec>) -> Self {
        Self { specs }
    }

    /// The built-in command set.
    pub fn standard() -> Self {
        use Operation as Op;
        use ParameterKind::*;

        let mv = OptionFlag::DeleteSource;
        let mut specs = vec![
            CommandSpec::new("exit", Op::Abort, &[]),
            CommandSpec::new("exit", Op::Abort, &[Unchecked]),
            CommandSpec::new("get", Op::Download, &[StorageSimpleObject, OptionalLocalFileOrDir]),
            CommandSpec::new("get", Op::BatchDownload, &[StorageWildcardObject, OptionalLocalDir]),
        ];

        // cp and mv share every signature; mv removes the source afterwards
        for (keyword, opts) in [("cp", Options::NONE), ("mv", Options::NONE.with(mv))] {
            let transfer: [(Operation, &[ParameterKind]); 10] = [
                (Op::LocalCopy, &[LocalFileObject, LocalFileOrDir]),
                (Op::BatchLocalCopy, &[Glob, LocalDir]),
                (Op::BatchLocalCopy, &[LocalDir, LocalDir]),
                (Op::Copy, &[StorageSimpleObject, StorageObjectOrDir]),
                (Op::BatchCopy, &[StorageWildcardObject, StorageDir]),
                (Op::Upload, &[LocalFileObject, StorageObjectOrDir]),
                (Op::BatchUpload, &[Glob, StorageDir]),
                (Op::BatchUpload, &[LocalDir, StorageDir]),
                (Op::Download, &[StorageSimpleObject, LocalFileOrDir]),
                (Op::BatchDownload, &[StorageWildcardObject, LocalDir]),
            ];
            for (op, params) in transfer {
                let mut spec = CommandSpec::new(keyword, op, params);
                spec.default_options = opts;
                specs.push(spec);
            }
        }

        specs.extend([
            CommandSpec::new("rm", Op::LocalDelete, &[LocalFileObject]),
            CommandSpec::new("rm", Op::Delete, &[StorageSimpleObject]),
            CommandSpec::new("rm", Op::BatchDelete, &[StorageWildcardObject]),
            CommandSpec::new("batch-rm", Op::BatchDeleteActual, &[StorageObject, UncheckedOneOrMore]),
            CommandSpec::new("ls", Op::ListBuckets, &[]),
            CommandSpec::new("ls", Op::List, &[StorageObjectOrDir]),
            CommandSpec::new("ls", Op::List, &[StorageWildcardObject]),
            CommandSpec::new("du", Op::Size, &[StorageObjectOrDir]),
            CommandSpec::new("du", Op::Size, &[StorageWildcardObject]),
            CommandSpec::new("!", Op::ShellExec, &[UncheckedOneOrMore]),
        ]);

        Self::new(specs)
    }

    pub fn specs(&self) -> &[CommandSpec] {
        &self.specs
    }

    /// Specs registered under `keyword`, in table order.
    pub fn candidates<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a CommandSpec> {
        self.specs.iter().filter(move |s| s.keyword == keyword)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.specs.iter().any(|s| s.keyword == keyword)
    }

    /// Distinct keywords, sorted.
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut kws: Vec<_> = self.specs.iter().map(|s| s.keyword).collect();
        kws.sort_unstable();
        kws.dedup();
        kws
    }

    /// Usage text grouped by operation description.
    pub fn help(&self, filter: Option<&str>) -> String {
        let mut groups: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for spec in &self.specs {
            if filter.is_some_and(|f| f != spec.keyword) {
                continue;
            }
            let usage = match spec.operation {
                Operation::Abort => "exit [exit code]".to_string(),
                Operation::ShellExec => "! command [parameters...]".to_string(),
                _ => spec.usage(),
            };
            let entry = groups
                .entry(spec.operation.describe(spec.default_options))
                .or_default();
            if !entry.contains(&usage) {
                entry.push(usage);
            }
        }

        let mut out = String::new();
        for (desc, usages) in groups {
            out.push_str(&format!("  {desc}\n"));
            for u in usages {
                out.push_str(&format!("        {u}\n"));
            }
        }
        out
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
