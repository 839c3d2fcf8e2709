// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn indices_follow_declaration_order() {
    for (i, op) in Operation::ALL.iter().enumerate() {
        assert_eq!(op.index(), i, "{op}");
    }
}

#[yare::parameterized(
    batch_download   = { Operation::BatchDownload, true },
    batch_upload     = { Operation::BatchUpload, true },
    batch_copy       = { Operation::BatchCopy, true },
    batch_delete     = { Operation::BatchDelete, true },
    batch_local_copy = { Operation::BatchLocalCopy, true },
    batch_delete_actual = { Operation::BatchDeleteActual, false },
    download         = { Operation::Download, false },
    list             = { Operation::List, false },
)]
fn batch_classification(op: Operation, expected: bool) {
    assert_eq!(op.is_batch(), expected);
}

#[test]
fn only_multi_delete_is_internal() {
    let internal: Vec<_> = Operation::ALL
        .iter()
        .filter(|op| op.is_internal())
        .collect();
    assert_eq!(internal, vec![&Operation::BatchDeleteActual]);
}

#[test]
fn display_names() {
    assert_eq!(Operation::Size.to_string(), "du");
    assert_eq!(Operation::ListBuckets.to_string(), "ls-buckets");
    assert_eq!(Operation::ShellExec.to_string(), "shell-exec");
}

#[test]
fn serde_uses_kebab_case() {
    let json = serde_json::to_string(&Operation::BatchLocalCopy).unwrap();
    assert_eq!(json, "\"batch-local-copy\"");
}

#[test]
fn describe_mentions_move() {
    let mv = Options::NONE.with(OptionFlag::DeleteSource);
    assert_eq!(Operation::Copy.describe(mv), "Move storage object");
    assert_eq!(Operation::Copy.describe(Options::NONE), "Copy storage object");
}

#[test]
fn options_set_semantics() {
    let mut opts = Options::NONE;
    assert!(opts.is_empty());
    opts.insert(OptionFlag::Parents);
    let opts = opts.with(OptionFlag::IfNotExists);
    assert!(opts.has(OptionFlag::Parents));
    assert!(opts.has(OptionFlag::IfNotExists));
    assert!(!opts.has(OptionFlag::DeleteSource));
    assert_eq!(opts.params(), vec!["-n", "--parents"]);
}

#[test]
fn delete_source_has_no_spelling() {
    let opts = Options::from(&[OptionFlag::DeleteSource][..]);
    assert!(opts.has(OptionFlag::DeleteSource));
    assert!(opts.params().is_empty());
}

#[test]
fn accepted_options_per_operation() {
    assert!(Operation::Delete.accepted_options().is_empty());
    assert!(Operation::BatchUpload
        .accepted_options()
        .contains(&OptionFlag::Parents));
    assert!(!Operation::Download
        .accepted_options()
        .contains(&OptionFlag::Parents));
}

#[test]
fn listing_accepts_human_readable() {
    assert_eq!(Operation::Size.accepted_options(), &[OptionFlag::HumanReadable]);
    assert_eq!(OptionFlag::HumanReadable.param(), Some("-H"));
}
