// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use xf_core::ParameterKind::*;

fn ok(token: &str, kind: ParameterKind) -> JobArgument {
    validate(token, kind, None).unwrap()
}

fn reason(token: &str, kind: ParameterKind) -> &'static str {
    validate(token, kind, None).unwrap_err().reason()
}

#[test]
fn unchecked_is_verbatim() {
    assert_eq!(ok("s3://whatever*", Unchecked).text, "s3://whatever*");
    assert_eq!(ok("--flag", UncheckedOneOrMore).location, None);
}

#[yare::parameterized(
    object_bucket   = { "s3://b", StorageObject, "s3://b" },
    object_key      = { "s3://b//k", StorageObject, "s3://b/k" },
    simple          = { "s3://b/a/k", StorageSimpleObject, "s3://b/a/k" },
    dir_bucket      = { "s3://b", StorageDir, "s3://b" },
    dir_prefix      = { "s3://b/p/", StorageDir, "s3://b/p/" },
    wildcard        = { "s3://b/p/*.log", StorageWildcardObject, "s3://b/p/*.log" },
    object_or_dir   = { "s3://b/p/", StorageObjectOrDir, "s3://b/p/" },
)]
fn storage_accepts(token: &str, kind: ParameterKind, canonical: &str) {
    let arg = ok(token, kind);
    assert_eq!(arg.text, canonical);
    assert!(arg.is_storage());
}

#[yare::parameterized(
    no_scheme           = { "b/k", StorageObject, "not-a-storage-url" },
    no_bucket           = { "s3://", StorageDir, "missing-bucket" },
    wild_bucket         = { "s3://b*/k", StorageWildcardObject, "wildcard-in-bucket" },
    object_wildcard     = { "s3://b/k*", StorageObject, "wildcard-forbidden" },
    simple_wildcard     = { "s3://b/k?", StorageSimpleObject, "wildcard-forbidden" },
    or_dir_wildcard     = { "s3://b/*", StorageObjectOrDir, "wildcard-forbidden" },
    wildcard_missing    = { "s3://b/k", StorageWildcardObject, "wildcard-required" },
    wildcard_bucket_only = { "s3://b", StorageWildcardObject, "wildcard-required" },
    simple_empty        = { "s3://b", StorageSimpleObject, "empty-key" },
    object_slash        = { "s3://b/p/", StorageObject, "trailing-slash-forbidden" },
    simple_slash        = { "s3://b/p/", StorageSimpleObject, "trailing-slash-forbidden" },
    dir_no_slash        = { "s3://b/p", StorageDir, "must-end-in-slash" },
)]
fn storage_rejects(token: &str, kind: ParameterKind, expected: &str) {
    assert_eq!(reason(token, kind), expected);
}

#[test]
fn wildcard_rules_are_exclusive() {
    for token in ["s3://b/k", "s3://b/k*", "s3://b/a?c", "s3://b/dir/x"] {
        let object = validate(token, StorageObject, None).is_ok();
        let wild = validate(token, StorageWildcardObject, None).is_ok();
        assert_ne!(object, wild, "{token}");
    }
}

#[yare::parameterized(
    storage_prefix = { "s3://b/dst/", "s3://b/dst/file.txt" },
    bucket_only    = { "s3://b", "s3://b/file.txt" },
    explicit_key   = { "s3://b/other", "s3://b/other" },
)]
fn storage_dir_inherits_basename(token: &str, expected: &str) {
    let reference = ok("s3://src/a/file.txt", StorageSimpleObject);
    let arg = validate(token, StorageObjectOrDir, Some(&reference)).unwrap();
    assert_eq!(arg.text, expected);
    assert_eq!(Location::parse(&arg.text).as_ref().ok(), arg.location.as_ref());
}

#[test]
fn storage_dir_without_reference_keeps_prefix() {
    assert_eq!(ok("s3://b/dst/", StorageObjectOrDir).text, "s3://b/dst/");
}

#[test]
fn local_file_basename_feeds_storage_destination() {
    let reference = JobArgument::plain("some/dir/photo.jpg");
    let arg = validate("s3://b/", StorageObjectOrDir, Some(&reference)).unwrap();
    assert_eq!(arg.text, "s3://b/photo.jpg");
}

#[yare::parameterized(
    file_storage  = { "s3://b/k", LocalFileObject, "resembles-storage-url" },
    dir_storage   = { "s3://b", LocalDir, "resembles-storage-url" },
    file_glob     = { "*.txt", LocalFileObject, "contains-glob-characters" },
    or_dir_class  = { "a[bc]", LocalFileOrDir, "contains-glob-characters" },
    dir_question  = { "dir?", LocalDir, "contains-glob-characters" },
    file_slash    = { "dir/", LocalFileObject, "trailing-slash-forbidden" },
    glob_storage  = { "s3://b/*", Glob, "resembles-storage-url" },
    glob_plain    = { "plain/path", Glob, "not-a-glob" },
    glob_broken   = { "a[", Glob, "invalid-glob-pattern" },
)]
fn local_rejects(token: &str, kind: ParameterKind, expected: &str) {
    assert_eq!(reason(token, kind), expected);
}

#[test]
fn dot_becomes_directory() {
    assert_eq!(ok(".", LocalDir).text, "./");
    assert_eq!(ok(".", LocalFileOrDir).text, "./");
}

#[test]
fn optional_kinds_default_to_current_dir() {
    assert_eq!(ok("", OptionalLocalDir).text, "./");
    let reference = ok("s3://b/x/report.csv", StorageSimpleObject);
    let arg = validate("", OptionalLocalFileOrDir, Some(&reference)).unwrap();
    assert_eq!(arg.text, "./report.csv");
}

#[test]
fn local_file_rejects_existing_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    assert_eq!(reason(dir, LocalFileObject), "is-a-directory");

    let file = tmp.path().join("f.txt");
    std::fs::write(&file, b"x").unwrap();
    let file = file.to_str().unwrap();
    assert_eq!(ok(file, LocalFileObject).text, file);
}

#[test]
fn local_file_or_dir_detects_directories() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap().to_string();
    assert_eq!(ok(&dir, LocalFileOrDir).text, format!("{dir}/"));

    let missing = tmp.path().join("nope").to_str().unwrap().to_string();
    assert_eq!(ok(&missing, LocalFileOrDir).text, missing);

    let reference = JobArgument::plain("src/data.bin");
    let arg = validate(&format!("{dir}/"), LocalFileOrDir, Some(&reference)).unwrap();
    assert_eq!(arg.text, format!("{dir}/data.bin"));
}

#[test]
fn local_dir_normalises_and_rejects_files() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap().to_string();
    assert_eq!(ok(&dir, LocalDir).text, format!("{dir}/"));

    let missing = format!("{dir}/new");
    assert_eq!(ok(&missing, LocalDir).text, format!("{missing}/"));

    let file = tmp.path().join("f");
    std::fs::write(&file, b"x").unwrap();
    assert_eq!(reason(file.to_str().unwrap(), LocalDir), "not-a-directory");
}

#[test]
fn glob_accepts_patterns() {
    assert_eq!(ok("logs/*.txt", Glob).text, "logs/*.txt");
    assert_eq!(ok("data/file-[0-9]", Glob).text, "data/file-[0-9]");
}

#[test]
fn reference_ignored_for_non_inferring_kinds() {
    let reference = ok("s3://b/k.txt", StorageSimpleObject);
    let arg = validate("s3://b/p/", StorageDir, Some(&reference)).unwrap();
    assert_eq!(arg.text, "s3://b/p/");
}

#[test]
fn error_messages_are_readable() {
    assert_eq!(
        ValidationError::WildcardForbidden.to_string(),
        "storage key cannot contain wildcards"
    );
    let e = ValidationError::StatFailed {
        path: "x".into(),
        message: "denied".into(),
    };
    assert_eq!(e.to_string(), "could not stat x: denied");
}
