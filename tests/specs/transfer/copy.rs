//! Transfer specs: uploads, downloads, storage copies and deletes

use crate::prelude::*;

#[test]
fn rm_deletes_an_object() {
    let temp = Project::empty();
    temp.object("bkt", "k", "payload");

    temp.xf()
        .args(&["rm", "s3://bkt/k"])
        .passes()
        .stdout_eq("+OK \"rm s3://bkt/k\"\n");
    assert!(!temp.has_object("bkt", "k"));
}

#[test]
fn upload_into_a_prefix_keeps_the_file_name() {
    let temp = Project::empty();
    temp.bucket("bkt");
    temp.file("up.txt", "hello");

    temp.xf()
        .args(&["cp", "up.txt", "s3://bkt/in/"])
        .passes()
        .stdout_eq("+OK \"cp up.txt s3://bkt/in/up.txt\"\n");
    assert!(temp.has_object("bkt", "in/up.txt"));
}

#[test]
fn get_defaults_to_the_working_directory() {
    let temp = Project::empty();
    temp.object("bkt", "data/report.csv", "a,b\n");

    temp.xf()
        .args(&["get", "s3://bkt/data/report.csv"])
        .passes()
        .stdout_eq("+OK \"get s3://bkt/data/report.csv ./report.csv\"\n");
    assert_eq!(temp.read("report.csv"), "a,b\n");
}

#[test]
fn mv_removes_the_source_object() {
    let temp = Project::empty();
    temp.object("bkt", "old", "x");

    temp.xf().args(&["mv", "s3://bkt/old", "s3://bkt/new"]).passes();
    assert!(temp.has_object("bkt", "new"));
    assert!(!temp.has_object("bkt", "old"));
}

#[test]
fn if_not_exists_skips_with_a_warning() {
    let temp = Project::empty();
    temp.object("bkt", "k", "remote");
    temp.file("k", "local");

    temp.xf()
        .args(&["get", "-n", "s3://bkt/k", "k"])
        .passes()
        .stdout_has("+OK? ")
        .stdout_has("object already exists");
    assert_eq!(temp.read("k"), "local");
}

#[test]
fn batch_get_reports_sub_jobs_and_a_summary() {
    let temp = Project::empty();
    temp.object("bkt", "logs/a.log", "a");
    temp.object("bkt", "logs/b.log", "b");
    temp.object("bkt", "other/c.log", "c");

    temp.xf()
        .args(&["get", "s3://bkt/logs/*", "out/"])
        .passes()
        .stdout_has(" + \"get s3://bkt/logs/a.log out/a.log\"")
        .stdout_has(" + \"get s3://bkt/logs/b.log out/b.log\"")
        .stdout_has("+OK \"get s3://bkt/logs/* out/\" (2)")
        .stdout_lacks("c.log");
    assert_eq!(temp.read("out/a.log"), "a");
    assert_eq!(temp.read("out/b.log"), "b");
}

#[test]
fn batch_rm_empties_the_prefix() {
    let temp = Project::empty();
    temp.object("bkt", "tmp/1", "1");
    temp.object("bkt", "tmp/2", "2");
    temp.object("bkt", "keep", "k");

    temp.xf()
        .args(&["rm", "s3://bkt/tmp/*"])
        .passes()
        .stdout_has("+ Batch-delete s3://bkt/tmp/1")
        .stdout_has("+OK \"rm s3://bkt/tmp/*\"");
    assert!(!temp.has_object("bkt", "tmp/1"));
    assert!(!temp.has_object("bkt", "tmp/2"));
    assert!(temp.has_object("bkt", "keep"));
}

#[test]
fn failed_download_is_an_error_line() {
    let temp = Project::empty();
    temp.bucket("bkt");

    temp.xf()
        .args(&["get", "s3://bkt/missing", "dest"])
        .exits_with(127)
        .stdout_eq("-ERR \"get s3://bkt/missing dest\": no such object: s3://bkt/missing\n");
    assert!(!temp.has_file("dest"));
}

#[test]
fn copy_onto_itself_is_refused() {
    let temp = Project::empty();
    temp.object("bkt", "k", "hello\n");

    temp.xf()
        .args(&["mv", "s3://bkt/k", "s3://bkt/k"])
        .exits_with(127)
        .stdout_has("-ERR \"mv s3://bkt/k s3://bkt/k\": invalid arguments: s3://bkt/k cannot be copied onto itself");
    assert_eq!(temp.read("store/bkt/k"), "hello\n");
}

#[test]
fn local_copy_onto_itself_is_refused() {
    let temp = Project::empty();
    temp.file("f.txt", "hello");

    temp.xf().args(&["cp", "f.txt", "f.txt"]).exits_with(127).stdout_has("same file");
    assert_eq!(temp.read("f.txt"), "hello");
}
