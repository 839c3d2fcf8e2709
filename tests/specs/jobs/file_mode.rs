//! File mode specs: job lists, continuations and exit codes

use crate::prelude::*;

#[test]
fn job_file_runs_every_line() {
    let temp = Project::empty();
    temp.object("bkt", "a", "1");
    temp.object("bkt", "b", "2");
    temp.file("jobs.txt", "# cleanup\nrm s3://bkt/a\n\nrm s3://bkt/b\n");

    temp.xf()
        .args(&["--numworkers", "1", "-f", "jobs.txt"])
        .passes()
        .stdout_has("+OK \"rm s3://bkt/a\"")
        .stdout_has("+OK \"rm s3://bkt/b\"")
        .stderr_has("# Using 1 workers")
        .stderr_has("# Exiting with code 0")
        .stderr_has("# Stats: delete");
    assert!(!temp.has_object("bkt", "a"));
    assert!(!temp.has_object("bkt", "b"));
}

#[test]
fn jobs_can_come_from_stdin() {
    let temp = Project::empty();
    temp.object("bkt", "k", "v");

    temp.xf()
        .args(&["-f", "-"])
        .stdin("rm s3://bkt/k\n")
        .passes()
        .stdout_eq("+OK \"rm s3://bkt/k\"\n");
}

#[test]
fn parse_errors_do_not_stop_the_run() {
    let temp = Project::empty();
    temp.object("bkt", "k", "v");
    temp.file("jobs.txt", "frob\nrm s3://bkt/k\n");

    temp.xf()
        .args(&["-f", "jobs.txt"])
        .exits_with(127)
        .stdout_has("-ERR \"frob\": Unknown command \"frob\"")
        .stdout_has("+OK \"rm s3://bkt/k\"")
        .stderr_has("# Stats: Failed");
    assert!(!temp.has_object("bkt", "k"));
}

#[test]
fn and_runs_after_success() {
    let temp = Project::empty();
    temp.object("bkt", "src", "data");

    temp.xf()
        .args(&["cp", "s3://bkt/src", "s3://bkt/dst", "&&", "rm", "s3://bkt/src"])
        .passes()
        .stdout_has("+OK \"cp s3://bkt/src s3://bkt/dst\"")
        .stdout_has("+OK \"rm s3://bkt/src\"");
    assert!(temp.has_object("bkt", "dst"));
    assert!(!temp.has_object("bkt", "src"));
}

#[test]
fn and_is_skipped_after_failure() {
    let temp = Project::empty();
    temp.object("bkt", "keep", "k");
    temp.file("jobs.txt", "rm s3://bkt/missing && rm s3://bkt/keep\n");

    temp.xf()
        .args(&["-f", "jobs.txt"])
        .exits_with(127)
        .stdout_lacks("rm s3://bkt/keep");
    assert!(temp.has_object("bkt", "keep"));
}

#[test]
fn or_runs_after_failure() {
    let temp = Project::empty();
    temp.object("bkt", "fallback", "f");
    temp.file("jobs.txt", "rm s3://bkt/missing || rm s3://bkt/fallback\n");

    temp.xf()
        .args(&["-f", "jobs.txt"])
        .passes()
        .stdout_has("-ERR \"rm s3://bkt/missing\"")
        .stdout_has("+OK \"rm s3://bkt/fallback\"")
        .stderr_has("# Exiting with code 0");
    assert!(!temp.has_object("bkt", "fallback"));
}

#[test]
fn failed_recovery_fails_the_run() {
    let temp = Project::empty();
    temp.file("jobs.txt", "rm s3://bkt/missing || rm s3://bkt/also-missing\n");

    temp.xf()
        .args(&["-f", "jobs.txt"])
        .exits_with(127)
        .stdout_has("-ERR \"rm s3://bkt/missing\"")
        .stdout_has("-ERR \"rm s3://bkt/also-missing\"");
}

#[test]
fn exit_sets_the_process_code() {
    let temp = Project::empty();
    temp.file("jobs.txt", "exit 3\n");

    temp.xf()
        .args(&["--numworkers", "1", "-f", "jobs.txt"])
        .exits_with(3)
        .stderr_has("# Exiting with code 3");
}

#[test]
fn exit_after_failure_overrides_the_failure_code() {
    let temp = Project::empty();
    temp.bucket("bkt");
    temp.file("jobs.txt", "rm s3://bkt/missing || exit 0\n");

    temp.xf().args(&["-f", "jobs.txt"]).exits_with(0);
}

#[test]
fn shell_output_is_reported_as_messages() {
    let temp = Project::empty();
    temp.xf()
        .args(&["!", "echo", "hello"])
        .passes()
        .stdout_has(" + hello")
        .stdout_has("+OK \"! echo hello\"");
}
