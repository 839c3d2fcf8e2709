//! CLI error handling specs
//!
//! Parse errors are reported before anything runs and fail the process.

use crate::prelude::*;

#[test]
fn unknown_command_is_reported() {
    let temp = Project::empty();
    temp.xf()
        .args(&["frob", "x"])
        .exits_with(127)
        .stdout_eq("-ERR \"frob x\": Unknown command \"frob\"\n");
}

#[test]
fn wrong_arity_is_reported() {
    let temp = Project::empty();
    temp.xf()
        .args(&["cp", "onlyone"])
        .exits_with(127)
        .stdout_has("-ERR \"cp onlyone\": Invalid parameters to \"cp\"");
}

#[test]
fn nested_chains_are_rejected() {
    let temp = Project::empty();
    temp.xf()
        .args(&["ls", "&&", "ls", "&&", "ls"])
        .exits_with(127)
        .stdout_has("Nested commands are not supported");
}

#[test]
fn negative_retries_are_rejected() {
    let temp = Project::empty();
    temp.xf()
        .args(&["-r", "-1", "ls"])
        .exits_with(2)
        .stderr_has("retry count cannot be negative");
}

#[test]
fn zero_workers_are_rejected() {
    let temp = Project::empty();
    temp.xf()
        .args(&["--numworkers", "0", "ls"])
        .exits_with(2)
        .stderr_has("numworkers cannot be zero");
}

#[test]
fn missing_object_fails_the_run() {
    let temp = Project::empty();
    temp.bucket("bkt");
    temp.xf()
        .args(&["rm", "s3://bkt/nope"])
        .exits_with(127)
        .stdout_eq("-ERR \"rm s3://bkt/nope\": no such object: s3://bkt/nope\n");
}
