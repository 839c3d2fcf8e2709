//! Listing specs: `ls` and `du`

use crate::prelude::*;

#[test]
fn ls_without_arguments_lists_buckets() {
    let temp = Project::empty();
    temp.bucket("alpha");
    temp.bucket("beta");

    temp.xf()
        .args(&["ls"])
        .passes()
        .stdout_has("  s3://alpha")
        .stdout_has("  s3://beta")
        .stdout_has("+OK \"ls\"");
}

#[test]
fn ls_prefix_shows_objects_and_directories() {
    let temp = Project::empty();
    temp.object("bkt", "dir/file.txt", "12345");
    temp.object("bkt", "dir/sub/deeper.txt", "x");

    temp.xf()
        .args(&["ls", "s3://bkt/dir/"])
        .passes()
        .stdout_has("DIR  sub/")
        .stdout_has("5  file.txt")
        .stdout_lacks("deeper.txt")
        .stdout_has("+OK \"ls s3://bkt/dir/\"");
}

#[test]
fn ls_wildcard_filters_keys() {
    let temp = Project::empty();
    temp.object("bkt", "a.csv", "1");
    temp.object("bkt", "b.txt", "2");

    temp.xf()
        .args(&["ls", "s3://bkt/*.csv"])
        .passes()
        .stdout_has("a.csv")
        .stdout_lacks("b.txt");
}

#[test]
fn du_totals_matching_objects() {
    let temp = Project::empty();
    temp.object("bkt", "data/one", "1234");
    temp.object("bkt", "data/two", "123456");
    temp.object("bkt", "elsewhere", "12");

    temp.xf()
        .args(&["du", "s3://bkt/data/"])
        .passes()
        .stdout_has("10 bytes in 2 objects: s3://bkt/data/");
}

#[test]
fn missing_bucket_fails() {
    let temp = Project::empty();
    temp.xf()
        .args(&["ls", "s3://nobucket/"])
        .exits_with(127)
        .stdout_has("no such bucket: nobucket");
}

#[test]
fn json_output_is_one_object_per_result() {
    let temp = Project::empty();
    temp.object("bkt", "k", "v");

    let run = temp.xf().args(&["-o", "json", "rm", "s3://bkt/k"]).passes();
    let lines = run.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["job"], "rm s3://bkt/k");
    assert_eq!(lines[0]["status"], "succeeded");
}
