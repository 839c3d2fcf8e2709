//! Usage and help specs

use crate::prelude::*;

#[test]
fn no_arguments_prints_usage() {
    cli()
        .exits_with(2)
        .stderr_has("Usage: xf [OPTIONS] -f <FILE>")
        .stderr_has("Commands:");
}

#[test]
fn help_lists_every_command_group() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Batch download from storage")
        .stdout_has("Move storage object")
        .stdout_has("du [-H] ")
        .stdout_has("! command [parameters...]")
        .stdout_has("exit [exit code]");
}

#[test]
fn file_and_command_are_exclusive() {
    let temp = Project::empty();
    temp.file("jobs.txt", "ls\n");
    temp.xf()
        .args(&["-f", "jobs.txt", "ls"])
        .exits_with(2)
        .stderr_has("-f cannot be combined with a command");
}
