//! End-to-end tests of command dispatch.
//!
//! Every run points `--config` at a temp file whose `logs_dir` lives in the
//! same TempDir and disables rendering.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use bstviz::cli::args::Cli;
use bstviz::cli::commands::execute_command;
use bstviz::cli::CliError;

fn config_in(dir: &Path) -> PathBuf {
    let logs = dir.join("logs");
    let path = dir.join("bstviz.toml");
    fs::write(
        &path,
        format!(
            "capacity = 4\n[dump]\nlogs_dir = \"{}\"\nrender = false\n",
            logs.display()
        ),
    )
    .unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> Result<(), CliError> {
    let config = config_in(dir);
    let mut argv = vec!["bstviz".to_string(), "-c".into(), config.display().to_string()];
    argv.extend(args.iter().map(|a| a.to_string()));
    let cli = Cli::try_parse_from(argv).expect("arguments parse");
    execute_command(&cli)
}

#[test]
fn given_values_when_insert_then_writes_final_dump() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), &["insert", "3", "1", "2"]).unwrap();

    let logs = temp.path().join("logs");
    assert!(logs.join("dot/tree_dump0000.dot").is_file());
    assert!(!logs.join("dot/tree_dump0001.dot").exists());
    let log = fs::read_to_string(logs.join("tree.html")).unwrap();
    assert_eq!(log.matches("<h2>").count(), 1);
}

#[test]
fn given_dump_every_when_insert_then_dumps_periodically_plus_final() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), &["insert", "--dump-every", "2", "1", "2", "3", "4"]).unwrap();

    let log = fs::read_to_string(temp.path().join("logs/tree.html")).unwrap();
    assert_eq!(log.matches("<h2>").count(), 3);
    assert!(temp.path().join("logs/dot/tree_dump0002.dot").is_file());
}

#[test]
fn given_highlight_value_when_insert_then_final_dump_highlights_it() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), &["insert", "--highlight-value", "1", "3", "1"]).unwrap();

    let dot = fs::read_to_string(temp.path().join("logs/dot/tree_dump0000.dot")).unwrap();
    assert!(dot.contains(
        "node1[rank = 1, label = \"{ data = 1 | { <left> LEFT | <right> RIGHT } }\", \
         fillcolor = \"#9d8189\"];"
    ));
}

#[rstest]
#[case(&["insert", "1", "2", "3", "4", "5"], 70)]
#[case(&["insert", "--capacity", "0", "1"], 64)]
#[case(&["insert", "--highlight", "3", "1"], 64)]
#[case(&["insert", "--dump-every", "0", "1"], 64)]
#[case(&["traverse", "--capacity", "1", "1", "2"], 70)]
fn given_bad_request_when_executing_then_maps_exit_code(
    #[case] args: &[&str],
    #[case] expected: i32,
) {
    let temp = TempDir::new().unwrap();

    let err = run(temp.path(), args).unwrap_err();

    assert_eq!(err.exit_code(), expected);
}

#[test]
fn given_traverse_when_executing_then_writes_no_files() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), &["traverse", "--order", "post", "2", "1"]).unwrap();

    assert!(!temp.path().join("logs").exists());
}

#[test]
fn given_demo_when_executing_then_second_dump_highlights_slot_four() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), &["demo", "--no-render"]).unwrap();

    let dot = fs::read_to_string(temp.path().join("logs/dot/tree_dump0001.dot")).unwrap();
    assert!(dot.contains(
        "node4[rank = 3, label = \"{ data = 10 | { <left> LEFT | <right> RIGHT } }\", \
         fillcolor = \"#9d8189\"];"
    ));
    let log = fs::read_to_string(temp.path().join("logs/tree.html")).unwrap();
    assert_eq!(log.matches("<img src = ").count(), 2);
}

#[test]
fn given_missing_config_file_when_executing_then_config_exit_code() {
    let cli =
        Cli::try_parse_from(["bstviz", "-c", "/nonexistent/bstviz.toml", "show", "1"]).unwrap();

    let err = execute_command(&cli).unwrap_err();

    assert_eq!(err.exit_code(), 78);
}

#[test]
fn given_no_command_when_executing_then_usage_error() {
    let cli = Cli::try_parse_from(["bstviz"]).unwrap();

    let err = execute_command(&cli).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
}
