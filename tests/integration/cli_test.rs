use std::io::Write;
use std::process::{Command, Output};

const SOLVED_2: &str = "2\nWW\nWW\nBB\nBB\nOO\nOO\nGG\nGG\nRR\nRR\nYY\nYY\n";

fn rubiks(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rubiks"))
        .args(args)
        .output()
        .expect("Failed to execute rubiks")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn solution_line(output: &Output) -> Option<String> {
    stdout_of(output)
        .lines()
        .find(|line| line.starts_with("Solving cube possible in"))
        .map(str::to_owned)
}

#[test]
fn test_solved_cube() {
    let output = rubiks(&["--size", "2", "--twists", "0", "--workers", "1"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Searching for solution for cube of size 2, twists = 0, seed = 0"));
    assert!(stdout.contains("Bound now: 1\n"));
    assert_eq!(
        solution_line(&output).as_deref(),
        Some("Solving cube possible in 1 ways of 1 steps")
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Solving cube took"));
}

#[test]
fn test_distributed_matches_sequential() {
    let common = ["--size", "2", "--twists", "3", "--seed", "4"];

    let sequential = rubiks(&[&common[..], &["--sequential"]].concat());
    let distributed = rubiks(&[&common[..], &["--workers", "2"]].concat());

    assert!(sequential.status.success());
    assert!(distributed.status.success());
    assert!(solution_line(&sequential).is_some());
    assert_eq!(solution_line(&sequential), solution_line(&distributed));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SOLVED_2.as_bytes()).unwrap();
    let path = file.path().to_str().unwrap();

    let output = rubiks(&["--file", path, "--sequential"]);
    assert!(output.status.success());
    assert_eq!(
        solution_line(&output).as_deref(),
        Some("Solving cube possible in 1 ways of 1 steps")
    );
}

#[test]
fn test_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"WW\nWW\n").unwrap();
    let path = file.path().to_str().unwrap();

    let output = rubiks(&["--file", path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(solution_line(&output).is_none());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot load cube from file"), "stderr: {}", stderr);
}

#[test]
fn test_inconsistent_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SOLVED_2.replacen("YY\n", "YW\n", 1).as_bytes()).unwrap();
    let path = file.path().to_str().unwrap();

    let output = rubiks(&["--file", path, "--sequential"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(solution_line(&output).is_none());
}

#[test]
fn test_missing_file() {
    let output = rubiks(&["--file", "/nonexistent/cube.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(solution_line(&output).is_none());
}

#[test]
fn test_size_too_small() {
    let output = rubiks(&["--size", "1", "--twists", "0"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help() {
    let output = rubiks(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("--size"));
    assert!(stdout.contains("--twists"));
    assert!(stdout.contains("--seed"));
    assert!(stdout.contains("--file"));
}

#[test]
fn test_unknown_flag() {
    let output = rubiks(&["--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(solution_line(&output).is_none());
}
