use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CATALOG: &str = "\
ID,Rank,Decade_Rank,Title,Director,Runtime,Genre,Year,Decade,Rating,Votes,In_Pool,Date
1,5,2,Alien,Ridley Scott,117,Horror,1979,1970s,8.5,900000,Y,
2,48,10,Aliens,James Cameron,137,Action,1986,1980s,8.4,750000,Y,
3,900,150,Alien 3,David Fincher,114,Horror,1992,1990s,6.4,300000,Y,
";

/// Run the built binary against `catalog` with a fixed seed and no color
fn run(catalog: &Path, args: &[&str]) -> Output {
    let home = catalog.parent().expect("catalog lives in a temp dir");
    Command::new(env!("CARGO_BIN_EXE_movie-picker"))
        .arg("--catalog")
        .arg(catalog)
        .args(["--seed", "7", "--no-color"])
        .args(args)
        .env("HOME", home)
        .env_remove("MOVIE_PICKER_CSV")
        .env_remove("MOVIE_PICKER_SEED")
        .env_remove("MOVIE_PICKER_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run movie-picker")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn setup() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.csv");
    fs::write(&path, CATALOG).unwrap();
    (dir, path)
}

#[test]
fn test_get_all_minimal() {
    let (_dir, path) = setup();
    let output = run(&path, &["get", "--count", "all", "-m"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    insta::assert_snapshot!(stdout(&output).trim_end(), @r"
    Alien (1979)
    Aliens (1986)
    Alien 3 (1992)
    ");
}

#[test]
fn test_get_with_filters() {
    let (_dir, path) = setup();
    let output = run(
        &path,
        &["get", "-g", "horror", "--rating", "8+", "--year", "1970s", "-m"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Alien (1979)");

    let output = run(&path, &["get", "--t100", "-d", "!scott", "-c", "all", "-m"]);
    assert_eq!(stdout(&output).trim(), "Aliens (1986)");
}

#[test]
fn test_malformed_rank_exits_with_hint() {
    let (_dir, path) = setup();
    let output = run(&path, &["get", "--rank", "abc"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("Invalid rank format: 'abc'"), "stderr: {}", err);
    assert!(err.contains("Valid formats: 50-100 (range)"), "stderr: {}", err);
}

#[test]
fn test_count_too_large() {
    let (_dir, path) = setup();
    let output = run(&path, &["get", "-c", "5"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output)
        .contains("Count (5) cannot be larger than available movies (3). Please try again."));

    let output = run(&path, &["get", "-c", "99999999999999999999"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot be larger than available movies (3)"));
}

#[test]
fn test_remove_persists_to_file() {
    let (_dir, path) = setup();
    let output = run(&path, &["remove", "2"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Movie with ID 2 has been removed.\n");

    let saved = fs::read_to_string(&path).unwrap();
    let row = saved.lines().find(|l| l.starts_with("2,")).unwrap();
    assert!(row.contains(",N,"), "row: {}", row);
    assert!(!path.with_file_name("movies.csv.tmp").exists());

    let output = run(&path, &["get", "-c", "all", "-m"]);
    assert!(!stdout(&output).contains("Aliens"));

    let output = run(&path, &["list"]);
    assert!(stdout(&output).starts_with("Aliens (1986 | "));

    let output = run(&path, &["remove", "2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already been removed"));

    let output = run(&path, &["reset"]);
    assert_eq!(stdout(&output), "The pool has been reset.\n");
    let output = run(&path, &["list"]);
    assert_eq!(stdout(&output), "There are no movies in the list.\n");
}

#[test]
fn test_no_subcommand_lists_commands() {
    let (_dir, path) = setup();
    let output = run(&path, &[]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("Available commands:"));
}

#[test]
fn test_missing_catalog_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir.path().join("absent.csv"), &["get"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Catalog file does not exist"));
}
