//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Scripted workout logging
//! - Streak updates across runs
//! - History, detail and record views
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

/// Log one chest workout with a single completed bench set
fn log_bench(data_dir: &Path, weight: &str) -> assert_cmd::assert::Assert {
    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--name")
        .arg("Push Day")
        .arg("--category")
        .arg("chest")
        .arg("--entry")
        .arg(format!("Bench Press={}x10", weight))
        .assert()
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Social fitness workout tracker"));
}

#[test]
fn test_scripted_log_creates_tables() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    log_bench(&data_dir, "60")
        .success()
        .stdout(predicate::str::contains("Workout saved"));

    let workouts = fs::read_to_string(data_dir.join("workouts.jsonl")).unwrap();
    assert!(workouts.contains("Push Day"));

    assert!(data_dir.join("workout_exercises.jsonl").exists());
    assert!(data_dir.join("exercise_sets.jsonl").exists());
    assert!(data_dir.join("streak.json").exists());
    assert!(data_dir.join("activity.jsonl").exists());
}

#[test]
fn test_saved_workout_shown_after_logging() {
    let temp_dir = setup_test_dir();

    // Post-save navigation prints the detail view
    log_bench(temp_dir.path(), "60")
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("60 lbs x 10"));
}

#[test]
fn test_first_workout_starts_streak() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    cli()
        .arg("streak")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 1"));
}

#[test]
fn test_same_day_workout_keeps_streak() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();
    log_bench(temp_dir.path(), "62.5").success();

    cli()
        .arg("streak")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Current streak: 1"));
}

#[test]
fn test_history_lists_saved_workout() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("volume 600"));
}

#[test]
fn test_show_by_id() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    // Fish the workout id out of the table
    let workouts = fs::read_to_string(temp_dir.path().join("workouts.jsonl")).unwrap();
    let row: serde_json::Value = serde_json::from_str(workouts.lines().next().unwrap()).unwrap();
    let id = row["id"].as_str().unwrap();

    cli()
        .arg("show")
        .arg(id)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_records_listed_after_logging() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    cli()
        .arg("records")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"))
        .stdout(predicate::str::contains("60 lbs"));
}

#[test]
fn test_heavier_workout_announces_pr() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    log_bench(temp_dir.path(), "65")
        .success()
        .stdout(predicate::str::contains("New PR: Bench Press at 65"));
}

#[test]
fn test_lighter_workout_is_not_a_pr() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    log_bench(temp_dir.path(), "50")
        .success()
        .stdout(predicate::str::contains("New PR").not());
}

#[test]
fn test_warmup_sets_do_not_set_records() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--category")
        .arg("chest")
        .arg("--entry")
        .arg("Bench Press=w:100x5")
        .assert()
        .success();

    cli()
        .arg("records")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No personal records yet"));
}

#[test]
fn test_multiple_entries_preserve_order() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--category")
        .arg("chest")
        .arg("--entry")
        .arg("Bench Press=60x10,60x10")
        .arg("--entry")
        .arg("Push-up=0x20")
        .assert()
        .success();

    let joins = fs::read_to_string(temp_dir.path().join("workout_exercises.jsonl")).unwrap();
    let rows: Vec<serde_json::Value> = joins
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["exercise_id"], "bench_press");
    assert_eq!(rows[0]["order_index"], 0);
    assert_eq!(rows[1]["exercise_id"], "pushup");
    assert_eq!(rows[1]["order_index"], 1);
}

#[test]
fn test_entry_without_category_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--entry")
        .arg("Bench Press=60x10")
        .assert()
        .failure();
}

#[test]
fn test_unknown_exercise_fails_cleanly() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--category")
        .arg("chest")
        .arg("--entry")
        .arg("Cable Crossover Deluxe=60x10")
        .assert()
        .failure();

    // Nothing was persisted
    assert!(!temp_dir.path().join("workouts.jsonl").exists());
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    log_bench(temp_dir.path(), "60").success();

    let csv_path = temp_dir.path().join("out.csv");
    cli()
        .arg("export")
        .arg(&csv_path)
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 set rows"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert!(contents.lines().next().unwrap().contains("set_number"));
    assert!(contents.contains("Bench Press"));
}
