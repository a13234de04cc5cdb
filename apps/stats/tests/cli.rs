//! End-to-end runs of the stats-report binary.

use std::io::Write;
use std::process::Command;

fn stats_report() -> Command {
    Command::new(env!("CARGO_BIN_EXE_stats-report"))
}

#[test]
fn test_missing_file_exits_with_one_and_prints_no_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let output = stats_report()
        .arg("does-not-exist.csv")
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Basic Statistics"));
    assert!(!stdout.contains("Mean:"));

    assert!(stdout.contains("not found"));
    assert!(stdout.contains("Current directory:"));
    assert!(stdout.contains("Files in directory:"));
}

#[test]
fn test_default_path_is_data_csv() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("data.csv"), "age,department\n20,IT\n40,HR\n").unwrap();

    let output = stats_report()
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reading data from: data.csv"));
    assert!(stdout.contains("Column: age\n   Mean: 30.00\n   Median: 30.00"));
    assert!(stdout.contains("Std Dev: 14.14"));
}

#[test]
fn test_malformed_file_exits_with_one() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "a,b\n1,2\n3\n").unwrap();

    let output = stats_report()
        .arg(file.path())
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("DATA PROCESSING REPORT"));
    assert!(stdout.contains("Error processing file"));
}

#[test]
fn test_department_rows_cover_the_table() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "department,salary\nIT,100\nHR,80\nIT,120\nOps,90\n"
    )
    .unwrap();

    let output = stats_report()
        .arg(file.path())
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let section = stdout
        .split("Department-wise Analysis:")
        .nth(1)
        .expect("department section");
    assert!(section.contains("110.00"));
    assert!(section.contains("HR"));
    assert!(section.contains("Ops"));
}
