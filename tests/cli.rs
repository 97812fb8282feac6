//! CLI behavior tests

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper function to create a test command with a clean environment
fn create_test_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rttplot").unwrap();
    cmd.current_dir(workdir)
        .env_remove("RTTPLOT_SUBDIR")
        .env_remove("RTTPLOT_OUTPUT_DIR")
        .env_remove("RTTPLOT_RESOLVERS")
        .env_remove("RTTPLOT_BAR_STEP")
        .env_remove("RTTPLOT_ALLOW_PARTIAL")
        .env_remove("RTTPLOT_ENABLE_COLOR")
        .arg("--no-color");
    cmd
}

fn write_result(root: &Path, relative: &str, cmdline: &str, latencies: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        format!(
            "{{\"cmdline\": \"{}\"}}\n{{\"period_response_avg_ms\": {}}}\n",
            cmdline, latencies
        ),
    )
    .unwrap();
}

fn results_without_post() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_result(dir.path(), "runs/tests/test1/udp.json", "dnsperf -P udp", "[10, 20, NaN]");
    write_result(dir.path(), "runs/tests/test1/get.json", "dnsperf -P doh -M GET", "[15, 0, 25]");
    dir
}

#[test]
fn test_dirs_is_required() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dirs"));
}

#[test]
fn test_help_topic_without_dirs() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(dir.path())
        .args(["--help-topic", "input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INPUT FILES"));
}

#[test]
fn test_nonexistent_dir_is_io_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(dir.path())
        .args(["--dirs", "does-not-exist", "--no-charts"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("does-not-exist"));
}

#[test]
fn test_missing_post_results_exit_code() {
    let dir = results_without_post();
    create_test_cmd(dir.path())
        .args(["--dirs", "runs", "-o", "charts"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("doh-POST"));

    assert!(!dir.path().join("charts").exists());
}

#[test]
fn test_charts_written_for_all_protocols() {
    let dir = results_without_post();
    write_result(dir.path(), "runs/tests/test1/post.json", "dnsperf -P doh -M POST", "[30, 40]");
    write_result(dir.path(), "runs/tests/test2/udp.json", "dnsperf -P udp", "[12]");

    create_test_cmd(dir.path())
        .args(["--dirs", "runs", "-o", "charts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"))
        .stdout(predicate::str::contains("tests-combined-rtt-mean.png"))
        .stdout(predicate::str::contains("tests-combined-rtt-difference.png"));

    assert!(dir.path().join("charts/tests-combined-rtt-mean.png").exists());
    assert!(dir.path().join("charts/tests-combined-rtt-difference.png").exists());
}

#[test]
fn test_report_and_summary_json() {
    let dir = results_without_post();
    create_test_cmd(dir.path())
        .args(["--dirs", "runs", "--no-charts", "--summary-json", "out/summary.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RTT summary (tests)"))
        .stdout(predicate::str::contains("15.00ms"))
        .stdout(predicate::str::contains("20.00ms"));

    let summary = fs::read_to_string(dir.path().join("out/summary.json")).unwrap();
    assert!(summary.contains("\"doh-GET\""));
    assert!(summary.contains("\"test1\""));
}

#[test]
fn test_custom_subdir() {
    let dir = TempDir::new().unwrap();
    write_result(dir.path(), "runs/bench/test2/udp.json", "dnsperf", "[8]");

    create_test_cmd(dir.path())
        .args(["--dirs", "runs", "--subdir", "bench", "--no-charts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8.00ms"));

    // Nothing sits under the default subdir
    create_test_cmd(dir.path())
        .args(["--dirs", "runs", "--no-charts"])
        .assert()
        .code(6);
}

#[test]
fn test_malformed_result_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("runs/tests/test1/udp.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{\"cmdline\": \"dnsperf\"}\n{not json\n").unwrap();

    create_test_cmd(dir.path())
        .args(["--dirs", "runs", "--no-charts"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_invalid_env_value_is_config_error() {
    let dir = results_without_post();
    create_test_cmd(dir.path())
        .env("RTTPLOT_BAR_STEP", "zero")
        .args(["--dirs", "runs", "--no-charts"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("RTTPLOT_BAR_STEP"));
}
