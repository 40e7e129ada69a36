use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;
use tempfile::tempdir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jumprope_cli"))
}

fn fixture_file(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

#[test]
fn count_fixture_succeeds() {
    let output = cli()
        .args(["count", "--fixture", "steady_ten", "--no-export"])
        .output()
        .expect("failed to run jumprope_cli count");
    assert!(
        output.status.success(),
        "CLI exited with {:?}",
        output.status.code()
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let json: Value = serde_json::from_str(stdout.trim()).expect("count report JSON payload");
    assert_eq!(json["fixture"], "steady_ten");
    assert_eq!(json["summary"]["total_repetitions"], 10);
    assert_eq!(json["records"].as_array().map(Vec::len), Some(10));
    assert!(json.get("export_path").is_none());

    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("Total repetitions"), "got {stderr}");
}

#[test]
fn count_tolerates_dropped_detections() {
    let output = cli()
        .args(["count", "--fixture", "dropouts_six", "--no-export"])
        .output()
        .expect("failed to run jumprope_cli count");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("count report JSON payload");
    assert_eq!(json["summary"]["total_repetitions"], 6);
    assert!(json["frames"]["skipped"].as_u64().unwrap_or_default() >= 8);
}

#[test]
fn count_without_completed_calibration_reports_zero() {
    let output = cli()
        .args(["count", "--fixture", "warmup_only", "--no-export"])
        .output()
        .expect("failed to run jumprope_cli count");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("count report JSON payload");
    assert_eq!(json["summary"]["total_repetitions"], 0);
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(stderr.contains("No repetitions recorded."), "got {stderr}");
}

#[test]
fn count_detects_mismatch() {
    let dir = tempdir().unwrap();
    let expect = dir.path().join("wrong.expect.json");
    fs::write(&expect, r#"{"repetitions": 3}"#).unwrap();

    let output = cli()
        .args([
            "count",
            "--fixture",
            &fixture_file("steady_ten.jsonl"),
            "--expect",
            expect.to_str().unwrap(),
            "--no-export",
        ])
        .output()
        .expect("failed to run mismatch count");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).expect("stderr UTF-8");
    assert!(
        stderr.contains("\"failures\""),
        "expected diff JSON in stderr, got {stderr}"
    );
}

#[test]
fn count_exports_session_csv() {
    let dir = tempdir().unwrap();
    let output = cli()
        .args([
            "count",
            "--fixture",
            "steady_ten",
            "--log-dir",
            dir.path().to_str().unwrap(),
            "--session-id",
            "20240101_120000",
        ])
        .output()
        .expect("failed to run jumprope_cli count");
    assert!(output.status.success());

    let csv_path = dir.path().join("jumps_20240101_120000.csv");
    let json: Value = serde_json::from_slice(&output.stdout).expect("count report JSON payload");
    assert_eq!(
        json["export_path"].as_str().map(PathBuf::from),
        Some(csv_path.clone())
    );

    let contents = fs::read_to_string(&csv_path).expect("exported CSV");
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("session_id,timestamp,repetition_number,interval,cumulative_time,rpm")
    );
    assert_eq!(lines.count(), 10);
}

#[test]
fn synthetic_fixture_round_trips_through_count() {
    let dir = tempdir().unwrap();
    let fixture = dir.path().join("jumper.jsonl");

    let output = cli()
        .args([
            "synthetic",
            "--jumps",
            "7",
            "--seed",
            "11",
            "--dropout",
            "0.05",
            "--output",
            fixture.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run jumprope_cli synthetic");
    assert!(output.status.success());
    assert!(dir.path().join("jumper.expect.json").exists());

    let output = cli()
        .args([
            "--fixtures-dir",
            dir.path().to_str().unwrap(),
            "count",
            "--fixture",
            "jumper",
            "--no-export",
        ])
        .output()
        .expect("failed to count synthetic fixture");
    assert_eq!(output.status.code(), Some(0));
    let json: Value = serde_json::from_slice(&output.stdout).expect("count report JSON payload");
    assert_eq!(json["summary"]["total_repetitions"], 7);
}

#[test]
fn stream_emits_one_snapshot_per_frame() {
    let output = cli()
        .args(["stream", "--fixture", "steady_ten"])
        .output()
        .expect("failed to run jumprope_cli stream");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    let snapshots: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("snapshot JSON line"))
        .collect();
    assert_eq!(snapshots.len(), 195);
    assert_eq!(snapshots[0]["baseline"]["status"], "pending");

    let last = snapshots.last().unwrap();
    assert_eq!(last["baseline"]["status"], "ready");
    assert_eq!(last["count"], 10);
    assert_eq!(last["stage_label"], "ready");
}

#[test]
fn dump_fixtures_lists_assets() {
    let output = cli()
        .arg("dump-fixtures")
        .output()
        .expect("failed to run dump-fixtures");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(
        stdout.contains("steady_ten"),
        "expected fixture listing, got {stdout}"
    );
}
