use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "sr-arq-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("read json output");
    serde_json::from_str(&raw).expect("parse json output")
}

#[test]
fn sr_sim_delivers_everything_over_lossy_channel() {
    let dir = unique_temp_dir("lossy");
    let summary_path = dir.join("summary.json");

    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args([
            "--messages",
            "40",
            "--loss",
            "0.2",
            "--corrupt",
            "0.2",
            "--seed",
            "7",
            "--summary-json",
            summary_path.to_str().unwrap(),
        ])
        .output()
        .expect("run sr_sim");
    assert!(
        output.status.success(),
        "sr_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("done @ "), "unexpected stdout: {stdout}");
    assert!(stdout.contains("in_order=true"));

    let v = read_json(&summary_path);
    assert_eq!(v["in_order"], true);
    assert_eq!(v["complete"], true);
    assert_eq!(v["app"]["generated"], 40);
    assert_eq!(v["delivered"], v["app"]["accepted"]);
    assert!(v["channel"]["lost"].as_u64().unwrap() > 0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sr_sim_writes_trace_json() {
    let dir = unique_temp_dir("trace");
    let trace_path = dir.join("trace.json");

    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args([
            "--messages",
            "5",
            "--trace-json",
            trace_path.to_str().unwrap(),
        ])
        .output()
        .expect("run sr_sim");
    assert!(output.status.success());

    let v = read_json(&trace_path);
    let arr = v.as_array().expect("trace must be a JSON array");
    assert_eq!(arr[0]["kind"], "send");
    let delivers = arr.iter().filter(|e| e["kind"] == "deliver").count();
    assert_eq!(delivers, 5);
    assert!(arr.iter().all(|e| e.get("t_ns").is_some()));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sr_sim_reads_scenario_and_cli_overrides_it() {
    let dir = unique_temp_dir("scenario");
    let scenario = dir.join("scenario.json");
    fs::write(&scenario, r#"{ "messages": 100, "window_size": 4, "seed": 3 }"#)
        .expect("write scenario");
    let summary_path = dir.join("summary.json");

    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args([
            "--scenario",
            scenario.to_str().unwrap(),
            "--messages",
            "8",
            "--summary-json",
            summary_path.to_str().unwrap(),
        ])
        .output()
        .expect("run sr_sim");
    assert!(output.status.success());

    let v = read_json(&summary_path);
    assert_eq!(v["app"]["generated"], 8);
    assert_eq!(v["complete"], true);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sr_sim_rejects_invalid_window() {
    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args(["--window", "0"])
        .output()
        .expect("run sr_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("window size must be at least 1"),
        "stderr={stderr}"
    );
}

#[test]
fn sr_sim_refuses_certain_loss_without_horizon() {
    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args(["--loss", "1", "--messages", "3"])
        .output()
        .expect("run sr_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("set until_ms"), "stderr={stderr}");
}

#[test]
fn sr_sim_stops_at_horizon_under_certain_loss() {
    let dir = unique_temp_dir("horizon");
    let summary_path = dir.join("summary.json");

    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args([
            "--loss",
            "1",
            "--messages",
            "3",
            "--until-ms",
            "500",
            "--summary-json",
            summary_path.to_str().unwrap(),
        ])
        .output()
        .expect("run sr_sim");
    assert!(output.status.success());

    let v = read_json(&summary_path);
    assert_eq!(v["delivered"], 0);
    assert_eq!(v["complete"], false);
    assert!(v["end_ms"].as_f64().unwrap() <= 500.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sr_sim_reports_scenario_parse_errors() {
    let dir = unique_temp_dir("badscenario");
    let scenario = dir.join("scenario.json");
    fs::write(&scenario, "{ not json").expect("write scenario");

    let output = Command::new(env!("CARGO_BIN_EXE_sr_sim"))
        .args(["--scenario", scenario.to_str().unwrap()])
        .output()
        .expect("run sr_sim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse scenario"), "stderr={stderr}");

    let _ = fs::remove_dir_all(&dir);
}
