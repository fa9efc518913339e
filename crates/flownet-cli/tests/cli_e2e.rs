use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn flownet_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_flownet"))
}

fn write_inputs(dir: &Path, edges: &str, sources: &str, targets: &str) {
    fs::write(dir.join("edges.txt"), edges).expect("write edges");
    fs::write(dir.join("sources.txt"), sources).expect("write sources");
    fs::write(dir.join("targets.txt"), targets).expect("write targets");
}

fn run_flownet(dir: &Path, extra: &[&str]) -> Output {
    Command::new(flownet_bin())
        .arg("--edges_file")
        .arg(dir.join("edges.txt"))
        .arg("--sources_file")
        .arg(dir.join("sources.txt"))
        .arg("--targets_file")
        .arg(dir.join("targets.txt"))
        .arg("--output")
        .arg(dir.join("result"))
        .args(extra)
        .output()
        .expect("run flownet")
}

#[test]
fn writes_sif_named_after_flow_and_capacity() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_inputs(dir.path(), "a b 0.9 U\n", "a\n", "b\n");

    let out = run_flownet(dir.path(), &[]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let sif = fs::read_to_string(dir.path().join("result_flow1_c1.0.sif")).expect("read output");
    assert_eq!(sif, "a\tb\tU\n");
}

#[test]
fn json_summary_lists_edges() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_inputs(
        dir.path(),
        "a b 0.9 D\nb c 0.8 U\na c 0.1 D\n",
        "a\n",
        "c\n",
    );

    let out = run_flownet(dir.path(), &["--flow", "2", "--capacity", "1.5", "--json"]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json summary");
    let edges = summary["edges"].as_array().expect("edges array");
    assert_eq!(edges.len(), 3);
    assert_eq!(summary["total_cost"], 10 + 20 + 90);

    let sif = fs::read_to_string(dir.path().join("result_flow2_c1.5.sif")).expect("read output");
    assert_eq!(sif, "a\tb\tD\na\tc\tD\nb\tc\tU\n");
}

#[test]
fn solve_failure_leaves_no_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_inputs(dir.path(), "a b 0.9 D\nc d 0.9 D\n", "a\n", "d\n");

    let out = run_flownet(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("infeasible"));
    assert!(!dir.path().join("result_flow1_c1.0.sif").exists());
}

#[test]
fn unknown_orientation_fails_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_inputs(dir.path(), "a b 0.9 X\n", "a\n", "b\n");

    let out = run_flownet(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("parse failed"), "stderr: {stderr}");
    assert!(stderr.contains("edges.txt"), "stderr: {stderr}");
    assert!(stderr.contains("line 1"), "stderr: {stderr}");
    assert!(stderr.contains("`X`"), "stderr: {stderr}");
    assert!(!dir.path().join("result_flow1_c1.0.sif").exists());
}
