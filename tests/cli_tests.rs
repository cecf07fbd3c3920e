use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use regex::Regex;
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_lweforge");

struct CmdResult {
    success: bool,
    stdout: String,
    stderr: String,
}

fn run_forge(args: &[&str]) -> CmdResult {
    let output = Command::new(BIN)
        .args(args)
        .output()
        .expect("Failed to execute binary");
    CmdResult {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Pulls the `≈2^x` magnitudes out of the summary row labelled `tag`, in
/// column order.
fn row_magnitudes(stdout: &str, tag: &str) -> Vec<f64> {
    let re = Regex::new(r"2\^(\d+\.\d)").unwrap();
    for line in stdout.lines() {
        if line.contains(tag) && line.contains("2^") {
            return re
                .captures_iter(line)
                .map(|c| c[1].parse().unwrap())
                .collect();
        }
    }
    Vec::new()
}

struct CsvContext {
    _dir: TempDir,
    path: PathBuf,
}

impl CsvContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("params.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "n,q,secret,error,m,tag").unwrap();
        writeln!(file, "64,1099511627776,uniformmod:2,gaussian:3.2,,toy64").unwrap();
        writeln!(file, "512,3329,binomial:3,binomial:2,1024,kyber512").unwrap();
        Self { _dir: dir, path }
    }
}

#[test]
fn test_cli_schemes_lists_builtins() {
    let res = run_forge(&["schemes"]);
    assert!(res.success, "STDERR:\n{}", res.stderr);
    for token in ["Scheme", "kyber512", "3329", "regev_toy", "tfhe630", "∞"] {
        assert!(res.stdout.contains(token), "missing '{token}':\n{}", res.stdout);
    }
}

#[test]
fn test_cli_estimate_summary_and_details() {
    let res = run_forge(&["estimate", "--scheme", "regev_toy"]);
    assert!(res.success, "STDERR:\n{}", res.stderr);

    assert!(res.stdout.contains("LweParameters(n=64, q=1099511627776"));
    for column in ["exhaustive_search", "mitm", "coded_bkw"] {
        assert!(res.stdout.contains(column), "missing column '{column}'");
    }

    let magnitudes = row_magnitudes(&res.stdout, "regev_toy");
    if magnitudes.len() != 3 {
        println!("STDOUT:\n{}", res.stdout);
        panic!("expected three priced cells, got {magnitudes:?}");
    }
    assert!((magnitudes[0] - 73.6).abs() < 0.05, "exhaustive: {magnitudes:?}");
    assert!((magnitudes[1] - 37.0).abs() < 0.05, "mitm: {magnitudes:?}");
    assert!(magnitudes[2] > 37.0, "coded_bkw: {magnitudes:?}");

    // Detail tables follow the summary, one per model.
    for token in ["rop", "mem", "coded-bkw"] {
        assert!(res.stdout.contains(token), "missing detail '{token}'");
    }
}

#[test]
fn test_cli_estimate_model_filter_and_numerical_mitm() {
    let res = run_forge(&[
        "estimate",
        "--scheme",
        "regev_toy",
        "--models",
        "mitm",
        "--mitm-optimization",
        "numerical",
    ]);
    assert!(res.success, "STDERR:\n{}", res.stderr);
    assert!(res.stdout.contains("≈2^39.2"), "STDOUT:\n{}", res.stdout);
    assert!(!res.stdout.contains("exhaustive_search"));
}

#[test]
fn test_cli_estimate_explicit_instance() {
    let res = run_forge(&[
        "estimate",
        "--n",
        "64",
        "--q",
        "1099511627776",
        "--secret",
        "uniformmod:2",
        "--error",
        "gaussian:3.2",
        "--models",
        "exhaustive_search",
    ]);
    assert!(res.success, "STDERR:\n{}", res.stderr);
    // Identical numbers to the named toy scheme, under the fallback tag.
    assert!(res.stdout.contains("custom"));
    assert!(res.stdout.contains("≈2^73.6"), "STDOUT:\n{}", res.stdout);
}

#[test]
fn test_cli_estimate_json() {
    let res = run_forge(&["estimate", "--scheme", "regev_toy", "--json"]);
    assert!(res.success, "STDERR:\n{}", res.stderr);
    assert!(
        res.stdout.trim_start().starts_with('['),
        "tables leaked into a JSON dump:\n{}",
        res.stdout
    );

    let v: serde_json::Value = serde_json::from_str(&res.stdout).expect("invalid JSON");
    assert_eq!(v[0]["params"]["tag"], "regev_toy");
    let mitm_rop = v[0]["estimates"]["mitm"]["rop"].as_f64().unwrap();
    assert!((mitm_rop.log2() - 37.0).abs() < 0.05, "mitm rop {mitm_rop}");
    let exh_rop = v[0]["estimates"]["exhaustive_search"]["rop"].as_f64().unwrap();
    assert!((exh_rop.log2() - 73.626).abs() < 0.05, "exhaustive rop {exh_rop}");
    assert!(v[0]["estimates"]["coded_bkw"].is_object());
}

#[test]
fn test_cli_batch_from_csv() {
    let ctx = CsvContext::new();
    let res = run_forge(&[
        "batch",
        "--file",
        ctx.path.to_str().unwrap(),
        "--models",
        "exhaustive_search",
        "--jobs",
        "2",
    ]);
    assert!(res.success, "STDERR:\n{}", res.stderr);
    assert!(res.stdout.contains("toy64"));
    assert!(res.stdout.contains("kyber512"));
    assert!(res.stdout.contains("≈2^73.6"), "STDOUT:\n{}", res.stdout);
    // Kyber's 1024 samples cannot feed exhaustive search; the run still
    // completes and flags the cell.
    assert!(res.stdout.contains("insufficient m"), "STDOUT:\n{}", res.stdout);
}

#[test]
fn test_cli_batch_json_keeps_per_model_verdicts() {
    let ctx = CsvContext::new();
    let res = run_forge(&[
        "batch",
        "--file",
        ctx.path.to_str().unwrap(),
        "--models",
        "mitm",
        "--json",
    ]);
    assert!(res.success, "STDERR:\n{}", res.stderr);

    let v: serde_json::Value = serde_json::from_str(&res.stdout).expect("invalid JSON");
    assert_eq!(v.as_array().map(|rows| rows.len()), Some(2));
    assert!(v[0]["estimates"]["mitm"]["rop"].as_f64().is_some());
    let starved = v[1]["estimates"]["mitm"]["error"].as_str().unwrap();
    assert!(starved.contains("Insufficient Samples"), "{starved}");
}

#[test]
fn test_cli_unknown_scheme_fails() {
    let res = run_forge(&["estimate", "--scheme", "atlantis"]);
    assert!(!res.success);
    assert!(res.stderr.contains("unknown scheme 'atlantis'"), "STDERR:\n{}", res.stderr);
}

#[test]
fn test_cli_estimate_requires_an_instance() {
    let res = run_forge(&["estimate"]);
    assert!(!res.success);
    assert!(res.stderr.contains("--scheme"), "STDERR:\n{}", res.stderr);
}

#[test]
fn test_cli_rejects_bad_distribution_spec() {
    let res = run_forge(&[
        "estimate",
        "--n",
        "64",
        "--q",
        "3329",
        "--secret",
        "triangle:3",
        "--error",
        "gaussian:3.2",
    ]);
    assert!(!res.success);
    assert!(
        res.stderr.contains("invalid noise distribution spec 'triangle:3'"),
        "STDERR:\n{}",
        res.stderr
    );
}

#[test]
fn test_cli_rejects_unknown_model() {
    let res = run_forge(&["estimate", "--scheme", "regev_toy", "--models", "dual"]);
    assert!(!res.success);
    assert!(res.stderr.contains("unknown attack model 'dual'"), "STDERR:\n{}", res.stderr);
}

#[test]
fn test_cli_rejects_bad_probability() {
    let res = run_forge(&[
        "estimate",
        "--scheme",
        "regev_toy",
        "--success-probability",
        "1.5",
    ]);
    assert!(!res.success);
    assert!(res.stderr.contains("success probability"), "STDERR:\n{}", res.stderr);
}

#[test]
fn test_cli_debug_logs_stay_on_stderr() {
    let res = run_forge(&[
        "estimate",
        "--scheme",
        "regev_toy",
        "--models",
        "mitm",
        "--mitm-optimization",
        "numerical",
        "--debug",
    ]);
    assert!(res.success, "STDERR:\n{}", res.stderr);
    assert!(res.stderr.contains("DEBUG"), "STDERR:\n{}", res.stderr);
    assert!(res.stderr.contains("batch:"), "STDERR:\n{}", res.stderr);
    assert!(!res.stdout.contains("DEBUG"), "logs leaked into STDOUT:\n{}", res.stdout);
}
