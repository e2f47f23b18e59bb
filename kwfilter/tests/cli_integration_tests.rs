// kwfilter/tests/cli_integration_tests.rs
//! Command-line integration tests for the `kwfilter` binary.
//!
//! Each test runs the compiled binary through `assert_cmd`, feeding input on
//! stdin or through `tempfile` files, and checks stdout, stderr and the exit
//! status. Console output may carry ANSI colors, so stderr is stripped before
//! plain-text comparison.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

use strip_ansi_escapes::strip as strip_ansi_escapes_fn;

fn kwfilter() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("kwfilter"));
    cmd.env_remove("KWFILTER_CONFIG");
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn strip_ansi(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes_fn(bytes)).to_string()
}

fn config_file(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

const BRAND_RULES: &str = r#"
rules:
  - name: cast
    kind: mask
    keywords: [AV, ACTOR, AVAC]
  - name: filler_words
    kind: remove
    keywords: ["um "]
"#;

#[test]
fn filter_masks_nested_keywords_from_stdin() -> Result<()> {
    let config = config_file(BRAND_RULES)?;
    let output = kwfilter()
        .args(["filter", "--config"])
        .arg(config.path())
        .write_stdin("um AVACTOR said hi\n")
        .output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "******* said hi\n");
    let stderr = strip_ansi(&output.stderr);
    assert!(stderr.contains("cast (3 occurrences)"), "stderr was: {}", stderr);
    assert!(stderr.contains("filler_words (1 occurrences)"));
    Ok(())
}

#[test]
fn filter_pipeline_normalizes_query() {
    kwfilter()
        .args(["filter", "--engine", "pipeline", "--no-summary"])
        .write_stdin("Can you   find K8S jobs in NYC")
        .assert()
        .success()
        .stdout("find kubernetes jobs in new_york")
        .stderr("");
}

#[test]
fn filter_writes_output_file() -> Result<()> {
    let input = NamedTempFile::new()?;
    fs::write(input.path(), "my password: hunter2\n")?;
    let out_dir = tempfile::tempdir()?;
    let out_path = out_dir.path().join("filtered.txt");

    kwfilter()
        .args(["--quiet", "filter", "-e", "credentials", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(&out_path)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&out_path)?, "my ********: hunter2\n");
    Ok(())
}

#[test]
fn filter_json_summary_goes_to_stderr() -> Result<()> {
    let output = kwfilter()
        .args(["filter", "--engine", "pipeline", "--json-summary"])
        .write_stdin("golang")
        .output()?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "go");
    let report: serde_json::Value = serde_json::from_slice(&output.stderr)?;
    assert_eq!(report["source"], "stdin");
    assert_eq!(report["total_matches"], 1);
    assert_eq!(report["rules"][0]["rule_name"], "synonyms");
    Ok(())
}

#[test]
fn filter_rejects_invalid_config() -> Result<()> {
    let config = config_file("rules:\n  - name: bad\n    keywords: [x]\n    mask_char: \"##\"\n")?;
    kwfilter()
        .args(["filter", "--config"])
        .arg(config.path())
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one Unicode scalar value"));
    Ok(())
}

#[test]
fn scan_json_stdout_reports_counts() -> Result<()> {
    let output = kwfilter()
        .args(["scan", "--engine", "pipeline", "--json-stdout"])
        .write_stdin("nyc and NYC and k8s")
        .output()?;
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["total_matches"], 3);
    assert_eq!(report["rules"][0]["occurrences"], 3);
    Ok(())
}

#[test]
fn scan_fail_over_threshold() {
    kwfilter()
        .args(["scan", "--engine", "pipeline", "--fail-over-threshold", "1"])
        .write_stdin("nyc and k8s")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "FAIL-OVER triggered: Found 2 keyword matches, which exceeds the specified threshold of 1.",
        ));
}

#[test]
fn scan_under_threshold_succeeds() {
    kwfilter()
        .args(["scan", "--engine", "pipeline", "--fail-over-threshold", "5", "-x", "synonyms"])
        .write_stdin("nyc and k8s")
        .assert()
        .success()
        .stderr(predicate::str::contains("No keywords matched."));
}

#[test]
fn replace_cascades_to_fixed_point() {
    kwfilter()
        .args(["replace", "--map", "AB=X", "--map", "XC=Y"])
        .write_stdin("ABC ABD")
        .assert()
        .success()
        .stdout("Y XD");
}

#[test]
fn replace_reports_truncation() {
    kwfilter()
        .args(["replace", "-m", "a=b", "-m", "b=a", "--max-cascades", "3"])
        .write_stdin("a")
        .assert()
        .success()
        .stdout("b")
        .stderr(predicate::str::contains("Stopped after 3 substitutions"));
}

#[test]
fn replace_rejects_malformed_pair() {
    kwfilter()
        .args(["replace", "--map", "nonsense"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected FROM=TO"));
}

#[test]
fn version_cmp_prints_ordering() {
    kwfilter().args(["version-cmp", "v1.10", "1.9"]).assert().success().stdout(">\n");
    kwfilter().args(["version-cmp", "release-2.0", "2"]).assert().success().stdout("=\n");
    kwfilter().args(["version-cmp", "1.0.0-rc1", "1.0.0"]).assert().success().stdout("<\n");
}

#[test]
fn invalid_utf8_input_is_replaced() {
    kwfilter()
        .args(["--quiet", "filter", "--engine", "pipeline"])
        .write_stdin(&b"nyc \xff"[..])
        .assert()
        .success()
        .stdout("new_york \u{FFFD}");
}
