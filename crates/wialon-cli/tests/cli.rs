use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("wialon"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> std::path::PathBuf {
    repo_root().join("tests").join("fixtures").join(name)
}

fn stdout_json(args: &[&str], input: std::path::PathBuf) -> Value {
    let assert = cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .args(args)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn help_supports_decode_and_parse() {
    cmd().arg("decode").arg("--help").assert().success();
    cmd().arg("parse").arg("--help").assert().success();
}

#[test]
fn long_version_carries_build_metadata() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(
            contains(env!("CARGO_PKG_VERSION"))
                .and(contains("(commit "))
                .and(contains(", built ")),
        );
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.hex");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_login_report() {
    let value = stdout_json(&[], fixture("login.hex"));
    assert_eq!(value["packet"]["payload"]["type"], "login");
    assert_eq!(value["packet"]["payload"]["id"]["value"], 860103063062252u64);
    assert_eq!(value["packet"]["crc"]["valid"], true);
    assert_eq!(value["packet"]["response"]["raw_bytes"], "4040000000");
    assert_eq!(value["tool"]["name"], "wialon");
}

#[test]
fn records_only_outputs_array() {
    let value = stdout_json(&["--records-only"], fixture("data_seq1.hex"));
    let records = value.as_array().expect("records array");
    assert_eq!(records.len(), 17);
    assert_eq!(records[0]["type"], "position_data");
    assert_eq!(records[0]["time"], 1691389688);
    assert_eq!(records[1]["type"], "custom_parameter");
}

#[test]
fn binary_input_is_decoded() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("keepalive.bin");
    std::fs::write(&input, [0x24, 0x24, 0x02, 0x00, 0x05, 0x00, 0x00, 0x27, 0x0b]).unwrap();
    let value = stdout_json(&[], input);
    assert_eq!(value["packet"]["payload"]["type"], "keep_alive");
    assert_eq!(value["packet"]["sequence"], 5);
}

#[test]
fn report_written_to_file() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("out").join("report.json");

    cmd()
        .arg("decode")
        .arg(fixture("data_seq2.hex"))
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let json = std::fs::read_to_string(&report).expect("report written");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["summary"]["records_total"], 15);
    assert_eq!(value["input"]["packet_bytes"], 99);
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(fixture("login.hex"))
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(fixture("login.hex"))
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .arg("decode")
        .arg(fixture("login.hex"))
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn strict_fails_on_crc_mismatch() {
    cmd()
        .arg("decode")
        .arg(fixture("login_bad_crc.hex"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("CRC check failed").and(contains("CRC error")));
}

#[test]
fn crc_mismatch_without_strict_succeeds() {
    cmd()
        .arg("decode")
        .arg(fixture("login_bad_crc.hex"))
        .arg("--stdout")
        .assert()
        .success()
        .stderr(contains("warning: CRC mismatch"));
}

#[test]
fn bad_header_fails_decode() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("bad.hex");
    std::fs::write(&input, "25 25 01 00 02 00 5a").unwrap();

    cmd()
        .arg("decode")
        .arg(input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("invalid packet head"));
}

#[test]
fn ack_prints_wire_bytes() {
    cmd()
        .arg("ack")
        .arg("4")
        .arg("258")
        .assert()
        .success()
        .stdout(contains("4040040102").and(contains("CRC error")));
}

#[test]
fn crc_prints_checksum() {
    cmd()
        .arg("crc")
        .arg("24 24 02 00 05 00 00")
        .assert()
        .success()
        .stdout(contains("0x270B"));
}

#[test]
fn crc_rejects_odd_hex() {
    cmd()
        .arg("crc")
        .arg("242")
        .assert()
        .failure()
        .stderr(contains("odd number of hex digits"));
}
