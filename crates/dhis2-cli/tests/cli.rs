//! Runs the `dhis2-utils` binary end to end.

use std::io::Write;
use std::process::{Command, Output};

use dhis2_cli::output::{UidFormat, write_uids};
use dhis2_uid::{DEFAULT_UID_LENGTH, ThreadRandom, generate_uids, is_valid_uid};
use serde_json::Value;
use tempfile::NamedTempFile;

fn dhis2_utils(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dhis2-utils"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn assert_codes(codes: &Value, count: usize) {
    let codes = codes.as_array().unwrap();
    assert_eq!(codes.len(), count);
    assert!(codes.iter().all(|code| is_valid_uid(code.as_str().unwrap())));
}

#[test]
fn test_json_output_shape() {
    let codes = generate_uids(3, DEFAULT_UID_LENGTH, &mut ThreadRandom::new());
    let mut buffer = Vec::new();
    write_uids(&mut buffer, &codes, UidFormat::Json).unwrap();
    let json: Value = serde_json::from_slice(&buffer).unwrap();
    assert_codes(&json["codes"], 3);
}

#[test]
fn test_uid_json() {
    let output = dhis2_utils(&["uid", "--limit", "3", "--json"]);
    assert!(output.status.success());
    let json: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_codes(&json["codes"], 3);
}

#[test]
fn test_uid_default_output() {
    let output = dhis2_utils(&["uid"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let codes: Vec<&str> = text.trim_end().split(' ').collect();
    assert_eq!(codes.len(), 10);
    assert!(codes.iter().all(|code| is_valid_uid(code)));
}

#[test]
fn test_uid_csv() {
    let output = dhis2_utils(&["uid", "-l", "2", "--csv"]);
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "codes");
}

#[test]
fn test_uid_seed_is_reproducible() {
    let first = stdout(&dhis2_utils(&["uid", "-l", "3", "--seed", "123123"]));
    let second = stdout(&dhis2_utils(&["uid", "-l", "3", "--seed", "123123"]));
    assert_eq!(first, "yKsLePZEg44 kfN3vElj7in rhNv16pTjjc\n");
    assert_eq!(first, second);
}

#[test]
fn test_no_arguments_prints_help() {
    let output = dhis2_utils(&[]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("uid"));
    assert!(stdout(&output).contains("seed"));
}

#[test]
fn test_seed_missing_config_keys() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"server": "http://127.0.0.1:9"}}"#).unwrap();

    let output = dhis2_utils(&["seed", "--config", config.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("username, password"));
}

#[test]
fn test_seed_missing_config_file() {
    let output = dhis2_utils(&["seed", "--config", "/nonexistent/config.json"]);
    assert_eq!(output.status.code(), Some(1));
}
