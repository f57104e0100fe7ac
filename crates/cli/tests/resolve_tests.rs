//! Integration tests for the `resolve` command.
//!
//! Test coverage:
//! - Values from the process environment, including indexed fallback keys.
//! - Values from a `.env` file, with repeated keys accumulating.
//! - Exit codes for unreadable sources and failed lookups.

mod common;

use common::flagenv_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_resolve_from_env() {
    flagenv_cmd()
        .env("FLAGENV_TEST_MAX_RETRIES", "4")
        .env_remove("FLAGENV_TEST_TIMEOUT")
        .args(["--prefix", "flagenv_test_", "resolve", "max-retries", "timeout"])
        .assert()
        .success()
        .stdout(
            "NAME\tKEY\tVALUES\n\
             max-retries\tFLAGENV_TEST_MAX_RETRIES\t4\n\
             timeout\tFLAGENV_TEST_TIMEOUT\tN/A\n",
        );
}

#[test]
fn test_resolve_indexed_env_keys() {
    flagenv_cmd()
        .env_remove("FLAGENV_TEST_PEER")
        .env("FLAGENV_TEST_PEER_1", "a:1")
        .env("FLAGENV_TEST_PEER_2", "b:2")
        .env("FLAGENV_TEST_PEER_4", "skipped")
        .args([
            "--prefix",
            "flagenv_test_",
            "resolve",
            "--index-sep",
            "_",
            "peer",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("peer\tFLAGENV_TEST_PEER\ta:1, b:2\n"));
}

#[test]
fn test_resolve_index_base_requires_separator() {
    flagenv_cmd()
        .args(["resolve", "--index-base", "0", "peer"])
        .assert()
        .code(2);
}

#[test]
fn test_resolve_from_dotenv_accumulates_repeated_keys() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "app.peer=a:1").unwrap();
    writeln!(file, "app.peer=b:2").unwrap();
    writeln!(file, "app.retries=4").unwrap();
    file.flush().unwrap();

    let output = flagenv_cmd()
        .args(["--case", "dot", "--fold", "lower", "--prefix", "app.", "-o", "json"])
        .arg("resolve")
        .arg("--dotenv")
        .arg(file.path())
        .args(["peer", "retries", "timeout"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            { "name": "peer", "key": "app.peer", "values": ["a:1", "b:2"] },
            { "name": "retries", "key": "app.retries", "values": ["4"] },
            { "name": "timeout", "key": "app.timeout", "values": [] },
        ])
    );
}

#[test]
fn test_resolve_missing_dotenv_returns_source_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    flagenv_cmd()
        .arg("resolve")
        .arg("--dotenv")
        .arg(dir.path().join("missing.env"))
        .arg("peer")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read values from"));
}

#[cfg(unix)]
#[test]
fn test_resolve_non_unicode_value_returns_load_exit_code() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    flagenv_cmd()
        .env("FLAGENV_TEST_BROKEN", OsStr::from_bytes(b"\xff\xfe"))
        .args(["--prefix", "flagenv_test_", "resolve", "broken"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains(
            "error looking up broken config with key FLAGENV_TEST_BROKEN",
        ));
}
