//! Shared test utilities for flagenv CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory.
//!
//! Invariants / Assumptions:
//! - `FLAGENV_*` option variables from the host never reach the child process.

use assert_cmd::Command;

/// Returns a hermetic `flagenv` command for integration testing.
pub fn flagenv_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("flagenv");

    // Clear potential host leakage
    cmd.env_remove("FLAGENV_CASE")
        .env_remove("FLAGENV_FOLD")
        .env_remove("FLAGENV_PREFIX")
        .env_remove("RUST_LOG");

    cmd
}
