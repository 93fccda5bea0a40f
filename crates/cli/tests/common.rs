// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Token variable that no test environment sets.
pub const UNSET_TOKEN_ENV: &str = "BACKLOG_CLI_TEST_TOKEN_UNSET";

pub fn backlog() -> Command {
    let mut cmd = cargo_bin_cmd!("backlog");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Helper to create an initialized temp directory with a project `web`.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    backlog()
        .args(["init", "--site-id", "cloud-1"])
        .current_dir(temp.path())
        .assert()
        .success();
    backlog()
        .args(["project", "add", "web", "Web storefront"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Point the tracker token at a variable that is never set.
pub fn use_unset_token(temp: &TempDir) {
    let path = temp.path().join(".backlog/config.toml");
    let config = std::fs::read_to_string(&path).unwrap();
    let config = config.replace(
        "token_env = \"BACKLOG_TRACKER_TOKEN\"",
        &format!("token_env = \"{UNSET_TOKEN_ENV}\""),
    );
    std::fs::write(&path, config).unwrap();
}

/// Helper to add a ticket and return its ID.
pub fn add_ticket(temp: &TempDir, ticket_type: &str, title: &str, parent: Option<&str>) -> String {
    let mut cmd = backlog();
    cmd.args(["ticket", "add", "web", ticket_type, title, "-o", "id"]);
    if let Some(parent) = parent {
        cmd.args(["--parent", parent]);
    }
    let output = cmd.current_dir(temp.path()).output().unwrap();
    assert!(output.status.success(), "ticket add failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
