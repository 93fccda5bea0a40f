// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

//! Sync commands up to the point where they would reach the network.

mod common;
use common::*;
use yare::parameterized;

#[parameterized(
    preview = { &["preview", "web"] },
    sync = { &["sync", "web"] },
    import = { &["import", "web"] },
)]
fn unlinked_project_is_rejected(args: &[&str]) {
    let temp = init_temp();

    backlog()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not linked"))
        .stderr(predicate::str::contains("backlog project link web"));
}

#[parameterized(
    preview = { &["preview", "web"] },
    sync = { &["sync", "web"] },
    import = { &["import", "web"] },
    sites = { &["sites"] },
)]
fn missing_token_is_rejected(args: &[&str]) {
    let temp = init_temp();
    use_unset_token(&temp);
    backlog()
        .args(["project", "link", "web", "WEB"])
        .current_dir(temp.path())
        .assert()
        .success();

    backlog()
        .args(args)
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication failed"))
        .stderr(predicate::str::contains(UNSET_TOKEN_ENV));
}

#[test]
fn missing_token_json_envelope() {
    let temp = init_temp();
    use_unset_token(&temp);
    backlog()
        .args(["project", "link", "web", "WEB"])
        .current_dir(temp.path())
        .assert()
        .success();

    let output = backlog()
        .args(["preview", "web", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("authentication failed"));
}

#[test]
fn unreadable_plan_is_rejected() {
    let temp = init_temp();

    backlog()
        .args(["sync", "web", "--plan", "missing.json"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("io error"));
}

#[test]
fn remote_projects_need_site() {
    let temp = TempDir::new().unwrap();
    backlog()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();

    backlog()
        .arg("remote-projects")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("tracker.site_id is not set"));
}
