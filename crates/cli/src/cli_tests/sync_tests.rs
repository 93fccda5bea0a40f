// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;

#[test]
fn parse_preview_out_and_json() {
    match parse(&["preview", "web", "--out", "plan.json", "-o", "json"])
        .unwrap()
        .command
    {
        Command::Preview {
            project,
            out,
            output,
        } => {
            assert_eq!(project, "web");
            assert_eq!(out.as_deref(), Some("plan.json"));
            assert_eq!(output.output, OutputFormat::Json);
        }
        _ => panic!("Expected preview"),
    }
}

#[test]
fn parse_sync_with_plan() {
    match parse(&["sync", "web", "--plan", "plan.json"]).unwrap().command {
        Command::Sync { project, plan, .. } => {
            assert_eq!(project, "web");
            assert_eq!(plan.as_deref(), Some("plan.json"));
        }
        _ => panic!("Expected sync"),
    }
}

#[test]
fn parse_sync_without_plan() {
    match parse(&["sync", "web"]).unwrap().command {
        Command::Sync { plan, output, .. } => {
            assert_eq!(plan, None);
            assert_eq!(output.output, OutputFormat::Text);
        }
        _ => panic!("Expected sync"),
    }
}

#[test]
fn parse_import() {
    assert!(matches!(
        parse(&["import", "web", "-o", "json"]).unwrap().command,
        Command::Import { project, output }
            if project == "web" && output.output == OutputFormat::Json
    ));
}

#[test]
fn sync_requires_project() {
    assert!(parse(&["sync"]).is_err());
    assert!(parse(&["preview"]).is_err());
}
