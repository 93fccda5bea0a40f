// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;

#[test]
fn parse_project_add() {
    let cli = parse(&["project", "add", "web", "Web storefront", "--source", "prd.md"]).unwrap();
    match cli.command {
        Command::Project(ProjectCommand::Add { id, name, source }) => {
            assert_eq!(id, "web");
            assert_eq!(name, "Web storefront");
            assert_eq!(source.as_deref(), Some("prd.md"));
        }
        _ => panic!("Expected project add"),
    }
}

#[test]
fn parse_project_add_rejects_blank_name() {
    assert!(parse(&["project", "add", "web", "  "]).is_err());
}

#[test]
fn parse_project_link() {
    let cli = parse(&["project", "link", "web", "WEB"]).unwrap();
    match cli.command {
        Command::Project(ProjectCommand::Link { id, key }) => {
            assert_eq!((id.as_str(), key.as_str()), ("web", "WEB"));
        }
        _ => panic!("Expected project link"),
    }
}

#[test]
fn parse_project_list_output() {
    let cli = parse(&["project", "list", "-o", "json"]).unwrap();
    match cli.command {
        Command::Project(ProjectCommand::List { output }) => {
            assert_eq!(output.output, OutputFormat::Json);
        }
        _ => panic!("Expected project list"),
    }
}

#[test]
fn parse_init_options() {
    let cli = parse(&["init", "--site-id", "1a2b3c", "--workspace", "../shared"]).unwrap();
    match cli.command {
        Command::Init {
            path,
            workspace,
            site_id,
        } => {
            assert_eq!(path, None);
            assert_eq!(workspace.as_deref(), Some("../shared"));
            assert_eq!(site_id.as_deref(), Some("1a2b3c"));
        }
        _ => panic!("Expected init"),
    }
}
