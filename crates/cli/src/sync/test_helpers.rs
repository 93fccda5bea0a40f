// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use bl_core::{Database, Document, NewTicket, Ticket, TicketStore, TicketType};

use super::tracker::{RemoteIssue, RemoteIssueType};

pub const SITE: &str = "cloud-1";
pub const PROJECT: &str = "web";
pub const KEY: &str = "WEB";

pub fn issue_type(id: &str, name: &str, is_subtask: bool) -> RemoteIssueType {
    RemoteIssueType {
        id: id.to_string(),
        name: name.to_string(),
        is_subtask,
    }
}

/// Issue types of a typical software project.
pub fn standard_issue_types() -> Vec<RemoteIssueType> {
    vec![
        issue_type("10001", "Story", false),
        issue_type("10002", "Task", false),
        issue_type("10003", "Bug", false),
        issue_type("10000", "Epic", false),
        issue_type("10004", "Subtask", true),
    ]
}

/// A remote issue of the named type with a plain-text description.
pub fn remote_issue(
    key: &str,
    summary: &str,
    description: &str,
    type_name: &str,
    parent_key: Option<&str>,
) -> RemoteIssue {
    let is_subtask = matches!(type_name.to_lowercase().as_str(), "subtask" | "sub-task");
    RemoteIssue {
        key: key.to_string(),
        summary: summary.to_string(),
        description: Some(Document::from_plain_text(description)),
        issue_type: issue_type("0", type_name, is_subtask),
        parent_key: parent_key.map(String::from),
    }
}

/// In-memory database with one project linked to `WEB`.
pub fn linked_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.create_project(PROJECT, "Web storefront", None).unwrap();
    db.link_project(PROJECT, KEY).unwrap();
    db
}

pub fn add_ticket(
    db: &Database,
    ticket_type: TicketType,
    title: &str,
    parent: Option<&Ticket>,
    remote_id: Option<&str>,
) -> Ticket {
    let mut new = NewTicket::new(PROJECT, ticket_type, title)
        .with_order(db.next_order_index(PROJECT, parent.map(|p| p.id.as_str())).unwrap());
    if let Some(parent) = parent {
        new = new.with_parent(&parent.id);
    }
    if let Some(remote_id) = remote_id {
        new = new.with_remote_id(remote_id);
    }
    db.insert_ticket(&new).unwrap()
}

pub fn add_described(
    db: &Database,
    ticket_type: TicketType,
    title: &str,
    description: &str,
    remote_id: Option<&str>,
) -> Ticket {
    let mut new = NewTicket::new(PROJECT, ticket_type, title).with_description(description);
    if let Some(remote_id) = remote_id {
        new = new.with_remote_id(remote_id);
    }
    db.insert_ticket(&new).unwrap()
}
