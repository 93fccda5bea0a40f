// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use bl_core::hierarchy::depth_first;
use bl_core::{Database, TicketStore};

use crate::error::Result;

use super::open_db;

pub fn run(project: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    for line in run_impl(&db, project)? {
        println!("{}", line);
    }
    Ok(())
}

/// Render a project's tickets as an indented tree.
pub(crate) fn run_impl(db: &Database, project: &str) -> Result<Vec<String>> {
    let project = db.get_project(project)?;
    let tickets = db.list_tickets(&project.id)?;

    let mut lines = vec![match &project.remote_project_key {
        Some(key) => format!("{} ({}) -> {}", project.name, project.id, key),
        None => format!("{} ({})", project.name, project.id),
    }];
    for (depth, ticket) in depth_first(&tickets) {
        let remote = ticket
            .remote_id
            .as_deref()
            .map(|key| format!(" [{}]", key))
            .unwrap_or_default();
        lines.push(format!(
            "{}- {} {}: {}{}",
            "  ".repeat(depth + 1),
            ticket.ticket_type,
            ticket.id,
            ticket.title,
            remote
        ));
    }
    if tickets.is_empty() {
        lines.push("  (no tickets)".to_string());
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
