// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Load a generated backlog tree.
//!
//! Input is a JSON list of epics; each node may carry `children`, one level
//! per ticket type. The whole tree is validated before anything is written.

use std::io::Read;

use bl_core::{Database, NewTicket, TicketStore, TicketType};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

use super::{emit, open_db};

/// One node of a generated tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeNode {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// Tickets created by a load, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub created: Vec<String>,
    pub epics: usize,
    pub tasks: usize,
    pub subtasks: usize,
}

pub fn run(project: &str, file: &str, format: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let content = if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };

    let result = parse_tree(&content).and_then(|nodes| run_impl(&db, project, &nodes));
    emit(format, result, |report| match format {
        OutputFormat::Id => report.created.iter().for_each(|id| println!("{}", id)),
        _ => println!(
            "Loaded {} epic(s), {} task(s), {} subtask(s) into {}",
            report.epics, report.tasks, report.subtasks, project
        ),
    })
}

pub(crate) fn parse_tree(content: &str) -> Result<Vec<TreeNode>> {
    serde_json::from_str(content).map_err(|e| Error::InvalidTree(e.to_string()))
}

/// Check depth and titles of every node.
pub(crate) fn validate_tree(nodes: &[TreeNode]) -> Result<()> {
    let mut stack: Vec<(usize, &TreeNode)> = nodes.iter().map(|n| (0, n)).collect();
    while let Some((level, node)) = stack.pop() {
        let Some(ticket_type) = TicketType::from_level(level) else {
            return Err(Error::InvalidTree(format!(
                "'{}' is nested deeper than subtask level",
                node.title
            )));
        };
        if node.title.trim().is_empty() {
            return Err(Error::InvalidTree(format!(
                "a {} at depth {} has an empty title",
                ticket_type,
                level + 1
            )));
        }
        stack.extend(node.children.iter().map(|c| (level + 1, c)));
    }
    Ok(())
}

pub(crate) fn run_impl(db: &Database, project: &str, nodes: &[TreeNode]) -> Result<LoadReport> {
    db.get_project(project)?;
    validate_tree(nodes)?;

    let mut report = LoadReport::default();
    let start = db.next_order_index(project, None)?;
    insert_level(db, project, nodes, None, 0, start, &mut report)?;

    info!(
        project,
        created = report.created.len(),
        "loaded generated tree"
    );
    Ok(report)
}

fn insert_level(
    db: &Database,
    project: &str,
    nodes: &[TreeNode],
    parent_id: Option<&str>,
    level: usize,
    start: i64,
    report: &mut LoadReport,
) -> Result<()> {
    if nodes.is_empty() {
        return Ok(());
    }
    let ticket_type = TicketType::from_level(level)
        .ok_or_else(|| Error::InvalidTree(format!("depth {} is not a ticket level", level + 1)))?;

    for (order, node) in (start..).zip(nodes) {
        let mut new = NewTicket::new(project, ticket_type, node.title.trim())
            .with_description(node.description.as_str())
            .with_order(order);
        if let Some(parent_id) = parent_id {
            new = new.with_parent(parent_id);
        }
        let ticket = db.insert_ticket(&new)?;
        match ticket_type {
            TicketType::Epic => report.epics += 1,
            TicketType::Task => report.tasks += 1,
            TicketType::Subtask => report.subtasks += 1,
        }
        report.created.push(ticket.id.clone());
        insert_level(db, project, &node.children, Some(&ticket.id), level + 1, 0, report)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
