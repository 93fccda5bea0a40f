// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use bl_core::hierarchy::{check_parent, children_by_parent, descendants, reorder};
use bl_core::{Database, NewTicket, Ticket, TicketPatch, TicketStore, TicketType};
use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

use super::{emit, open_db};

pub fn add(
    project: &str,
    ticket_type: TicketType,
    title: &str,
    parent: Option<&str>,
    description: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let (db, _, _) = open_db()?;
    let result = add_impl(&db, project, ticket_type, title, parent, description);
    emit(format, result, |ticket| match format {
        OutputFormat::Id => println!("{}", ticket.id),
        _ => println!(
            "Created {} {}: {}",
            ticket.ticket_type, ticket.id, ticket.title
        ),
    })
}

/// Insert a ticket at the end of its sibling list.
pub(crate) fn add_impl(
    db: &Database,
    project: &str,
    ticket_type: TicketType,
    title: &str,
    parent: Option<&str>,
    description: Option<&str>,
) -> Result<Ticket> {
    db.get_project(project)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::FieldEmpty { field: "title" });
    }

    let parent = parent.map(|id| db.get_ticket(id)).transpose()?;
    if let Some(parent) = &parent {
        if parent.project_id != project {
            return Err(bl_core::Error::InvalidHierarchy(format!(
                "parent {} belongs to project '{}'",
                parent.id, parent.project_id
            ))
            .into());
        }
    }
    check_parent(ticket_type, parent.as_ref())?;

    let parent_id = parent.as_ref().map(|p| p.id.as_str());
    let mut new = NewTicket::new(project, ticket_type, title)
        .with_order(db.next_order_index(project, parent_id)?);
    if let Some(parent_id) = parent_id {
        new = new.with_parent(parent_id);
    }
    if let Some(description) = description {
        new = new.with_description(description);
    }
    Ok(db.insert_ticket(&new)?)
}

pub fn edit(id: &str, field: &str, value: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    edit_impl(&db, id, field, value)?;
    println!("Updated {} of {}", field, id);
    Ok(())
}

pub(crate) fn edit_impl(db: &Database, id: &str, field: &str, value: &str) -> Result<()> {
    let patch = match field {
        "title" => {
            let title = value.trim();
            if title.is_empty() {
                return Err(Error::FieldEmpty { field: "title" });
            }
            TicketPatch {
                title: Some(title.to_string()),
                ..TicketPatch::default()
            }
        }
        "description" => TicketPatch {
            description: Some(value.to_string()),
            ..TicketPatch::default()
        },
        _ => return Err(Error::UnknownField(field.to_string())),
    };
    db.get_ticket(id)?;
    db.update_ticket(id, &patch)?;
    Ok(())
}

pub fn move_to(id: &str, index: usize) -> Result<()> {
    let (db, _, _) = open_db()?;
    let moved = move_impl(&db, id, index)?;
    println!("Moved {} ({} sibling(s) renumbered)", id, moved);
    Ok(())
}

/// Move a ticket to `index` among its siblings and renumber them densely.
///
/// Returns the number of tickets whose `order_index` changed.
pub(crate) fn move_impl(db: &Database, id: &str, index: usize) -> Result<usize> {
    let ticket = db.get_ticket(id)?;
    let tickets = db.list_tickets(&ticket.project_id)?;
    let siblings: Vec<Ticket> = children_by_parent(&tickets)
        .remove(&ticket.parent_id.as_deref())
        .unwrap_or_default()
        .into_iter()
        .cloned()
        .collect();

    let changes = reorder(&siblings, id, index)?;
    for (sibling_id, order_index) in &changes {
        debug!(%sibling_id, order_index, "renumbering sibling");
        db.update_ticket(
            sibling_id,
            &TicketPatch {
                order_index: Some(*order_index),
                ..TicketPatch::default()
            },
        )?;
    }
    Ok(changes.len())
}

pub fn delete(id: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    let deleted = delete_impl(&db, id)?;
    println!("Deleted {} ticket(s)", deleted.len());
    Ok(())
}

/// Delete a ticket and all of its descendants, deepest first.
///
/// Returns the deleted IDs in deletion order.
pub(crate) fn delete_impl(db: &Database, id: &str) -> Result<Vec<String>> {
    let ticket = db.get_ticket(id)?;
    let tickets = db.list_tickets(&ticket.project_id)?;

    let mut order = descendants(&tickets, id)?;
    order.reverse();
    order.push(ticket.id);
    for ticket_id in &order {
        db.delete_ticket(ticket_id)?;
    }
    Ok(order)
}

#[derive(Serialize)]
struct TicketList {
    tickets: Vec<Ticket>,
}

pub fn list(project: &str, format: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let result = list_impl(&db, project).map(|tickets| TicketList { tickets });
    emit(format, result, |list| {
        for ticket in &list.tickets {
            match format {
                OutputFormat::Id => println!("{}", ticket.id),
                _ => println!("{}", format_ticket_line(ticket)),
            }
        }
    })
}

pub(crate) fn list_impl(db: &Database, project: &str) -> Result<Vec<Ticket>> {
    db.get_project(project)?;
    Ok(db.list_tickets(project)?)
}

/// `web-1a2b  task     Cart  [WEB-7]`
pub(crate) fn format_ticket_line(ticket: &Ticket) -> String {
    let mut line = format!(
        "{}  {:<7}  {}",
        ticket.id,
        ticket.ticket_type.as_str(),
        ticket.title
    );
    if let Some(remote_id) = &ticket.remote_id {
        line.push_str(&format!("  [{}]", remote_id));
    }
    line
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
