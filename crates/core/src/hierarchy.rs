// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Traversal and validation of the ticket hierarchy.
//!
//! Tickets are stored as a flat list with parent pointers. Nothing in the
//! schema forbids a cycle, so every walk keeps a visited set.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::ticket::{Ticket, TicketType};

/// A break of the epic → task → subtask contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An epic points at a parent.
    EpicHasParent { id: String },
    /// A ticket's parent has the wrong type.
    WrongParentType {
        id: String,
        expected: TicketType,
        actual: TicketType,
    },
    /// A ticket points at a parent that is not in the snapshot.
    MissingParent { id: String, parent_id: String },
    /// Following parent pointers from this ticket loops.
    Cycle { id: String },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::EpicHasParent { id } => write!(f, "{id}: epic cannot have a parent"),
            Violation::WrongParentType {
                id,
                expected,
                actual,
            } => write!(f, "{id}: parent must be {expected}, found {actual}"),
            Violation::MissingParent { id, parent_id } => {
                write!(f, "{id}: parent {parent_id} does not exist")
            }
            Violation::Cycle { id } => write!(f, "{id}: parent chain loops"),
        }
    }
}

/// Check that `parent` may hold a child of `child_type`.
pub fn check_parent(child_type: TicketType, parent: Option<&Ticket>) -> Result<()> {
    match (child_type.parent_type(), parent) {
        (None, Some(_)) => Err(Error::InvalidHierarchy(
            "an epic cannot have a parent".to_string(),
        )),
        (Some(expected), Some(parent)) if parent.ticket_type != expected => {
            Err(Error::InvalidHierarchy(format!(
                "a {child_type} must be placed under a {expected}, not a {}",
                parent.ticket_type
            )))
        }
        _ => Ok(()),
    }
}

/// Report every hierarchy violation in a project snapshot.
pub fn validate(tickets: &[Ticket]) -> Vec<Violation> {
    let by_id: HashMap<&str, &Ticket> = tickets.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut violations = Vec::new();

    for ticket in tickets {
        let Some(parent_id) = ticket.parent_id.as_deref() else {
            continue;
        };
        match (ticket.ticket_type.parent_type(), by_id.get(parent_id)) {
            (None, _) => violations.push(Violation::EpicHasParent {
                id: ticket.id.clone(),
            }),
            (Some(_), None) => violations.push(Violation::MissingParent {
                id: ticket.id.clone(),
                parent_id: parent_id.to_string(),
            }),
            (Some(expected), Some(parent)) if parent.ticket_type != expected => {
                violations.push(Violation::WrongParentType {
                    id: ticket.id.clone(),
                    expected,
                    actual: parent.ticket_type,
                })
            }
            _ => {}
        }

        let mut seen = HashSet::from([ticket.id.as_str()]);
        let mut cursor = ticket.parent_id.as_deref();
        while let Some(id) = cursor {
            if !seen.insert(id) {
                violations.push(Violation::Cycle {
                    id: ticket.id.clone(),
                });
                break;
            }
            cursor = by_id.get(id).and_then(|t| t.parent_id.as_deref());
        }
    }

    violations
}

/// Group tickets by parent ID, each group in sibling order.
pub fn children_by_parent(tickets: &[Ticket]) -> HashMap<Option<&str>, Vec<&Ticket>> {
    let mut map: HashMap<Option<&str>, Vec<&Ticket>> = HashMap::new();
    for ticket in tickets {
        map.entry(ticket.parent_id.as_deref()).or_default().push(ticket);
    }
    for siblings in map.values_mut() {
        siblings.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
    map
}

/// All descendants of `root_id`, breadth-first, excluding the root.
pub fn descendants(tickets: &[Ticket], root_id: &str) -> Result<Vec<String>> {
    let children = children_by_parent(tickets);
    let mut visited = HashSet::from([root_id.to_string()]);
    let mut queue = VecDeque::from([root_id.to_string()]);
    let mut out = Vec::new();

    while let Some(id) = queue.pop_front() {
        for child in children.get(&Some(id.as_str())).into_iter().flatten() {
            if !visited.insert(child.id.clone()) {
                return Err(Error::CycleDetected(child.id.clone()));
            }
            out.push(child.id.clone());
            queue.push_back(child.id.clone());
        }
    }

    Ok(out)
}

/// Depth-first walk yielding `(depth, ticket)` in display order.
///
/// Roots are tickets without a parent or whose parent is missing from the
/// snapshot. Tickets only reachable through a cycle are not yielded.
pub fn depth_first(tickets: &[Ticket]) -> Vec<(usize, &Ticket)> {
    let ids: HashSet<&str> = tickets.iter().map(|t| t.id.as_str()).collect();
    let children = children_by_parent(tickets);

    let mut roots: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| t.parent_id.as_deref().map_or(true, |p| !ids.contains(p)))
        .collect();
    roots.sort_by_key(|t| (t.ticket_type, t.order_index));

    let mut visited = HashSet::new();
    let mut out = Vec::with_capacity(tickets.len());
    let mut stack: Vec<(usize, &Ticket)> = roots.into_iter().rev().map(|t| (0, t)).collect();

    while let Some((depth, ticket)) = stack.pop() {
        if !visited.insert(ticket.id.as_str()) {
            continue;
        }
        out.push((depth, ticket));
        if let Some(kids) = children.get(&Some(ticket.id.as_str())) {
            for kid in kids.iter().rev() {
                stack.push((depth + 1, *kid));
            }
        }
    }

    out
}

/// New dense `order_index` values after moving `moved_id` to `new_index`.
///
/// `siblings` must be in current sibling order. Returns `(id, index)` pairs
/// only for tickets whose index changes.
pub fn reorder(
    siblings: &[Ticket],
    moved_id: &str,
    new_index: usize,
) -> Result<Vec<(String, i64)>> {
    let mut ids: Vec<&str> = siblings.iter().map(|t| t.id.as_str()).collect();
    let from = ids
        .iter()
        .position(|id| *id == moved_id)
        .ok_or_else(|| Error::TicketNotFound(moved_id.to_string()))?;
    let moved = ids.remove(from);
    ids.insert(new_index.min(ids.len()), moved);

    let current: HashMap<&str, i64> = siblings
        .iter()
        .map(|t| (t.id.as_str(), t.order_index))
        .collect();

    Ok(ids
        .into_iter()
        .enumerate()
        .filter_map(|(idx, id)| {
            let idx = i64::try_from(idx).ok()?;
            (current.get(id) != Some(&idx)).then(|| (id.to_string(), idx))
        })
        .collect())
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod tests;
