// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Upserts remote issues into the local store.

use std::collections::{HashMap, HashSet};

use bl_core::rich_text::{normalize, plain_text};
use bl_core::{NewTicket, Ticket, TicketPatch, TicketStore, TicketType};
use tracing::{debug, info, warn};

use super::change::ImportReport;
use super::tracker::{fetch_all, project_filter, RemoteIssue, RemoteIssueType, Tracker};
use super::SyncEngine;
use crate::error::Result;

/// Local ticket type for a remote issue type.
pub fn classify_issue_type(issue_type: &RemoteIssueType) -> TicketType {
    let name = issue_type.name.trim().to_lowercase();
    if issue_type.is_subtask || name == "sub-task" || name == "subtask" {
        TicketType::Subtask
    } else if name == "epic" {
        TicketType::Epic
    } else {
        TicketType::Task
    }
}

/// Working copy of the project while an import runs.
struct Snapshot {
    tickets: Vec<Ticket>,
    /// Remote key to local ticket ID.
    by_key: HashMap<String, String>,
    /// Tickets already matched by an issue in this import.
    claimed: HashSet<String>,
}

impl Snapshot {
    fn new(tickets: Vec<Ticket>) -> Self {
        let by_key = tickets
            .iter()
            .filter_map(|t| t.remote_id.clone().map(|key| (key, t.id.clone())))
            .collect();
        Snapshot {
            tickets,
            by_key,
            claimed: HashSet::new(),
        }
    }

    fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Ticket> {
        self.tickets.iter_mut().find(|t| t.id == id)
    }

    /// Linked ticket first, then an unlinked ticket with the same title and type.
    fn find_match(&self, issue: &RemoteIssue, ticket_type: TicketType) -> Option<String> {
        if let Some(id) = self.by_key.get(&issue.key) {
            return Some(id.clone());
        }
        self.tickets
            .iter()
            .find(|t| {
                t.remote_id.is_none()
                    && !self.claimed.contains(&t.id)
                    && t.ticket_type == ticket_type
                    && t.title == issue.summary
            })
            .map(|t| t.id.clone())
    }

    /// Local parent for an issue, if its parent was imported at the right level.
    fn parent_for(&self, issue: &RemoteIssue, ticket_type: TicketType) -> Option<String> {
        let parent_type = ticket_type.parent_type()?;
        let parent_key = issue.parent_key.as_deref()?;
        let parent = self.by_key.get(parent_key).and_then(|id| self.get(id));
        match parent {
            Some(parent) if parent.ticket_type == parent_type => Some(parent.id.clone()),
            Some(parent) => {
                warn!(
                    key = %issue.key,
                    parent_key,
                    parent_type = %parent.ticket_type,
                    "parent has the wrong type, importing without parent"
                );
                None
            }
            None => {
                warn!(
                    key = %issue.key,
                    parent_key,
                    "parent not found locally, importing without parent"
                );
                None
            }
        }
    }

    /// First free sibling slot under `parent_id`.
    fn next_order_index(&self, parent_id: Option<&str>) -> i64 {
        self.tickets
            .iter()
            .filter(|t| t.parent_id.as_deref() == parent_id)
            .map(|t| t.order_index + 1)
            .max()
            .unwrap_or(0)
    }
}

impl<T: Tracker + ?Sized, S: TicketStore + ?Sized> SyncEngine<'_, T, S> {
    /// Pull every remote issue of a project into the local store.
    ///
    /// Issues are processed epics first, then tasks, then subtasks, so that
    /// parents always exist before their children. A failed remote scan
    /// aborts the import before anything is written.
    pub async fn import_all(&self, project_id: &str, project_key: &str) -> Result<ImportReport> {
        info!(project_id, project_key, "importing remote issues");
        let (issues, err) = fetch_all(
            self.tracker,
            &self.site_id,
            &project_filter(project_key),
            self.page_size,
        )
        .await;
        if let Some(e) = err {
            return Err(e.into());
        }

        let mut snapshot = Snapshot::new(self.store.list_tickets(project_id)?);
        let mut report = ImportReport::default();
        let mut seen = HashSet::new();
        let issues: Vec<&RemoteIssue> = issues
            .iter()
            .filter(|issue| seen.insert(issue.key.as_str()))
            .collect();

        for level in TicketType::LEVELS {
            for issue in issues
                .iter()
                .copied()
                .filter(|issue| classify_issue_type(&issue.issue_type) == level)
            {
                self.import_issue(project_id, issue, level, &mut snapshot, &mut report)?;
            }
        }

        report.imported_count = report.inserted.len() + report.updated.len();
        info!(
            project_id,
            inserted = report.inserted.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged,
            "import finished"
        );
        Ok(report)
    }

    fn import_issue(
        &self,
        project_id: &str,
        issue: &RemoteIssue,
        ticket_type: TicketType,
        snapshot: &mut Snapshot,
        report: &mut ImportReport,
    ) -> Result<()> {
        let description = plain_text(issue.description.as_ref());
        let parent_id = snapshot.parent_for(issue, ticket_type);

        if let Some(id) = snapshot.find_match(issue, ticket_type) {
            // A moved ticket takes the next free slot under its new parent
            let order_index = snapshot
                .get(&id)
                .is_some_and(|t| t.parent_id != parent_id)
                .then(|| snapshot.next_order_index(parent_id.as_deref()));
            let Some(ticket) = snapshot.get_mut(&id) else {
                return Ok(());
            };
            let patch = TicketPatch {
                ticket_type: (ticket.ticket_type != ticket_type).then_some(ticket_type),
                title: (ticket.title != issue.summary).then(|| issue.summary.clone()),
                description: (normalize(&ticket.description) != normalize(&description))
                    .then(|| description.clone()),
                parent_id: (ticket.parent_id != parent_id).then(|| parent_id.clone()),
                order_index,
                remote_id: (ticket.remote_id.as_deref() != Some(issue.key.as_str()))
                    .then(|| Some(issue.key.clone())),
            };

            if patch.is_empty() {
                debug!(ticket_id = %id, key = %issue.key, "ticket already up to date");
                report.unchanged += 1;
            } else {
                self.store.update_ticket(&id, &patch)?;
                ticket.ticket_type = ticket_type;
                ticket.title = issue.summary.clone();
                ticket.description = description;
                ticket.parent_id = parent_id;
                if let Some(order_index) = order_index {
                    ticket.order_index = order_index;
                }
                ticket.remote_id = Some(issue.key.clone());
                debug!(ticket_id = %id, key = %issue.key, "updated ticket from remote");
                report.updated.push(id.clone());
            }
            snapshot.by_key.insert(issue.key.clone(), id.clone());
            snapshot.claimed.insert(id);
            return Ok(());
        }

        let order_index = snapshot.next_order_index(parent_id.as_deref());
        let mut new = NewTicket::new(project_id, ticket_type, issue.summary.clone())
            .with_description(description)
            .with_order(order_index)
            .with_remote_id(issue.key.clone());
        if let Some(parent_id) = parent_id {
            new = new.with_parent(parent_id);
        }
        let ticket = self.store.insert_ticket(&new)?;
        debug!(ticket_id = %ticket.id, key = %issue.key, "inserted ticket from remote");

        snapshot.by_key.insert(issue.key.clone(), ticket.id.clone());
        snapshot.claimed.insert(ticket.id.clone());
        report.inserted.push(ticket.id.clone());
        snapshot.tickets.push(ticket);
        Ok(())
    }
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
