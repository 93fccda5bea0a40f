// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Applies a change set to the tracker and records new links locally.
//!
//! Each change is re-checked against the current local snapshot before it
//! runs, so replaying a stale or edited plan cannot create duplicates.

use std::collections::{HashMap, HashSet};

use bl_core::{Document, Ticket, TicketPatch, TicketStore};
use tracing::{info, warn};

use super::change::{
    ChangeStatus, ChangeType, SyncChange, SyncReport, DELETED_SUFFIX, FIELD_DESCRIPTION,
    FIELD_TITLE,
};
use super::resolver::{self, IssueTypeMap};
use super::tracker::{IssueUpdate, NewIssue, Tracker, TrackerError};
use super::SyncEngine;
use crate::error::{Error, Result};

/// State shared by the changes of one execute call.
struct Batch<'t> {
    project_key: String,
    tickets: HashMap<&'t str, &'t Ticket>,
    /// Remote keys assigned by creates in this batch.
    assigned: HashMap<String, String>,
    /// Tickets whose create was attempted in this batch without success.
    unsynced: HashSet<String>,
}

impl Batch<'_> {
    fn parent_key(&self, ticket: &Ticket) -> std::result::Result<Option<String>, String> {
        let Some(parent_id) = ticket.parent_id.as_deref() else {
            return Ok(None);
        };
        if self.unsynced.contains(parent_id) {
            return Err("parent not synced".to_string());
        }
        if let Some(key) = self.assigned.get(parent_id) {
            return Ok(Some(key.clone()));
        }
        match self.tickets.get(parent_id) {
            Some(parent) => parent
                .remote_id
                .clone()
                .map(Some)
                .ok_or_else(|| "parent not synced".to_string()),
            None => {
                warn!(
                    ticket_id = %ticket.id,
                    parent_id,
                    "parent ticket is missing, creating without parent"
                );
                Ok(None)
            }
        }
    }
}

fn skipped(reason: impl Into<String>) -> ChangeStatus {
    ChangeStatus::Skipped {
        reason: reason.into(),
    }
}

/// Abort on authentication failures, absorb everything else.
fn failed(change: &SyncChange, err: TrackerError) -> Result<ChangeStatus> {
    if err.is_auth() {
        return Err(err.into());
    }
    warn!(change_id = %change.id, error = %err, "change failed");
    Ok(ChangeStatus::Failed {
        error: err.to_string(),
    })
}

impl<T: Tracker + ?Sized, S: TicketStore + ?Sized> SyncEngine<'_, T, S> {
    /// Apply a change set.
    ///
    /// Creates run first, epics before tasks before subtasks, in sibling
    /// order; then updates; then soft deletes. A failing change is recorded
    /// and the rest still run. Authentication failures abort the call.
    pub async fn execute(
        &self,
        project_id: &str,
        project_key: &str,
        changes: &[SyncChange],
    ) -> Result<SyncReport> {
        let prefix = format!("{project_id}-");
        if let Some(ticket_id) = changes
            .iter()
            .filter_map(|c| c.ticket_id.as_deref())
            .find(|id| !id.starts_with(&prefix))
        {
            return Err(Error::PlanMismatch {
                project: project_id.to_string(),
                ticket_id: ticket_id.to_string(),
            });
        }

        let mut report = SyncReport::default();
        if changes.is_empty() {
            return Ok(report);
        }

        info!(project_id, project_key, changes = changes.len(), "executing sync");
        let snapshot = self.store.list_tickets(project_id)?;
        let mut batch = Batch {
            project_key: project_key.to_string(),
            tickets: snapshot.iter().map(|t| (t.id.as_str(), t)).collect(),
            assigned: HashMap::new(),
            unsynced: HashSet::new(),
        };

        let mut creates: Vec<&SyncChange> = changes
            .iter()
            .filter(|c| c.change_type == ChangeType::Create)
            .collect();
        creates.sort_by_key(|c| {
            c.ticket_id
                .as_deref()
                .and_then(|id| batch.tickets.get(id))
                .map_or((usize::MAX, i64::MAX), |t| {
                    (t.ticket_type.level(), t.order_index)
                })
        });

        if !creates.is_empty() {
            let types = resolver::resolve(self.tracker, &self.site_id, project_key).await?;
            for change in creates {
                let status = self.apply_create(change, &types, &mut batch).await?;
                report.record(change, status);
            }
        }

        for change in changes.iter().filter(|c| c.change_type == ChangeType::Update) {
            let status = self.apply_update(change, &batch).await?;
            report.record(change, status);
        }

        for change in changes
            .iter()
            .filter(|c| c.change_type == ChangeType::SoftDelete)
        {
            let status = self.apply_soft_delete(change, &batch).await?;
            report.record(change, status);
        }

        info!(
            project_id,
            synced = report.synced_count,
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "sync finished"
        );
        Ok(report)
    }

    async fn apply_create(
        &self,
        change: &SyncChange,
        types: &IssueTypeMap,
        batch: &mut Batch<'_>,
    ) -> Result<ChangeStatus> {
        let Some(ticket) = change
            .ticket_id
            .as_deref()
            .and_then(|id| batch.tickets.get(id))
            .copied()
        else {
            return Ok(skipped("ticket no longer exists"));
        };

        if let Some(key) = batch.assigned.get(&ticket.id) {
            return Ok(skipped(format!("already synced as {key}")));
        }
        if let Some(current) = ticket.remote_id.as_deref() {
            if change.remote_id.as_deref() != Some(current) {
                batch.assigned.insert(ticket.id.clone(), current.to_string());
                return Ok(skipped(format!("already synced as {current}")));
            }
        }

        let Some(issue_type) = types.get(ticket.ticket_type) else {
            warn!(
                ticket_id = %ticket.id,
                ticket_type = %ticket.ticket_type,
                "no remote issue type"
            );
            batch.unsynced.insert(ticket.id.clone());
            return Ok(skipped(format!(
                "no remote issue type for {}",
                ticket.ticket_type
            )));
        };

        let parent_key = match batch.parent_key(ticket) {
            Ok(key) => key,
            Err(reason) => {
                batch.unsynced.insert(ticket.id.clone());
                return Ok(skipped(reason));
            }
        };

        let issue = NewIssue {
            project_key: batch.project_key.clone(),
            summary: change.title.clone(),
            description: Document::from_plain_text(&change.description),
            issue_type_id: issue_type.id.clone(),
            parent_key,
        };
        let created = match self.tracker.create_issue(&self.site_id, issue).await {
            Ok(created) => created,
            Err(e) => {
                batch.unsynced.insert(ticket.id.clone());
                return failed(change, e);
            }
        };

        // Persist before anything else runs so a retry cannot create it twice
        if let Err(e) = self
            .store
            .update_ticket(&ticket.id, &TicketPatch::link(&created.key))
        {
            warn!(
                ticket_id = %ticket.id,
                key = %created.key,
                error = %e,
                "failed to store remote key"
            );
            batch.unsynced.insert(ticket.id.clone());
            return Ok(ChangeStatus::Failed {
                error: format!("created {} but could not link it: {e}", created.key),
            });
        }

        info!(ticket_id = %ticket.id, key = %created.key, "created remote issue");
        batch
            .assigned
            .insert(ticket.id.clone(), created.key.clone());
        Ok(ChangeStatus::Applied {
            remote_key: created.key,
        })
    }

    async fn apply_update(&self, change: &SyncChange, batch: &Batch<'_>) -> Result<ChangeStatus> {
        let Some(ticket) = change
            .ticket_id
            .as_deref()
            .and_then(|id| batch.tickets.get(id))
        else {
            return Ok(skipped("ticket no longer exists"));
        };
        let Some(key) = ticket.remote_id.clone() else {
            return Ok(skipped("ticket is not linked"));
        };

        let update = IssueUpdate {
            summary: change
                .changes_field(FIELD_TITLE)
                .then(|| change.title.clone()),
            description: change
                .changes_field(FIELD_DESCRIPTION)
                .then(|| Document::from_plain_text(&change.description)),
        };
        if update.is_empty() {
            return Ok(skipped("nothing to update"));
        }

        match self.tracker.update_issue(&self.site_id, &key, update).await {
            Ok(()) => {
                info!(ticket_id = %ticket.id, key = %key, "updated remote issue");
                Ok(ChangeStatus::Applied { remote_key: key })
            }
            Err(e) => failed(change, e),
        }
    }

    async fn apply_soft_delete(
        &self,
        change: &SyncChange,
        batch: &Batch<'_>,
    ) -> Result<ChangeStatus> {
        let Some(key) = change.remote_id.clone() else {
            return Ok(skipped("no remote key"));
        };
        let linked_to = batch
            .tickets
            .values()
            .find(|t| t.remote_id.as_deref() == Some(key.as_str()))
            .map(|t| t.id.clone())
            .or_else(|| {
                batch
                    .assigned
                    .iter()
                    .find(|(_, k)| **k == key)
                    .map(|(id, _)| id.clone())
            });
        if let Some(ticket_id) = linked_to {
            return Ok(skipped(format!("issue is linked to {ticket_id}")));
        }
        if change.title.ends_with(DELETED_SUFFIX) {
            return Ok(skipped("already marked deleted"));
        }

        let update = IssueUpdate {
            summary: Some(format!("{}{DELETED_SUFFIX}", change.title)),
            description: None,
        };
        match self.tracker.update_issue(&self.site_id, &key, update).await {
            Ok(()) => {
                info!(key = %key, "marked remote issue deleted");
                Ok(ChangeStatus::Applied { remote_key: key })
            }
            Err(e) => failed(change, e),
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
