// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only computation of pending sync changes.

use std::collections::HashSet;

use bl_core::TicketStore;
use tracing::{debug, info, warn};

use super::change::{SyncChange, SyncPreview, DELETED_SUFFIX};
use super::tracker::{fetch_all, project_filter, Tracker, TrackerError};
use super::SyncEngine;
use crate::error::Result;

impl<T: Tracker + ?Sized, S: TicketStore + ?Sized> SyncEngine<'_, T, S> {
    /// Compare a project's tickets with its remote project.
    ///
    /// Neither the store nor the tracker is modified. Changes are listed as
    /// creates, then updates, then soft deletes. If the remote scan fails
    /// partway, the soft deletes found so far are kept and the preview is
    /// flagged incomplete.
    pub async fn preview(&self, project_id: &str, project_key: &str) -> Result<SyncPreview> {
        info!(project_id, project_key, "computing sync preview");
        let tickets = self.store.list_tickets(project_id)?;

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for ticket in &tickets {
            let Some(remote_id) = ticket.remote_id.as_deref() else {
                creates.push(SyncChange::create(ticket));
                continue;
            };

            match self.tracker.get_issue(&self.site_id, remote_id).await {
                Ok(Some(remote)) => {
                    if let Some(change) = SyncChange::update(ticket, &remote) {
                        debug!(
                            ticket_id = %ticket.id,
                            remote_id,
                            fields = change.diff.len(),
                            "ticket differs"
                        );
                        updates.push(change);
                    }
                }
                Ok(None) | Err(TrackerError::NotFound) => {
                    warn!(
                        ticket_id = %ticket.id,
                        remote_id,
                        "linked remote issue is gone, will re-create"
                    );
                    creates.push(SyncChange::create(ticket));
                }
                Err(e) => return Err(e.into()),
            }
        }

        let linked: HashSet<&str> = tickets
            .iter()
            .filter_map(|t| t.remote_id.as_deref())
            .collect();
        let (remote_issues, scan_error) = fetch_all(
            self.tracker,
            &self.site_id,
            &project_filter(project_key),
            self.page_size,
        )
        .await;

        let scan_error = match scan_error {
            Some(e) if e.is_auth() => return Err(e.into()),
            Some(e) => {
                warn!(
                    project_key,
                    error = %e,
                    scanned = remote_issues.len(),
                    "remote scan incomplete"
                );
                Some(e.to_string())
            }
            None => None,
        };

        let mut seen = HashSet::new();
        let soft_deletes: Vec<SyncChange> = remote_issues
            .iter()
            .filter(|issue| seen.insert(issue.key.as_str()))
            .filter(|issue| !linked.contains(issue.key.as_str()))
            .filter(|issue| !issue.summary.ends_with(DELETED_SUFFIX))
            .map(SyncChange::soft_delete)
            .collect();

        info!(
            project_id,
            creates = creates.len(),
            updates = updates.len(),
            soft_deletes = soft_deletes.len(),
            "sync preview ready"
        );

        let mut changes = creates;
        changes.extend(updates);
        changes.extend(soft_deletes);
        Ok(SyncPreview {
            project_id: project_id.to_string(),
            project_key: project_key.to_string(),
            changes,
            soft_delete_scan_complete: scan_error.is_none(),
            scan_error,
        })
    }
}

#[cfg(test)]
#[path = "preview_tests.rs"]
mod tests;
