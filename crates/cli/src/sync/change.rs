// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change set value types passed from preview to execute.
//!
//! A preview is plain data: it can be printed, saved to a plan file, edited,
//! and handed back to the executor. Nothing here is persisted by the engine.

use bl_core::{rich_text, Ticket};
use serde::{Deserialize, Serialize};

use super::tracker::RemoteIssue;

/// Suffix appended to a remote summary to mark the issue deleted.
pub const DELETED_SUFFIX: &str = " [DELETED]";

/// Kind of pending operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Create,
    Update,
    SoftDelete,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Create => "create",
            ChangeType::Update => "update",
            ChangeType::SoftDelete => "soft_delete",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compared field of a ticket.
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";

/// One differing field: `old_value` is the remote value, `new_value` the local one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

/// A single pending operation against the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncChange {
    /// Stable identifier derived from the change target.
    pub id: String,
    /// Local ticket, absent for soft deletes.
    #[serde(default)]
    pub ticket_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub change_type: ChangeType,
    /// Remote key the change applies to. For a create this is the stale key
    /// of a linked issue that disappeared remotely.
    #[serde(default)]
    pub remote_id: Option<String>,
    #[serde(default)]
    pub diff: Vec<FieldDiff>,
}

impl SyncChange {
    /// Create a remote issue for a ticket.
    pub fn create(ticket: &Ticket) -> Self {
        SyncChange {
            id: format!("create:{}", ticket.id),
            ticket_id: Some(ticket.id.clone()),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            change_type: ChangeType::Create,
            remote_id: ticket.remote_id.clone(),
            diff: Vec::new(),
        }
    }

    /// Compare a linked ticket with its remote issue.
    ///
    /// Returns `None` when the compared fields are equal.
    pub fn update(ticket: &Ticket, remote: &RemoteIssue) -> Option<Self> {
        let diff = diff_fields(ticket, remote);
        if diff.is_empty() {
            return None;
        }
        Some(SyncChange {
            id: format!("update:{}", ticket.id),
            ticket_id: Some(ticket.id.clone()),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            change_type: ChangeType::Update,
            remote_id: Some(remote.key.clone()),
            diff,
        })
    }

    /// Mark an unreferenced remote issue as deleted.
    pub fn soft_delete(remote: &RemoteIssue) -> Self {
        SyncChange {
            id: format!("soft_delete:{}", remote.key),
            ticket_id: None,
            title: remote.summary.clone(),
            description: String::new(),
            change_type: ChangeType::SoftDelete,
            remote_id: Some(remote.key.clone()),
            diff: Vec::new(),
        }
    }

    pub fn changes_field(&self, field: &str) -> bool {
        self.diff.iter().any(|d| d.field == field)
    }
}

/// Field-level differences between a ticket and its remote issue.
///
/// Titles compare exactly. Descriptions compare in normalized form, so text the
/// remote document cannot represent verbatim does not diff after a push.
pub fn diff_fields(ticket: &Ticket, remote: &RemoteIssue) -> Vec<FieldDiff> {
    let mut diff = Vec::new();
    if ticket.title != remote.summary {
        diff.push(FieldDiff {
            field: FIELD_TITLE.to_string(),
            old_value: remote.summary.clone(),
            new_value: ticket.title.clone(),
        });
    }

    let remote_text = rich_text::plain_text(remote.description.as_ref());
    let local_text = ticket.description.trim();
    if rich_text::normalize(&remote_text) != rich_text::normalize(local_text) {
        diff.push(FieldDiff {
            field: FIELD_DESCRIPTION.to_string(),
            old_value: remote_text,
            new_value: local_text.to_string(),
        });
    }
    diff
}

/// Read-only result of comparing a project with its remote counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPreview {
    pub project_id: String,
    pub project_key: String,
    /// Creates, then updates, then soft deletes.
    pub changes: Vec<SyncChange>,
    /// False when the remote scan for soft deletes stopped early.
    pub soft_delete_scan_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

impl SyncPreview {
    pub fn count(&self, change_type: ChangeType) -> usize {
        self.changes
            .iter()
            .filter(|c| c.change_type == change_type)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Result of applying one change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChangeStatus {
    Applied { remote_key: String },
    Failed { error: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOutcome {
    pub change_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub change_type: ChangeType,
    #[serde(flatten)]
    pub status: ChangeStatus,
}

impl ChangeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self.status, ChangeStatus::Applied { .. })
    }
}

/// Result of executing a change set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Number of changes applied successfully.
    pub synced_count: usize,
    /// One entry per submitted change, in execution order.
    pub outcomes: Vec<ChangeOutcome>,
}

impl SyncReport {
    pub(crate) fn record(&mut self, change: &SyncChange, status: ChangeStatus) {
        if matches!(status, ChangeStatus::Applied { .. }) {
            self.synced_count += 1;
        }
        self.outcomes.push(ChangeOutcome {
            change_id: change.id.clone(),
            ticket_id: change.ticket_id.clone(),
            change_type: change.change_type,
            status,
        });
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ChangeStatus::Failed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ChangeStatus::Skipped { .. }))
            .count()
    }

    pub fn outcome(&self, change_id: &str) -> Option<&ChangeOutcome> {
        self.outcomes.iter().find(|o| o.change_id == change_id)
    }
}

/// Result of importing a remote project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Tickets inserted or updated.
    pub imported_count: usize,
    /// IDs of newly inserted tickets.
    pub inserted: Vec<String>,
    /// IDs of existing tickets that were updated.
    pub updated: Vec<String>,
    /// Matched tickets that already agreed with the remote issue.
    #[serde(default)]
    pub unchanged: usize,
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
