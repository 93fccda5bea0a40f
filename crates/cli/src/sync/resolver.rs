// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Maps local ticket types onto a remote project's issue types.
//!
//! Remote projects define their own open set of issue types. Matching is by
//! name and the subtask flag only, so it is a pure function over the fetched
//! list and is recomputed for every operation.

use bl_core::TicketType;
use serde::Serialize;
use tracing::{debug, warn};

use super::tracker::{RemoteIssueType, Tracker, TrackerResult};

/// Remote issue type chosen for each local ticket type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueTypeMap {
    pub epic: Option<RemoteIssueType>,
    pub task: Option<RemoteIssueType>,
    pub subtask: Option<RemoteIssueType>,
}

impl IssueTypeMap {
    pub fn get(&self, ticket_type: TicketType) -> Option<&RemoteIssueType> {
        match ticket_type {
            TicketType::Epic => self.epic.as_ref(),
            TicketType::Task => self.task.as_ref(),
            TicketType::Subtask => self.subtask.as_ref(),
        }
    }

    /// Local types with no remote counterpart.
    pub fn missing(&self) -> Vec<TicketType> {
        TicketType::LEVELS
            .into_iter()
            .filter(|t| self.get(*t).is_none())
            .collect()
    }
}

fn is_epic(issue_type: &RemoteIssueType) -> bool {
    issue_type.name.eq_ignore_ascii_case("epic")
}

/// Pick the issue type for each ticket level.
///
/// - epic: the type named "epic"
/// - subtask: the first type flagged as a subtask type
/// - task: a type that is neither, preferring one named "task"
pub fn resolve_issue_types(types: &[RemoteIssueType]) -> IssueTypeMap {
    let epic = types.iter().find(|t| !t.is_subtask && is_epic(t)).cloned();
    let subtask = types.iter().find(|t| t.is_subtask).cloned();

    let mut candidates = types.iter().filter(|t| !t.is_subtask && !is_epic(t));
    let task = types
        .iter()
        .filter(|t| !t.is_subtask)
        .find(|t| t.name.eq_ignore_ascii_case("task"))
        .or_else(|| candidates.next())
        .cloned();

    IssueTypeMap {
        epic,
        task,
        subtask,
    }
}

/// Fetch a project's issue types and resolve them.
///
/// Unresolved slots are logged; tickets of those types fail individually.
pub async fn resolve<T: Tracker + ?Sized>(
    tracker: &T,
    site_id: &str,
    project_key: &str,
) -> TrackerResult<IssueTypeMap> {
    let types = tracker.get_project_issue_types(site_id, project_key).await?;
    debug!(project_key, count = types.len(), "fetched issue types");

    let map = resolve_issue_types(&types);
    for missing in map.missing() {
        warn!(project_key, ticket_type = %missing, "no remote issue type for {missing} tickets");
    }
    Ok(map)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
