// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core ticket types for the backlog hierarchy.
//!
//! A project owns a flat table of tickets linked by `parent_id`. The three
//! ticket kinds form a strict hierarchy: epic → task → subtask.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Level of a ticket in the backlog hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// Top-level initiative. Never has a parent.
    Epic,
    /// Unit of work, optionally grouped under an epic.
    Task,
    /// Step of a task.
    Subtask,
}

impl TicketType {
    /// All ticket types, parents before children.
    pub const LEVELS: [TicketType; 3] = [TicketType::Epic, TicketType::Task, TicketType::Subtask];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Epic => "epic",
            TicketType::Task => "task",
            TicketType::Subtask => "subtask",
        }
    }

    /// Depth in the hierarchy (epic = 0).
    pub fn level(&self) -> usize {
        match self {
            TicketType::Epic => 0,
            TicketType::Task => 1,
            TicketType::Subtask => 2,
        }
    }

    /// The only ticket type allowed as this type's parent.
    pub fn parent_type(&self) -> Option<TicketType> {
        match self {
            TicketType::Epic => None,
            TicketType::Task => Some(TicketType::Epic),
            TicketType::Subtask => Some(TicketType::Task),
        }
    }

    /// The ticket type of this type's children.
    pub fn child_type(&self) -> Option<TicketType> {
        match self {
            TicketType::Epic => Some(TicketType::Task),
            TicketType::Task => Some(TicketType::Subtask),
            TicketType::Subtask => None,
        }
    }

    /// Ticket type for a given hierarchy depth.
    pub fn from_level(level: usize) -> Option<TicketType> {
        Self::LEVELS.get(level).copied()
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "epic" => Ok(TicketType::Epic),
            "task" => Ok(TicketType::Task),
            "subtask" | "sub-task" => Ok(TicketType::Subtask),
            _ => Err(Error::InvalidTicketType(s.to_string())),
        }
    }
}

/// A backlog project owning a ticket hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Short identifier, also used as the ticket ID prefix.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Key of the linked remote tracker project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_project_key: Option<String>,
    /// Location of the requirements document the backlog was generated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
}

/// A locally stored backlog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier (format: `{project}-{hash}`).
    pub id: String,
    /// Owning project.
    pub project_id: String,
    /// Hierarchy level.
    pub ticket_type: TicketType,
    pub title: String,
    pub description: String,
    /// Parent ticket, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Position among siblings sharing the same parent.
    pub order_index: i64,
    /// Durable link to the remote issue, set after the first sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Returns true once the ticket has been linked to a remote issue.
    pub fn is_linked(&self) -> bool {
        self.remote_id.is_some()
    }
}

/// Values for inserting a ticket. The store assigns the ID and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTicket {
    pub project_id: String,
    pub ticket_type: TicketType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub remote_id: Option<String>,
}

impl NewTicket {
    pub fn new(
        project_id: impl Into<String>,
        ticket_type: TicketType,
        title: impl Into<String>,
    ) -> Self {
        NewTicket {
            project_id: project_id.into(),
            ticket_type,
            title: title.into(),
            description: String::new(),
            parent_id: None,
            order_index: 0,
            remote_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_order(mut self, order_index: i64) -> Self {
        self.order_index = order_index;
        self
    }

    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }
}

/// Partial update of a ticket. `None` leaves a field untouched.
///
/// Nullable columns use a nested option: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub ticket_type: Option<TicketType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Option<String>>,
    pub order_index: Option<i64>,
    pub remote_id: Option<Option<String>>,
}

impl TicketPatch {
    /// Patch that only records a remote link.
    pub fn link(remote_id: impl Into<String>) -> Self {
        TicketPatch {
            remote_id: Some(Some(remote_id.into())),
            ..TicketPatch::default()
        }
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &TicketPatch::default()
    }
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
