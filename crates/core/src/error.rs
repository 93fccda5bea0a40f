// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for bl-core operations.

use thiserror::Error;

/// All possible errors that can occur in bl-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("ticket not found: {0}")]
    TicketNotFound(String),

    #[error("project not found: {0}\n  hint: create it with 'backlog project add'")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("invalid ticket type: '{0}'\n  hint: valid types are: epic, task, subtask")]
    InvalidTicketType(String),

    #[error("invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    #[error("ticket hierarchy contains a cycle through {0}")]
    CycleDetected(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for bl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
