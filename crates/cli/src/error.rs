// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::TrackerError;

/// All possible errors that can occur in the backlog library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'backlog init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("project '{0}' is not linked to a remote project\n  hint: run 'backlog project link {0} <KEY>'")]
    NotLinked(String),

    #[error("authentication failed: {0}\n  hint: export a valid API token in the variable named by tracker.token_env")]
    Auth(String),

    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("plan does not belong to project '{project}': ticket {ticket_id} is from another project")]
    PlanMismatch { project: String, ticket_id: String },

    #[error("plan was generated for {found}, not {expected}\n  hint: run 'backlog preview' again")]
    PlanTarget { expected: String, found: String },

    #[error("invalid generated tree: {0}")]
    InvalidTree(String),

    #[error("unknown field '{0}'\n  hint: valid fields are: title, description")]
    UnknownField(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error(transparent)]
    Core(#[from] bl_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for failures that must stop an operation before it
    /// touches any state.
    pub fn is_auth(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Tracker(e) => e.is_auth(),
            _ => false,
        }
    }
}

/// A specialized Result type for backlog operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
