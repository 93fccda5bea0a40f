// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Two-way synchronization between the local backlog and a remote tracker.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SyncEngine  │────►│   Tracker   │────►│   Remote    │
//! │ preview     │◄────│   (trait)   │◄────│   Tracker   │
//! │ execute     │     └─────────────┘     └─────────────┘
//! │ import_all  │
//! └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ TicketStore │  (local SQLite)
//! └─────────────┘
//! ```
//!
//! - `preview` is read-only and returns a [`SyncPreview`] change set
//! - `execute` applies a (possibly edited) change set parents-first
//! - `import_all` upserts every remote issue into the local store
//!
//! Every tracker call is awaited in sequence. Child creates need the
//! parent's freshly assigned key, so nothing fans out.

mod auth;
mod change;
mod executor;
mod http;
mod import;
mod preview;
mod resolver;
mod tracker;

pub use auth::{EnvTokenProvider, TokenProvider};
pub use change::{
    ChangeOutcome, ChangeStatus, ChangeType, FieldDiff, ImportReport, SyncChange, SyncPreview,
    SyncReport, DELETED_SUFFIX,
};
pub use http::{HttpTracker, RetryPolicy};
pub use import::classify_issue_type;
pub use resolver::{resolve, resolve_issue_types, IssueTypeMap};
pub use tracker::{
    CreatedIssue, IssuePage, IssueUpdate, NewIssue, RemoteIssue, RemoteIssueType, RemoteProject,
    RemoteSite, Tracker, TrackerError, TrackerFuture, TrackerResult,
};

use bl_core::TicketStore;

const DEFAULT_PAGE_SIZE: u32 = 50;

/// Sync operations for one tracker site.
///
/// The tracker and the store are injected so tests can substitute a mock
/// tracker and an in-memory database.
pub struct SyncEngine<'a, T: Tracker + ?Sized, S: TicketStore + ?Sized> {
    tracker: &'a T,
    store: &'a S,
    site_id: String,
    page_size: u32,
}

impl<'a, T: Tracker + ?Sized, S: TicketStore + ?Sized> SyncEngine<'a, T, S> {
    pub fn new(tracker: &'a T, store: &'a S, site_id: impl Into<String>) -> Self {
        SyncEngine {
            tracker,
            store,
            site_id: site_id.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size used when scanning remote projects.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;
