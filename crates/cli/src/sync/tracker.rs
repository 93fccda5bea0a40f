// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker abstraction for the remote issue tracker.
//!
//! Provides a trait-based client layer that enables:
//! - Real HTTP clients for production
//! - Mock trackers for unit testing

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use bl_core::Document;
use serde::{Deserialize, Serialize};

/// Error type for tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The token was rejected (HTTP 401/403).
    #[error("unauthorized: the tracker rejected the access token")]
    Unauthorized,

    /// The requested resource does not exist (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Retries were exhausted while rate limited (HTTP 429).
    #[error("rate limited: gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// No usable access token.
    #[error("authentication failed: {0}")]
    Auth(String),
}

impl TrackerError {
    /// Authentication failures abort a whole operation instead of a single change.
    pub fn is_auth(&self) -> bool {
        matches!(self, TrackerError::Unauthorized | TrackerError::Auth(_))
    }
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Boxed future returned by [`Tracker`] methods.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = TrackerResult<T>> + Send + 'a>>;

/// A tracker site (cloud instance) the token can access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSite {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// A project on a tracker site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub id: String,
    pub key: String,
    pub name: String,
}

/// An issue type allowed by a remote project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIssueType {
    pub id: String,
    pub name: String,
    pub is_subtask: bool,
}

/// A remote issue, reduced to the fields the sync engine reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteIssue {
    pub key: String,
    pub summary: String,
    pub description: Option<Document>,
    pub issue_type: RemoteIssueType,
    pub parent_key: Option<String>,
}

/// One page of a remote issue query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuePage {
    pub issues: Vec<RemoteIssue>,
    /// Continuation token; `None` once the result set is exhausted.
    pub next_token: Option<String>,
}

/// Payload for creating a remote issue.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub description: Document,
    pub issue_type_id: String,
    pub parent_key: Option<String>,
}

/// Partial payload for updating a remote issue. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueUpdate {
    pub summary: Option<String>,
    pub description: Option<Document>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.description.is_none()
    }
}

/// Identity of a freshly created remote issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
}

/// Client for a remote issue tracker.
///
/// This trait abstracts over the actual wire protocol, allowing for easy
/// testing with mock implementations.
pub trait Tracker: Send + Sync {
    /// List the sites the current token can access.
    fn list_sites(&self) -> TrackerFuture<'_, Vec<RemoteSite>>;

    /// List the projects of a site.
    fn list_projects(&self, site_id: &str) -> TrackerFuture<'_, Vec<RemoteProject>>;

    /// Issue types a project allows.
    fn get_project_issue_types(
        &self,
        site_id: &str,
        project_key: &str,
    ) -> TrackerFuture<'_, Vec<RemoteIssueType>>;

    /// Create an issue and return its key.
    fn create_issue(&self, site_id: &str, issue: NewIssue) -> TrackerFuture<'_, CreatedIssue>;

    /// Apply a partial update to an issue.
    fn update_issue(
        &self,
        site_id: &str,
        key: &str,
        update: IssueUpdate,
    ) -> TrackerFuture<'_, ()>;

    /// Fetch an issue by key.
    ///
    /// Returns `None` if the issue does not exist.
    fn get_issue(&self, site_id: &str, key: &str) -> TrackerFuture<'_, Option<RemoteIssue>>;

    /// Fetch one page of issues matching a filter expression.
    fn query_issues(
        &self,
        site_id: &str,
        filter: &str,
        page_size: u32,
        next_token: Option<String>,
    ) -> TrackerFuture<'_, IssuePage>;
}

/// Filter expression selecting every issue of a project in creation order.
pub fn project_filter(project_key: &str) -> String {
    format!("project = \"{project_key}\" ORDER BY created ASC")
}

/// Fetch every issue matching `filter`, following continuation tokens.
///
/// On failure, returns the issues fetched so far together with the error.
pub async fn fetch_all<T: Tracker + ?Sized>(
    tracker: &T,
    site_id: &str,
    filter: &str,
    page_size: u32,
) -> (Vec<RemoteIssue>, Option<TrackerError>) {
    let mut issues = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut token = None;
    loop {
        match tracker
            .query_issues(site_id, filter, page_size, token.take())
            .await
        {
            Ok(page) => {
                issues.extend(page.issues);
                match page.next_token {
                    Some(next) if !seen_tokens.insert(next.clone()) => {
                        let err =
                            TrackerError::Decode(format!("continuation token {next} repeated"));
                        return (issues, Some(err));
                    }
                    Some(next) => token = Some(next),
                    None => return (issues, None),
                }
            }
            Err(e) => return (issues, Some(e)),
        }
    }
}
