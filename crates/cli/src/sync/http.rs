// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! REST client for a Jira-compatible tracker.
//!
//! Site-scoped calls go to `{base_url}/{site_id}/rest/api/3/...`. Every
//! request carries the bearer token. Rate-limited responses (429) are
//! retried with exponential backoff, honoring `Retry-After`. Server errors
//! and connection failures are retried only for idempotent requests, so a
//! create is never sent twice after an ambiguous failure.

use std::fmt;
use std::time::Duration;

use bl_core::Document;
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::tracker::{
    CreatedIssue, IssuePage, IssueUpdate, NewIssue, RemoteIssue, RemoteIssueType, RemoteProject,
    RemoteSite, Tracker, TrackerError, TrackerFuture, TrackerResult,
};
use crate::config::TrackerConfig;

/// Fields requested for every issue read.
const ISSUE_FIELDS: [&str; 4] = ["summary", "description", "issuetype", "parent"];
const PROJECT_PAGE_SIZE: u32 = 50;

/// Backoff settings for retried requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry (milliseconds).
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay (seconds).
    pub max_delay_secs: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_delay_ms: 200,
            max_delay_secs: 10,
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &TrackerConfig) -> Self {
        RetryPolicy {
            max_retries: config.max_retries,
            initial_delay_ms: config.initial_delay_ms,
            max_delay_secs: config.max_delay_secs,
        }
    }

    fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }

    /// Delay before retry number `retry` (1-based), doubling each time.
    pub fn delay(&self, retry: u32) -> Duration {
        let mut delay_ms = self.initial_delay_ms;
        for _ in 1..retry {
            delay_ms = std::cmp::min(
                delay_ms.saturating_mul(2),
                self.max_delay_secs.saturating_mul(1000),
            );
        }
        std::cmp::min(Duration::from_millis(delay_ms), self.max_delay())
    }
}

/// Map a non-success status to a tracker error.
pub(crate) fn classify_status(status: u16, body: &str, attempts: u32) -> TrackerError {
    match status {
        401 | 403 => TrackerError::Unauthorized,
        404 => TrackerError::NotFound,
        429 => TrackerError::RateLimited { attempts },
        _ => TrackerError::Status {
            status,
            body: truncate_for_error(body),
        },
    }
}

pub(crate) fn truncate_for_error(body: &str) -> String {
    const MAX_LEN: usize = 200;
    if body.chars().count() <= MAX_LEN {
        body.to_owned()
    } else {
        format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
    }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// How a failed attempt ended.
enum Failure {
    Status {
        status: u16,
        body: String,
        retry_after: Option<Duration>,
    },
    Transport(String),
}

impl Failure {
    fn retryable(&self, idempotent: bool) -> bool {
        match self {
            Failure::Status { status: 429, .. } => true,
            Failure::Status { status, .. } => idempotent && *status >= 500,
            Failure::Transport(_) => idempotent,
        }
    }

    fn into_error(self, attempts: u32) -> TrackerError {
        match self {
            Failure::Status { status, body, .. } => classify_status(status, &body, attempts),
            Failure::Transport(message) => TrackerError::Request(message),
        }
    }
}

// Wire shapes. Only the fields read are declared.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectPageWire {
    #[serde(default)]
    values: Vec<RemoteProject>,
    #[serde(default)]
    is_last: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectWire {
    #[serde(default)]
    issue_types: Vec<IssueTypeWire>,
}

#[derive(Deserialize)]
struct IssueTypeWire {
    id: String,
    name: String,
    #[serde(default)]
    subtask: bool,
}

impl From<IssueTypeWire> for RemoteIssueType {
    fn from(wire: IssueTypeWire) -> Self {
        RemoteIssueType {
            id: wire.id,
            name: wire.name,
            is_subtask: wire.subtask,
        }
    }
}

#[derive(Deserialize)]
struct ParentWire {
    key: String,
}

#[derive(Deserialize)]
struct FieldsWire {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<Document>,
    issuetype: IssueTypeWire,
    #[serde(default)]
    parent: Option<ParentWire>,
}

#[derive(Deserialize)]
pub(crate) struct IssueWire {
    key: String,
    fields: FieldsWire,
}

impl From<IssueWire> for RemoteIssue {
    fn from(wire: IssueWire) -> Self {
        RemoteIssue {
            key: wire.key,
            summary: wire.fields.summary,
            description: wire.fields.description,
            issue_type: wire.fields.issuetype.into(),
            parent_key: wire.fields.parent.map(|p| p.key),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchWire {
    #[serde(default)]
    issues: Vec<IssueWire>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl From<SearchWire> for IssuePage {
    fn from(wire: SearchWire) -> Self {
        IssuePage {
            issues: wire.issues.into_iter().map(RemoteIssue::from).collect(),
            next_token: wire.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

#[derive(Deserialize)]
struct CreatedWire {
    id: String,
    key: String,
}

pub(crate) fn create_payload(issue: &NewIssue) -> Value {
    let mut fields = json!({
        "project": { "key": issue.project_key },
        "summary": issue.summary,
        "description": issue.description,
        "issuetype": { "id": issue.issue_type_id },
    });
    if let Some(parent) = &issue.parent_key {
        fields["parent"] = json!({ "key": parent });
    }
    json!({ "fields": fields })
}

pub(crate) fn update_payload(update: &IssueUpdate) -> Value {
    let mut fields = serde_json::Map::new();
    if let Some(summary) = &update.summary {
        fields.insert("summary".to_string(), json!(summary));
    }
    if let Some(description) = &update.description {
        fields.insert("description".to_string(), json!(description));
    }
    json!({ "fields": fields })
}

pub(crate) fn search_payload(filter: &str, page_size: u32, next_token: Option<&str>) -> Value {
    let mut body = json!({
        "jql": filter,
        "maxResults": page_size,
        "fields": ISSUE_FIELDS,
    });
    if let Some(token) = next_token {
        body["nextPageToken"] = json!(token);
    }
    body
}

fn decode<T: DeserializeOwned>(body: &str) -> TrackerResult<T> {
    serde_json::from_str(body).map_err(|e| TrackerError::Decode(e.to_string()))
}

/// [`Tracker`] backed by the tracker's REST API.
#[derive(Clone)]
pub struct HttpTracker {
    base_url: String,
    sites_url: String,
    token: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl fmt::Debug for HttpTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTracker")
            .field("base_url", &self.base_url)
            .field("sites_url", &self.sites_url)
            .field("token", &"<redacted>")
            .field("retry", &self.retry)
            .finish()
    }
}

impl HttpTracker {
    pub fn new(config: &TrackerConfig, token: impl Into<String>) -> TrackerResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("backlog/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| TrackerError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpTracker {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sites_url: config.sites_url.clone(),
            token: token.into(),
            retry: RetryPolicy::from_config(config),
            client,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// URL of a site-scoped REST resource.
    pub(crate) fn api_url(&self, site_id: &str, path: &str) -> String {
        format!(
            "{}/{}/rest/api/3/{}",
            self.base_url,
            site_id,
            path.trim_start_matches('/')
        )
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        idempotent: bool,
    ) -> TrackerResult<String> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(%method, url, attempt, "tracker request");
            let mut request = self
                .client
                .request(method.clone(), url)
                .bearer_auth(&self.token)
                .header(ACCEPT, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let failure = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let wait = retry_after(response.headers());
                    let text = response.text().await.map_err(|e| {
                        TrackerError::Request(format!("failed to read response: {e}"))
                    })?;
                    if status.is_success() {
                        return Ok(text);
                    }
                    Failure::Status {
                        status: status.as_u16(),
                        body: text,
                        retry_after: wait,
                    }
                }
                Err(e) => Failure::Transport(e.to_string()),
            };

            if !failure.retryable(idempotent) || attempt > self.retry.max_retries {
                return Err(failure.into_error(attempt));
            }
            let delay = match &failure {
                Failure::Status {
                    retry_after: Some(wait),
                    ..
                } => std::cmp::min(*wait, self.retry.max_delay()),
                _ => self.retry.delay(attempt),
            };
            warn!(%method, url, attempt, ?delay, "retrying tracker request");
            tokio::time::sleep(delay).await;
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> TrackerResult<T> {
        let body = self.send(Method::GET, url, None, true).await?;
        decode(&body)
    }
}

impl Tracker for HttpTracker {
    fn list_sites(&self) -> TrackerFuture<'_, Vec<RemoteSite>> {
        Box::pin(async move { self.get_json(&self.sites_url).await })
    }

    fn list_projects(&self, site_id: &str) -> TrackerFuture<'_, Vec<RemoteProject>> {
        let base = self.api_url(site_id, "project/search");
        Box::pin(async move {
            let mut projects = Vec::new();
            loop {
                let url = format!(
                    "{base}?startAt={}&maxResults={PROJECT_PAGE_SIZE}",
                    projects.len()
                );
                let page: ProjectPageWire = self.get_json(&url).await?;
                let done = page.is_last || page.values.is_empty();
                projects.extend(page.values);
                if done {
                    return Ok(projects);
                }
            }
        })
    }

    fn get_project_issue_types(
        &self,
        site_id: &str,
        project_key: &str,
    ) -> TrackerFuture<'_, Vec<RemoteIssueType>> {
        let url = self.api_url(site_id, &format!("project/{project_key}"));
        Box::pin(async move {
            let project: ProjectWire = self.get_json(&url).await?;
            Ok(project
                .issue_types
                .into_iter()
                .map(RemoteIssueType::from)
                .collect())
        })
    }

    fn create_issue(&self, site_id: &str, issue: NewIssue) -> TrackerFuture<'_, CreatedIssue> {
        let url = self.api_url(site_id, "issue");
        Box::pin(async move {
            let payload = create_payload(&issue);
            let body = self.send(Method::POST, &url, Some(&payload), false).await?;
            let created: CreatedWire = decode(&body)?;
            Ok(CreatedIssue {
                id: created.id,
                key: created.key,
            })
        })
    }

    fn update_issue(
        &self,
        site_id: &str,
        key: &str,
        update: IssueUpdate,
    ) -> TrackerFuture<'_, ()> {
        let url = self.api_url(site_id, &format!("issue/{key}"));
        Box::pin(async move {
            if update.is_empty() {
                return Ok(());
            }
            let payload = update_payload(&update);
            self.send(Method::PUT, &url, Some(&payload), true).await?;
            Ok(())
        })
    }

    fn get_issue(&self, site_id: &str, key: &str) -> TrackerFuture<'_, Option<RemoteIssue>> {
        let url = format!(
            "{}?fields={}",
            self.api_url(site_id, &format!("issue/{key}")),
            ISSUE_FIELDS.join(",")
        );
        Box::pin(async move {
            match self.get_json::<IssueWire>(&url).await {
                Ok(issue) => Ok(Some(issue.into())),
                Err(TrackerError::NotFound) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    fn query_issues(
        &self,
        site_id: &str,
        filter: &str,
        page_size: u32,
        next_token: Option<String>,
    ) -> TrackerFuture<'_, IssuePage> {
        let url = self.api_url(site_id, "search/jql");
        let payload = search_payload(filter, page_size, next_token.as_deref());
        Box::pin(async move {
            let body = self.send(Method::POST, &url, Some(&payload), true).await?;
            let page: SearchWire = decode(&body)?;
            Ok(page.into())
        })
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
