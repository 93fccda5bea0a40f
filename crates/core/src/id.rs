// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Ticket ID generation.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Generate a ticket ID from project, title, and timestamp.
/// Format: {project}-{hash} where hash is first 8 hex chars of SHA256(title + timestamp)
pub fn generate_id(project_id: &str, title: &str, created_at: &DateTime<Utc>) -> String {
    let input = format!("{}{}", title, created_at.to_rfc3339());
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    format!("{}-{}", project_id, short_hash)
}

/// Generate a unique ID, handling collisions by appending an incrementing suffix.
pub fn generate_unique_id<F>(
    project_id: &str,
    title: &str,
    created_at: &DateTime<Utc>,
    exists: F,
) -> crate::Result<String>
where
    F: Fn(&str) -> crate::Result<bool>,
{
    let base_id = generate_id(project_id, title, created_at);

    if !exists(&base_id)? {
        return Ok(base_id);
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id)? {
            return Ok(id);
        }
        suffix += 1;
    }
}

/// Validate a project ID (2+ lowercase alphanumeric with at least one letter).
pub fn validate_project_id(project_id: &str) -> bool {
    project_id.len() >= 2
        && project_id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && project_id.chars().any(|c| c.is_ascii_lowercase())
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
