// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Result envelope for machine-readable output.
//!
//! Success: `{"success": true, ...data fields}`.
//! Failure: `{"success": false, "error": "..."}`.

use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Envelope {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }

    /// Envelope for a borrowed result.
    pub fn from_result<E: Display>(result: &Result<T, E>) -> Envelope<&T> {
        match result {
            Ok(data) => Envelope::success(data),
            Err(e) => Envelope::failure(e),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
