// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Access token lookup for tracker requests.

use std::fmt;

use tracing::debug;

use super::tracker::{TrackerError, TrackerFuture};

/// Source of access tokens for a user.
///
/// Token refresh, if any, happens behind this trait. Callers fetch a token
/// once per command and hand it to the HTTP tracker.
pub trait TokenProvider: Send + Sync {
    /// Return a token that is valid for at least the next request.
    fn get_valid_access_token<'a>(&'a self, user: &'a str) -> TrackerFuture<'a, String>;

    /// Whether a token is available for the user.
    fn is_connected<'a>(&'a self, user: &'a str) -> TrackerFuture<'a, bool>;
}

/// Reads the token from an environment variable.
#[derive(Clone)]
pub struct EnvTokenProvider {
    var: String,
}

impl fmt::Debug for EnvTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvTokenProvider")
            .field("var", &self.var)
            .finish()
    }
}

impl EnvTokenProvider {
    pub fn new(var: impl Into<String>) -> Self {
        EnvTokenProvider { var: var.into() }
    }

    /// Name of the variable read.
    pub fn var(&self) -> &str {
        &self.var
    }

    fn read(&self) -> Result<String, TrackerError> {
        let value = std::env::var(&self.var).map_err(|_| {
            TrackerError::Auth(format!("{} is not set", self.var))
        })?;
        let value = value.trim();
        if value.is_empty() {
            return Err(TrackerError::Auth(format!("{} is empty", self.var)));
        }
        Ok(value.to_string())
    }
}

impl TokenProvider for EnvTokenProvider {
    fn get_valid_access_token<'a>(&'a self, user: &'a str) -> TrackerFuture<'a, String> {
        debug!(user, var = %self.var, "reading access token");
        Box::pin(std::future::ready(self.read()))
    }

    fn is_connected<'a>(&'a self, _user: &'a str) -> TrackerFuture<'a, bool> {
        Box::pin(std::future::ready(Ok(self.read().is_ok())))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
