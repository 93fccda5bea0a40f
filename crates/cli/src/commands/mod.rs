// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod check;
pub mod init;
pub mod load;
pub mod project;
pub mod remote;
pub mod sync;
pub mod ticket;
pub mod tree;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::future::Future;
use std::path::PathBuf;

use bl_core::Database;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::{find_work_dir, get_db_path, Config, TrackerConfig};
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::sync::{EnvTokenProvider, HttpTracker, TokenProvider, TrackerError};

/// Helper to open the database from the current context.
pub fn open_db() -> Result<(Database, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let db_path = get_db_path(&work_dir, &config);
    let db = Database::open(&db_path)?;
    Ok((db, config, work_dir))
}

/// Drive an async command to completion on a fresh runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    Ok(rt.block_on(future))
}

/// Build an HTTP tracker client authenticated with the configured token.
pub(crate) async fn connect(config: &TrackerConfig) -> Result<HttpTracker> {
    let provider = EnvTokenProvider::new(&config.token_env);
    let token = provider
        .get_valid_access_token(config.user())
        .await
        .map_err(auth_error)?;
    Ok(HttpTracker::new(config, token)?)
}

fn auth_error(err: TrackerError) -> Error {
    match err {
        TrackerError::Auth(message) => Error::Auth(message),
        other => Error::Tracker(other),
    }
}

/// The remote key a project is linked to.
pub(crate) fn linked_key(db: &Database, project_id: &str) -> Result<String> {
    db.get_project(project_id)?
        .remote_project_key
        .ok_or_else(|| Error::NotLinked(project_id.to_string()))
}

/// Print a command result.
///
/// JSON output wraps the result in an [`Envelope`], failures included, so
/// scripts always get one JSON document on stdout. Other formats print via
/// `text` and leave errors to the caller.
pub(crate) fn emit<T: Serialize>(
    format: OutputFormat,
    result: Result<T>,
    text: impl FnOnce(&T),
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", Envelope::from_result(&result).to_json()?);
            result.map(|_| ())
        }
        OutputFormat::Text | OutputFormat::Id => {
            text(&result?);
            Ok(())
        }
    }
}
