// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::{Path, PathBuf};

use bl_core::Database;
use tracing::info;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(path: Option<String>, workspace: Option<String>, site_id: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let (work_dir, db_path) = run_impl(&target_path, workspace, site_id)?;

    println!("Initialized backlog at {}", work_dir.display());
    println!("Database: {}", db_path.display());
    Ok(())
}

/// Create `.backlog/` under `target_path` and an empty database.
///
/// Returns the work directory and the database path.
pub(crate) fn run_impl(
    target_path: &Path,
    workspace: Option<String>,
    site_id: Option<String>,
) -> Result<(PathBuf, PathBuf)> {
    let mut config = Config {
        workspace,
        ..Config::default()
    };
    config.tracker.site_id = site_id;

    let work_dir = init_work_dir(target_path, &config)?;
    let db_path = get_db_path(&work_dir, &config);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Database::open(&db_path)?;

    info!(work_dir = %work_dir.display(), "initialized backlog");
    Ok((work_dir, db_path))
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
