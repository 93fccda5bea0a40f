// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.backlog/config.toml` and includes:
//! - `workspace`: Optional path to store the database in a different location
//! - `[tracker]`: Remote tracker endpoints, credentials lookup, and retry policy

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".backlog";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "backlog.db";

/// Project configuration stored in `.backlog/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Optional directory for the database (relative to project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    /// Remote tracker settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Remote tracker configuration.
///
/// The API token itself is never written to the config file. It is read
/// from the environment variable named by `token_env`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base URL for site-scoped REST calls (`{base_url}/{site_id}/rest/api/3/...`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// URL listing the sites the token can access.
    #[serde(default = "default_sites_url")]
    pub sites_url: String,
    /// Cloud ID of the site to sync with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// User whose access token is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Issues requested per page when scanning a remote project.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Maximum retries for rate-limited or failed requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial delay for exponential backoff (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between retries (seconds).
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.atlassian.com/ex/jira".to_string()
}

fn default_sites_url() -> String {
    "https://api.atlassian.com/oauth/token/accessible-resources".to_string()
}

fn default_token_env() -> String {
    "BACKLOG_TRACKER_TOKEN".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    20
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            base_url: default_base_url(),
            sites_url: default_sites_url(),
            site_id: None,
            user: None,
            token_env: default_token_env(),
            page_size: default_page_size(),
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TrackerConfig {
    /// The configured site, or a config error naming the missing key.
    pub fn require_site(&self) -> Result<&str> {
        self.site_id.as_deref().ok_or_else(|| {
            Error::Config(
                "tracker.site_id is not set\n  hint: run 'backlog sites' and add site_id under [tracker]"
                    .to_string(),
            )
        })
    }

    /// The user whose token is used. Falls back to "default".
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or("default")
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Loads configuration from the given `.backlog/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given `.backlog/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .backlog directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the database path from config
pub fn get_db_path(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.workspace {
        Some(workspace) => {
            let workspace_path = Path::new(workspace);
            if workspace_path.is_absolute() {
                workspace_path.join(DB_FILE_NAME)
            } else {
                // Relative to work_dir's parent (the project root)
                work_dir
                    .parent()
                    .unwrap_or(work_dir)
                    .join(workspace)
                    .join(DB_FILE_NAME)
            }
        }
        None => work_dir.join(DB_FILE_NAME),
    }
}

/// Initialize a new .backlog directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
