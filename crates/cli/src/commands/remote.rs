// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker discovery: sites, remote projects, and issue-type mapping.

use bl_core::TicketType;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{resolve, IssueTypeMap, RemoteProject, RemoteSite, Tracker};

use super::{block_on, connect, emit, open_db};

#[derive(Debug, Serialize)]
pub(crate) struct SiteList {
    pub sites: Vec<RemoteSite>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectList {
    pub site_id: String,
    pub projects: Vec<RemoteProject>,
}

pub fn sites(format: OutputFormat) -> Result<()> {
    let (_, config, _) = open_db()?;
    let result = block_on(async {
        let tracker = connect(&config.tracker).await?;
        sites_impl(&tracker).await
    })?;
    emit(format, result, |list| {
        for site in &list.sites {
            match format {
                OutputFormat::Id => println!("{}", site.id),
                _ => println!("{}  {}  {}", site.id, site.name, site.url),
            }
        }
    })
}

pub(crate) async fn sites_impl<T: Tracker + ?Sized>(tracker: &T) -> Result<SiteList> {
    Ok(SiteList {
        sites: tracker.list_sites().await?,
    })
}

pub fn projects(format: OutputFormat) -> Result<()> {
    let (_, config, _) = open_db()?;
    let result = block_on(async {
        let site_id = config.tracker.require_site()?;
        let tracker = connect(&config.tracker).await?;
        projects_impl(&tracker, site_id).await
    })?;
    emit(format, result, |list| {
        for project in &list.projects {
            match format {
                OutputFormat::Id => println!("{}", project.key),
                _ => println!("{:<10} {}", project.key, project.name),
            }
        }
    })
}

pub(crate) async fn projects_impl<T: Tracker + ?Sized>(
    tracker: &T,
    site_id: &str,
) -> Result<ProjectList> {
    let mut projects = tracker.list_projects(site_id).await?;
    projects.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(ProjectList {
        site_id: site_id.to_string(),
        projects,
    })
}

pub fn issue_types(key: &str, format: OutputFormat) -> Result<()> {
    let (_, config, _) = open_db()?;
    let result = block_on(async {
        let site_id = config.tracker.require_site()?;
        let tracker = connect(&config.tracker).await?;
        issue_types_impl(&tracker, site_id, key).await
    })?;
    emit(format, result, |map| {
        for line in format_issue_types(map) {
            println!("{}", line);
        }
    })
}

pub(crate) async fn issue_types_impl<T: Tracker + ?Sized>(
    tracker: &T,
    site_id: &str,
    key: &str,
) -> Result<IssueTypeMap> {
    Ok(resolve(tracker, site_id, key).await?)
}

/// `epic     -> Epic (10000)`, or `(unresolved)` for a missing slot.
pub(crate) fn format_issue_types(map: &IssueTypeMap) -> Vec<String> {
    TicketType::LEVELS
        .into_iter()
        .map(|ticket_type| match map.get(ticket_type) {
            Some(remote) => format!(
                "{:<8} -> {} ({})",
                ticket_type.as_str(),
                remote.name,
                remote.id
            ),
            None => format!("{:<8} -> (unresolved)", ticket_type.as_str()),
        })
        .collect()
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
