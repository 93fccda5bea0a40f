// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use bl_core::{Database, Project};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::{emit, open_db};

pub fn add(id: &str, name: &str, source: Option<&str>) -> Result<()> {
    let (db, _, _) = open_db()?;
    let project = add_impl(&db, id, name, source)?;
    println!("Created project {} ({})", project.id, project.name);
    Ok(())
}

pub(crate) fn add_impl(
    db: &Database,
    id: &str,
    name: &str,
    source: Option<&str>,
) -> Result<Project> {
    Ok(db.create_project(id, name.trim(), source)?)
}

pub fn link(id: &str, key: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    link_impl(&db, id, key)?;
    println!("Linked {} to {}", id, key.trim());
    Ok(())
}

pub(crate) fn link_impl(db: &Database, id: &str, key: &str) -> Result<()> {
    Ok(db.link_project(id, key.trim())?)
}

#[derive(Serialize)]
struct ProjectList {
    projects: Vec<Project>,
}

pub fn list(format: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let result = db
        .list_projects()
        .map(|projects| ProjectList { projects })
        .map_err(Into::into);
    emit(format, result, |list| {
        for project in &list.projects {
            match format {
                OutputFormat::Id => println!("{}", project.id),
                _ => println!("{}", format_project_line(project)),
            }
        }
    })
}

pub(crate) fn format_project_line(project: &Project) -> String {
    let key = project.remote_project_key.as_deref().unwrap_or("-");
    format!("{:<12} {:<8} {}", project.id, key, project.name)
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
