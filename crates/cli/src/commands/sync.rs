// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Preview, sync, and import commands.
//!
//! Each command resolves the project's linked key and the configured site,
//! connects to the tracker, and hands off to the [`SyncEngine`]. The `_impl`
//! functions take any [`Tracker`] so they run against the mock in tests.

use std::path::Path;

use bl_core::Database;
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::sync::{
    ChangeStatus, ChangeType, ImportReport, SyncEngine, SyncPreview, SyncReport, Tracker,
};

use super::{block_on, connect, emit, linked_key, open_db};

/// Where a command runs: the project, its remote key, and the site.
pub(crate) struct Target {
    pub project_id: String,
    pub project_key: String,
    pub site_id: String,
    pub page_size: u32,
}

impl Target {
    pub(crate) fn resolve(db: &Database, config: &Config, project_id: &str) -> Result<Self> {
        let project_key = linked_key(db, project_id)?;
        let site_id = config.tracker.require_site()?.to_string();
        Ok(Target {
            project_id: project_id.to_string(),
            project_key,
            site_id,
            page_size: config.tracker.page_size,
        })
    }

    fn engine<'a, T: Tracker + ?Sized>(
        &self,
        tracker: &'a T,
        db: &'a Database,
    ) -> SyncEngine<'a, T, Database> {
        SyncEngine::new(tracker, db, self.site_id.as_str()).with_page_size(self.page_size)
    }
}

pub fn preview(project: &str, out: Option<&str>, format: OutputFormat) -> Result<()> {
    let (db, config, _) = open_db()?;
    let result = block_on(async {
        let target = Target::resolve(&db, &config, project)?;
        let tracker = connect(&config.tracker).await?;
        preview_impl(&tracker, &db, &target).await
    })?;

    let result = match (result, out) {
        (Ok(preview), Some(path)) => write_plan(&preview, Path::new(path)).map(|()| preview),
        (result, _) => result,
    };
    emit(format, result, |preview| {
        for line in format_preview(preview) {
            println!("{}", line);
        }
        if let Some(path) = out {
            println!("Plan written to {}", path);
        }
    })
}

pub(crate) async fn preview_impl<T: Tracker + ?Sized>(
    tracker: &T,
    db: &Database,
    target: &Target,
) -> Result<SyncPreview> {
    target
        .engine(tracker, db)
        .preview(&target.project_id, &target.project_key)
        .await
}

pub(crate) fn write_plan(preview: &SyncPreview, path: &Path) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(preview)?)?;
    Ok(())
}

pub(crate) fn read_plan(path: &Path) -> Result<SyncPreview> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn sync(project: &str, plan: Option<&str>, format: OutputFormat) -> Result<()> {
    let (db, config, _) = open_db()?;
    let plan = plan.map(|path| read_plan(Path::new(path))).transpose()?;
    let result = block_on(async {
        let target = Target::resolve(&db, &config, project)?;
        let tracker = connect(&config.tracker).await?;
        sync_impl(&tracker, &db, &target, plan).await
    })?;
    emit(format, result, |report| {
        for line in format_report(report) {
            println!("{}", line);
        }
    })
}

/// Execute a saved plan, or preview and execute in one step.
pub(crate) async fn sync_impl<T: Tracker + ?Sized>(
    tracker: &T,
    db: &Database,
    target: &Target,
    plan: Option<SyncPreview>,
) -> Result<SyncReport> {
    let plan = match plan {
        Some(plan) => {
            check_plan_target(&plan, target)?;
            plan
        }
        None => preview_impl(tracker, db, target).await?,
    };
    let report = target
        .engine(tracker, db)
        .execute(&target.project_id, &target.project_key, &plan.changes)
        .await?;
    info!(
        project_id = %target.project_id,
        synced = report.synced_count,
        failed = report.failed_count(),
        "sync finished"
    );
    Ok(report)
}

fn check_plan_target(plan: &SyncPreview, target: &Target) -> Result<()> {
    if plan.project_id != target.project_id {
        return Err(Error::PlanTarget {
            expected: format!("project '{}'", target.project_id),
            found: format!("project '{}'", plan.project_id),
        });
    }
    if plan.project_key != target.project_key {
        return Err(Error::PlanTarget {
            expected: format!("remote project {}", target.project_key),
            found: format!("remote project {}", plan.project_key),
        });
    }
    Ok(())
}

pub fn import(project: &str, format: OutputFormat) -> Result<()> {
    let (db, config, _) = open_db()?;
    let result = block_on(async {
        let target = Target::resolve(&db, &config, project)?;
        let tracker = connect(&config.tracker).await?;
        import_impl(&tracker, &db, &target).await
    })?;
    emit(format, result, |report| match format {
        OutputFormat::Id => report
            .inserted
            .iter()
            .chain(&report.updated)
            .for_each(|id| println!("{}", id)),
        _ => println!(
            "Imported {} issue(s): {} new, {} updated, {} unchanged",
            report.imported_count,
            report.inserted.len(),
            report.updated.len(),
            report.unchanged
        ),
    })
}

pub(crate) async fn import_impl<T: Tracker + ?Sized>(
    tracker: &T,
    db: &Database,
    target: &Target,
) -> Result<ImportReport> {
    target
        .engine(tracker, db)
        .import_all(&target.project_id, &target.project_key)
        .await
}

fn change_marker(change_type: ChangeType) -> char {
    match change_type {
        ChangeType::Create => '+',
        ChangeType::Update => '~',
        ChangeType::SoftDelete => '-',
    }
}

pub(crate) fn format_preview(preview: &SyncPreview) -> Vec<String> {
    let mut lines = Vec::new();
    if preview.is_empty() {
        lines.push(format!(
            "{} is in sync with {}",
            preview.project_id, preview.project_key
        ));
    }
    for change in &preview.changes {
        let target = change
            .ticket_id
            .as_deref()
            .or(change.remote_id.as_deref())
            .unwrap_or("-");
        lines.push(format!(
            "{} {:<11} {}  {}",
            change_marker(change.change_type),
            change.change_type.as_str(),
            target,
            change.title
        ));
        for diff in &change.diff {
            lines.push(format!(
                "      {}: {:?} -> {:?}",
                diff.field, diff.old_value, diff.new_value
            ));
        }
    }
    if !preview.soft_delete_scan_complete {
        lines.push(format!(
            "warning: remote scan incomplete, soft deletes may be missing ({})",
            preview.scan_error.as_deref().unwrap_or("unknown error")
        ));
    }
    lines
}

pub(crate) fn format_report(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Synced {} change(s), {} failed, {} skipped",
        report.synced_count,
        report.failed_count(),
        report.skipped_count()
    )];
    for outcome in &report.outcomes {
        let label = outcome.ticket_id.as_deref().unwrap_or(&outcome.change_id);
        match &outcome.status {
            ChangeStatus::Applied { .. } => {}
            ChangeStatus::Failed { error } => {
                lines.push(format!("  failed  {}: {}", label, error));
            }
            ChangeStatus::Skipped { reason } => {
                lines.push(format!("  skipped {}: {}", label, reason));
            }
        }
    }
    lines
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
