// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! backlog - plan a ticket backlog locally and sync it with a remote tracker.
//!
//! This crate provides the `backlog` CLI: project and ticket management over
//! the [`bl_core`] store, and the [`sync`] engine that previews, executes,
//! and imports changes against a remote issue tracker.
//!
//! # Main Components
//!
//! - [`Config`] - Project configuration (`.backlog/config.toml`)
//! - [`sync::SyncEngine`] - Preview, execute, and import against a [`sync::Tracker`]
//! - [`sync::HttpTracker`] - REST client for the tracker API
//! - [`Error`] - Error types for all operations
//!
//! # Syncing
//!
//! ```rust,ignore
//! use backlog::sync::{HttpTracker, SyncEngine};
//!
//! let tracker = HttpTracker::new(&config.tracker, token)?;
//! let engine = SyncEngine::new(&tracker, &db, site_id);
//! let preview = engine.preview("web", "WEB").await?;
//! let report = engine.execute("web", "WEB", &preview.changes).await?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod envelope;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputArgs, OutputFormat, ProjectCommand, TicketCommand};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config, TrackerConfig};
pub use envelope::Envelope;
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init {
            path,
            workspace,
            site_id,
        } => commands::init::run(path, workspace, site_id),
        Command::Project(cmd) => match cmd {
            ProjectCommand::Add { id, name, source } => {
                commands::project::add(&id, &name, source.as_deref())
            }
            ProjectCommand::Link { id, key } => commands::project::link(&id, &key),
            ProjectCommand::List { output } => commands::project::list(output.output),
        },
        Command::Ticket(cmd) => match cmd {
            TicketCommand::Add {
                project,
                ticket_type,
                title,
                parent,
                description,
                output,
            } => commands::ticket::add(
                &project,
                ticket_type,
                &title,
                parent.as_deref(),
                description.as_deref(),
                output.output,
            ),
            TicketCommand::Edit { id, field, value } => {
                commands::ticket::edit(&id, &field, &value)
            }
            TicketCommand::Move { id, index } => commands::ticket::move_to(&id, index),
            TicketCommand::Delete { id } => commands::ticket::delete(&id),
            TicketCommand::List { project, output } => {
                commands::ticket::list(&project, output.output)
            }
        },
        Command::Tree { project } => commands::tree::run(&project),
        Command::Check { project } => commands::check::run(&project),
        Command::Load {
            project,
            file,
            output,
        } => commands::load::run(&project, &file, output.output),
        Command::Sites { output } => commands::remote::sites(output.output),
        Command::RemoteProjects { output } => commands::remote::projects(output.output),
        Command::IssueTypes { key, output } => commands::remote::issue_types(&key, output.output),
        Command::Preview {
            project,
            out,
            output,
        } => commands::sync::preview(&project, out.as_deref(), output.output),
        Command::Sync {
            project,
            plan,
            output,
        } => commands::sync::sync(&project, plan.as_deref(), output.output),
        Command::Import { project, output } => commands::sync::import(&project, output.output),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "backlog", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
