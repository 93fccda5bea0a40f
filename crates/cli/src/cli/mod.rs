// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use bl_core::TicketType;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::OutputArgs;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn ticket_type(s: &str) -> Result<TicketType, String> {
    s.parse().map_err(|e: bl_core::Error| e.to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    #[value(alias = "ids")]
    Id,
}

#[derive(Parser)]
#[command(name = "backlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Plan a ticket backlog locally and keep it in sync with a remote issue tracker")]
#[command(
    long_about = "Plan a ticket backlog locally and keep it in sync with a remote issue tracker.\n\n\
    Tickets form an epic → task → subtask hierarchy. 'backlog preview' shows what a sync \
    would change; 'backlog sync' applies it; 'backlog import' pulls remote issues back."
)]
pub struct Cli {
    /// Run as if backlog was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize a backlog in the current directory (or specified path)
    #[command(after_help = "\
Examples:
  backlog init                              Initialize in the current directory
  backlog init --site-id 1a2b3c             Initialize and select a tracker site
  backlog init --workspace ../shared        Keep the database outside .backlog/")]
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<String>,

        /// Directory for the database, relative to the project root or absolute
        #[arg(long)]
        workspace: Option<String>,

        /// Tracker site (cloud ID) to sync with
        #[arg(long)]
        site_id: Option<String>,
    },

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage tickets
    #[command(subcommand)]
    Ticket(TicketCommand),

    // ─────────────────────────────────────────────────────────────────────────
    // Backlog
    // ─────────────────────────────────────────────────────────────────────────
    /// Show a project's ticket hierarchy
    #[command(arg_required_else_help = true)]
    Tree {
        /// Project ID
        project: String,
    },

    /// Report hierarchy problems in a project
    #[command(arg_required_else_help = true)]
    Check {
        /// Project ID
        project: String,
    },

    /// Load a generated ticket tree from a JSON file
    #[command(
        arg_required_else_help = true,
        after_help = "\
The file holds a list of epics, each with tasks, each with subtasks:

  [{\"title\": \"Checkout\", \"description\": \"...\", \"children\": [
     {\"title\": \"Cart\", \"children\": [{\"title\": \"Totals\"}]}]}]

Examples:
  backlog load web tree.json        Load into project 'web'
  backlog load web -                Read the tree from stdin"
    )]
    Load {
        /// Project ID
        project: String,

        /// Tree file (use '-' for stdin)
        file: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Tracker
    // ─────────────────────────────────────────────────────────────────────────
    /// List tracker sites the token can access
    Sites {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List projects on the configured tracker site
    RemoteProjects {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show which remote issue types tickets map to
    #[command(arg_required_else_help = true)]
    IssueTypes {
        /// Remote project key
        key: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the changes a sync would make
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  backlog preview web                       List pending changes
  backlog preview web --out plan.json       Save the plan for review or editing
  backlog preview web -o json               Print the plan as JSON"
    )]
    Preview {
        /// Project ID
        project: String,

        /// Write the plan to this file
        #[arg(long, value_name = "FILE")]
        out: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Push local changes to the tracker
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  backlog sync web                          Preview and apply in one step
  backlog sync web --plan plan.json         Apply a saved (possibly edited) plan"
    )]
    Sync {
        /// Project ID
        project: String,

        /// Apply this plan instead of computing a fresh one
        #[arg(long, value_name = "FILE")]
        plan: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Pull remote issues into the local backlog
    #[command(arg_required_else_help = true)]
    Import {
        /// Project ID
        project: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate shell completions
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  backlog completion bash > ~/.local/share/bash-completion/completions/backlog
  backlog completion zsh > ~/.zfunc/_backlog"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Project management commands.
#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    #[command(arg_required_else_help = true)]
    Add {
        /// Project ID (2+ lowercase alphanumeric), also the ticket ID prefix
        id: String,

        /// Display name
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Requirements document the backlog is generated from
        #[arg(long, value_name = "PATH")]
        source: Option<String>,
    },

    /// Link a project to a remote project key
    #[command(arg_required_else_help = true)]
    Link {
        /// Project ID
        id: String,

        /// Remote project key (e.g. WEB)
        #[arg(value_parser = non_empty_string)]
        key: String,
    },

    /// List projects
    List {
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Ticket management commands.
#[derive(Subcommand)]
pub enum TicketCommand {
    /// Add a ticket
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  backlog ticket add web epic \"Checkout\"
  backlog ticket add web task \"Cart\" --parent web-1a2b
  backlog ticket add web subtask \"Totals\" -p web-3c4d -d \"Sum line items\"
  backlog ticket add web epic \"Search\" -o id"
    )]
    Add {
        /// Project ID
        project: String,

        /// Ticket type (epic, task, subtask)
        #[arg(value_parser = ticket_type)]
        ticket_type: TicketType,

        /// Title
        #[arg(value_parser = non_empty_string)]
        title: String,

        /// Parent ticket ID
        #[arg(long, short)]
        parent: Option<String>,

        /// Description
        #[arg(long, short)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Edit a ticket's title or description
    #[command(arg_required_else_help = true)]
    Edit {
        /// Ticket ID
        id: String,

        /// Field to edit (title, description)
        field: String,

        /// New value
        value: String,
    },

    /// Move a ticket to a new position among its siblings
    #[command(arg_required_else_help = true)]
    Move {
        /// Ticket ID
        id: String,

        /// Zero-based position
        index: usize,
    },

    /// Delete a ticket and everything under it
    #[command(arg_required_else_help = true)]
    Delete {
        /// Ticket ID
        id: String,
    },

    /// List a project's tickets
    #[command(arg_required_else_help = true)]
    List {
        /// Project ID
        project: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
