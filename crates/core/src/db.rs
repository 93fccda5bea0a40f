// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed database for the ticket hierarchy.
//!
//! The [`Database`] struct provides all data access operations for projects
//! and tickets, and implements [`TicketStore`] for the sync engine.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::error::{Error, Result};
use crate::id::{generate_unique_id, validate_project_id};
use crate::store::TicketStore;
use crate::ticket::{NewTicket, Project, Ticket, TicketPatch, TicketType};

/// SQL schema for the backlog database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    remote_project_key TEXT,
    source_document TEXT,
    created_at TEXT NOT NULL
);

-- Flat ticket table; the hierarchy lives in parent_id
CREATE TABLE IF NOT EXISTS tickets (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    parent_id TEXT,
    order_index INTEGER NOT NULL DEFAULT 0,
    remote_id TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (project_id) REFERENCES projects(id),
    FOREIGN KEY (parent_id) REFERENCES tickets(id),
    CHECK (parent_id IS NULL OR parent_id != id)
);

CREATE INDEX IF NOT EXISTS idx_tickets_project ON tickets(project_id);
CREATE INDEX IF NOT EXISTS idx_tickets_parent ON tickets(parent_id);
-- A remote issue is linked to at most one ticket per project
CREATE UNIQUE INDEX IF NOT EXISTS idx_tickets_remote
    ON tickets(project_id, remote_id) WHERE remote_id IS NOT NULL;
"#;

const TICKET_COLUMNS: &str = "id, project_id, type, title, description, parent_id,
     order_index, remote_id, created_at, updated_at";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn ticket_from_row(row: &Row<'_>) -> std::result::Result<Ticket, rusqlite::Error> {
    let type_str: String = row.get(2)?;
    let created_str: String = row.get(8)?;
    let updated_str: String = row.get(9)?;

    Ok(Ticket {
        id: row.get(0)?,
        project_id: row.get(1)?,
        ticket_type: parse_db::<TicketType>(&type_str, "type")?,
        title: row.get(3)?,
        description: row.get(4)?,
        parent_id: row.get(5)?,
        order_index: row.get(6)?,
        remote_id: row.get(7)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

fn project_from_row(row: &Row<'_>) -> std::result::Result<Project, rusqlite::Error> {
    let created_str: String = row.get(4)?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        remote_project_key: row.get(2)?,
        source_document: row.get(3)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

/// Run schema creation on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with backlog operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────────────────

    /// Create a new project.
    pub fn create_project(
        &self,
        id: &str,
        name: &str,
        source_document: Option<&str>,
    ) -> Result<Project> {
        if !validate_project_id(id) {
            return Err(Error::InvalidInput(format!(
                "invalid project id '{id}': must be 2+ lowercase alphanumeric with at least one letter"
            )));
        }
        if self.project_exists(id)? {
            return Err(Error::ProjectExists(id.to_string()));
        }

        let project = Project {
            id: id.to_string(),
            name: name.to_string(),
            remote_project_key: None,
            source_document: source_document.map(String::from),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO projects (id, name, remote_project_key, source_document, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                project.id,
                project.name,
                project.remote_project_key,
                project.source_document,
                project.created_at.to_rfc3339(),
            ],
        )?;
        Ok(project)
    }

    /// Get a project by ID.
    pub fn get_project(&self, id: &str) -> Result<Project> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, remote_project_key, source_document, created_at
                 FROM projects WHERE id = ?1",
                params![id],
                project_from_row,
            )
            .optional()?;

        project.ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    /// Check if a project exists.
    pub fn project_exists(&self, id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM projects WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List all projects ordered by ID.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, remote_project_key, source_document, created_at
             FROM projects ORDER BY id",
        )?;
        let projects = stmt
            .query_map([], project_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    /// Link a project to a remote tracker project key.
    pub fn link_project(&self, id: &str, remote_project_key: &str) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE projects SET remote_project_key = ?1 WHERE id = ?2",
            params![remote_project_key, id],
        )?;
        if affected == 0 {
            return Err(Error::ProjectNotFound(id.to_string()));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tickets
    // ─────────────────────────────────────────────────────────────────────

    /// Get a ticket by ID.
    pub fn get_ticket(&self, id: &str) -> Result<Ticket> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1");
        let ticket = self
            .conn
            .query_row(&sql, params![id], ticket_from_row)
            .optional()?;

        ticket.ok_or_else(|| Error::TicketNotFound(id.to_string()))
    }

    /// Check if a ticket exists.
    pub fn ticket_exists(&self, id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tickets WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Direct children of a ticket, in sibling order.
    pub fn get_children(&self, parent_id: &str) -> Result<Vec<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE parent_id = ?1
             ORDER BY order_index, created_at, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tickets = stmt
            .query_map(params![parent_id], ticket_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    /// The next free `order_index` among the siblings under `parent_id`.
    pub fn next_order_index(&self, project_id: &str, parent_id: Option<&str>) -> Result<i64> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(order_index) FROM tickets
             WHERE project_id = ?1 AND parent_id IS ?2",
            params![project_id, parent_id],
            |row| row.get(0),
        )?;
        Ok(max.map_or(0, |m| m + 1))
    }

    /// Delete a single ticket. Children must be removed first.
    pub fn delete_ticket(&self, id: &str) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM tickets WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::TicketNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Count tickets of a project.
    pub fn count_tickets(&self, project_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tickets WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

impl TicketStore for Database {
    fn list_tickets(&self, project_id: &str) -> Result<Vec<Ticket>> {
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE project_id = ?1
             ORDER BY CASE type WHEN 'epic' THEN 0 WHEN 'task' THEN 1 ELSE 2 END,
                      order_index, created_at, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tickets = stmt
            .query_map(params![project_id], ticket_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tickets)
    }

    fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket> {
        if !self.project_exists(&ticket.project_id)? {
            return Err(Error::ProjectNotFound(ticket.project_id.clone()));
        }

        let now = Utc::now();
        let id = generate_unique_id(&ticket.project_id, &ticket.title, &now, |candidate| {
            self.ticket_exists(candidate)
        })?;

        let sql = format!(
            "INSERT INTO tickets ({TICKET_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        );
        self.conn.execute(
            &sql,
            params![
                id,
                ticket.project_id,
                ticket.ticket_type.as_str(),
                ticket.title,
                ticket.description,
                ticket.parent_id,
                ticket.order_index,
                ticket.remote_id,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(Ticket {
            id,
            project_id: ticket.project_id.clone(),
            ticket_type: ticket.ticket_type,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            parent_id: ticket.parent_id.clone(),
            order_index: ticket.order_index,
            remote_id: ticket.remote_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update_ticket(&self, id: &str, patch: &TicketPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(ticket_type) = patch.ticket_type {
            sets.push("type = ?");
            values.push(Value::Text(ticket_type.as_str().to_string()));
        }
        if let Some(title) = &patch.title {
            sets.push("title = ?");
            values.push(Value::Text(title.clone()));
        }
        if let Some(description) = &patch.description {
            sets.push("description = ?");
            values.push(Value::Text(description.clone()));
        }
        if let Some(parent_id) = &patch.parent_id {
            sets.push("parent_id = ?");
            values.push(parent_id.clone().map_or(Value::Null, Value::Text));
        }
        if let Some(order_index) = patch.order_index {
            sets.push("order_index = ?");
            values.push(Value::Integer(order_index));
        }
        if let Some(remote_id) = &patch.remote_id {
            sets.push("remote_id = ?");
            values.push(remote_id.clone().map_or(Value::Null, Value::Text));
        }

        sets.push("updated_at = ?");
        values.push(Value::Text(Utc::now().to_rfc3339()));
        values.push(Value::Text(id.to_string()));

        let sql = format!("UPDATE tickets SET {} WHERE id = ?", sets.join(", "));
        let affected = self.conn.execute(&sql, params_from_iter(values))?;
        if affected == 0 {
            return Err(Error::TicketNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
