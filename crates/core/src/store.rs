// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Storage seam used by the sync engine.
//!
//! The engine only ever reads a project's snapshot, inserts tickets, and
//! patches individual tickets. [`Database`](crate::Database) is the
//! production implementation.

use crate::error::Result;
use crate::ticket::{NewTicket, Ticket, TicketPatch};

/// Persistent ticket hierarchy, one project at a time.
pub trait TicketStore {
    /// All tickets of a project, parents-first and in sibling order.
    fn list_tickets(&self, project_id: &str) -> Result<Vec<Ticket>>;

    /// Insert a ticket and return it with its assigned ID.
    fn insert_ticket(&self, ticket: &NewTicket) -> Result<Ticket>;

    /// Apply a partial update to one ticket.
    fn update_ticket(&self, id: &str, patch: &TicketPatch) -> Result<()>;
}
