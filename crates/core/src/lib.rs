// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! bl-core: Shared library for the backlog sync tool
//!
//! This crate provides the ticket hierarchy model, the SQLite-backed ticket
//! store, hierarchy traversal helpers, and the tracker rich-text document
//! format used by the sync engine.

pub mod db;
pub mod error;
pub mod hierarchy;
pub mod id;
pub mod rich_text;
pub mod store;
pub mod ticket;

pub use db::Database;
pub use error::{Error, Result};
pub use rich_text::Document;
pub use store::TicketStore;
pub use ticket::{NewTicket, Project, Ticket, TicketPatch, TicketType};
