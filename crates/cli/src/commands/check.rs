// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use bl_core::hierarchy::{validate, Violation};
use bl_core::{Database, TicketStore};

use crate::error::{Error, Result};

use super::open_db;

pub fn run(project: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    let violations = run_impl(&db, project)?;
    if violations.is_empty() {
        println!("{}: hierarchy ok", project);
        return Ok(());
    }
    for violation in &violations {
        println!("{}", violation);
    }
    Err(Error::Core(bl_core::Error::InvalidHierarchy(format!(
        "{} problem(s) in project '{}'",
        violations.len(),
        project
    ))))
}

pub(crate) fn run_impl(db: &Database, project: &str) -> Result<Vec<Violation>> {
    db.get_project(project)?;
    Ok(validate(&db.list_tickets(project)?))
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
