// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::run_impl;
use crate::commands::testing::{TestContext, PROJECT};
use bl_core::{TicketPatch, TicketStore, TicketType};

#[test]
fn test_tree_indents_by_level() {
    let ctx = TestContext::new().linked("WEB");
    let epic = ctx.add(TicketType::Epic, "Checkout", None);
    let task = ctx.add(TicketType::Task, "Cart", Some(&epic));
    ctx.add(TicketType::Subtask, "Totals", Some(&task));
    ctx.add(TicketType::Epic, "Search", None);

    let lines = run_impl(&ctx.db, PROJECT).unwrap();

    assert_eq!(lines[0], "Web storefront (web) -> WEB");
    assert!(lines[1].starts_with("  - epic "));
    assert!(lines[1].ends_with(": Checkout"));
    assert!(lines[2].starts_with("    - task "));
    assert!(lines[3].starts_with("      - subtask "));
    assert!(lines[4].ends_with(": Search"));
}

#[test]
fn test_tree_shows_remote_keys() {
    let ctx = TestContext::new();
    let epic = ctx.add(TicketType::Epic, "Checkout", None);
    ctx.db
        .update_ticket(&epic.id, &TicketPatch::link("WEB-1"))
        .unwrap();

    let lines = run_impl(&ctx.db, PROJECT).unwrap();
    assert_eq!(lines[0], "Web storefront (web)");
    assert!(lines[1].ends_with("Checkout [WEB-1]"));
}

#[test]
fn test_tree_empty_project() {
    let ctx = TestContext::new();
    assert_eq!(
        run_impl(&ctx.db, PROJECT).unwrap(),
        ["Web storefront (web)", "  (no tickets)"]
    );
}
