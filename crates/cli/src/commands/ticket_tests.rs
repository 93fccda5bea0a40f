// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{TestContext, PROJECT};
use yare::parameterized;

fn titles_under(ctx: &TestContext, parent: Option<&str>) -> Vec<String> {
    let tickets = ctx.tickets();
    children_by_parent(&tickets)
        .remove(&parent)
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.title.clone())
        .collect()
}

#[test]
fn test_add_appends_to_siblings() {
    let ctx = TestContext::new();
    let epic = add_impl(&ctx.db, PROJECT, TicketType::Epic, "Checkout", None, None).unwrap();
    let first = add_impl(&ctx.db, PROJECT, TicketType::Task, "Cart", Some(&epic.id), None).unwrap();
    let second = add_impl(
        &ctx.db,
        PROJECT,
        TicketType::Task,
        " Payment ",
        Some(&epic.id),
        Some("Card and invoice"),
    )
    .unwrap();

    assert_eq!(first.order_index, 0);
    assert_eq!(second.order_index, 1);
    assert_eq!(second.title, "Payment");
    assert_eq!(second.description, "Card and invoice");
    assert_eq!(second.parent_id.as_deref(), Some(epic.id.as_str()));
}

#[parameterized(
    epic_under_epic = { TicketType::Epic, TicketType::Epic },
    subtask_under_epic = { TicketType::Epic, TicketType::Subtask },
    task_under_task = { TicketType::Task, TicketType::Task },
)]
fn test_add_rejects_wrong_parent(parent_type: TicketType, child_type: TicketType) {
    let ctx = TestContext::new();
    let parent = ctx.add(parent_type, "Parent", None);

    let err = add_impl(&ctx.db, PROJECT, child_type, "Child", Some(&parent.id), None).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(bl_core::Error::InvalidHierarchy(_))
    ));
    assert_eq!(ctx.tickets().len(), 1);
}

#[test]
fn test_add_rejects_parent_from_other_project() {
    let ctx = TestContext::new();
    ctx.db.create_project("api", "API", None).unwrap();
    let foreign = add_impl(&ctx.db, "api", TicketType::Epic, "Auth", None, None).unwrap();

    let err = add_impl(&ctx.db, PROJECT, TicketType::Task, "Login", Some(&foreign.id), None)
        .unwrap_err();
    assert!(err.to_string().contains("belongs to project 'api'"));
}

#[test]
fn test_add_unknown_project() {
    let ctx = TestContext::new();
    let err = add_impl(&ctx.db, "nope", TicketType::Epic, "X", None, None).unwrap_err();
    assert!(matches!(err, Error::Core(bl_core::Error::ProjectNotFound(_))));
}

#[test]
fn test_edit_title_and_description() {
    let ctx = TestContext::new();
    let ticket = ctx.add(TicketType::Task, "Cart", None);

    edit_impl(&ctx.db, &ticket.id, "title", "Shopping cart").unwrap();
    edit_impl(&ctx.db, &ticket.id, "description", "").unwrap();

    let ticket = ctx.get(&ticket.id);
    assert_eq!(ticket.title, "Shopping cart");
    assert_eq!(ticket.description, "");
}

#[parameterized(
    unknown_field = { "status", "done" },
    blank_title = { "title", "  " },
)]
fn test_edit_rejects(field: &str, value: &str) {
    let ctx = TestContext::new();
    let ticket = ctx.add(TicketType::Task, "Cart", None);

    assert!(edit_impl(&ctx.db, &ticket.id, field, value).is_err());
    assert_eq!(ctx.get(&ticket.id).title, "Cart");
}

#[test]
fn test_move_renumbers_densely() {
    let ctx = TestContext::new();
    let epic = ctx.add(TicketType::Epic, "Checkout", None);
    let a = ctx.add(TicketType::Task, "A", Some(&epic));
    ctx.add(TicketType::Task, "B", Some(&epic));
    ctx.add(TicketType::Task, "C", Some(&epic));

    let changed = move_impl(&ctx.db, &a.id, 2).unwrap();

    assert_eq!(changed, 3);
    assert_eq!(titles_under(&ctx, Some(epic.id.as_str())), ["B", "C", "A"]);
    let mut indexes: Vec<i64> = ctx
        .db
        .get_children(&epic.id)
        .unwrap()
        .iter()
        .map(|t| t.order_index)
        .collect();
    indexes.sort_unstable();
    assert_eq!(indexes, [0, 1, 2]);
}

#[test]
fn test_move_past_end_clamps() {
    let ctx = TestContext::new();
    let first = ctx.add(TicketType::Epic, "First", None);
    ctx.add(TicketType::Epic, "Second", None);

    move_impl(&ctx.db, &first.id, 10).unwrap();

    assert_eq!(titles_under(&ctx, None), ["Second", "First"]);
}

#[test]
fn test_move_to_same_place_changes_nothing() {
    let ctx = TestContext::new();
    let first = ctx.add(TicketType::Epic, "First", None);
    ctx.add(TicketType::Epic, "Second", None);

    assert_eq!(move_impl(&ctx.db, &first.id, 0).unwrap(), 0);
}

#[test]
fn test_delete_removes_subtree_deepest_first() {
    let ctx = TestContext::new();
    let epic = ctx.add(TicketType::Epic, "Checkout", None);
    let task = ctx.add(TicketType::Task, "Cart", Some(&epic));
    let subtask = ctx.add(TicketType::Subtask, "Totals", Some(&task));
    let other = ctx.add(TicketType::Epic, "Search", None);

    let deleted = delete_impl(&ctx.db, &epic.id).unwrap();

    assert_eq!(deleted, [subtask.id, task.id, epic.id]);
    let remaining: Vec<String> = ctx.tickets().into_iter().map(|t| t.id).collect();
    assert_eq!(remaining, [other.id]);
}

#[test]
fn test_delete_unknown_ticket() {
    let ctx = TestContext::new();
    assert!(delete_impl(&ctx.db, "web-0000").is_err());
}

#[test]
fn test_list_and_format() {
    let ctx = TestContext::new();
    let epic = ctx.add(TicketType::Epic, "Checkout", None);
    ctx.db
        .update_ticket(&epic.id, &TicketPatch::link("WEB-7"))
        .unwrap();

    let tickets = list_impl(&ctx.db, PROJECT).unwrap();
    assert_eq!(tickets.len(), 1);
    let line = format_ticket_line(&tickets[0]);
    assert!(line.starts_with(&epic.id));
    assert!(line.contains("epic"));
    assert!(line.ends_with("Checkout  [WEB-7]"));
}
