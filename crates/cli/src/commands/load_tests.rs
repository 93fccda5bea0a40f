// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::commands::testing::{TestContext, PROJECT};
use bl_core::hierarchy::validate;
use yare::parameterized;

const CHECKOUT: &str = r#"[
  {"title": "Checkout", "description": "Pay for the cart", "children": [
    {"title": "Cart", "children": [
      {"title": "Totals"},
      {"title": "Discounts", "description": "Coupon codes"}
    ]},
    {"title": "Payment"}
  ]},
  {"title": "Search"}
]"#;

#[test]
fn test_load_builds_hierarchy() {
    let ctx = TestContext::new();
    let nodes = parse_tree(CHECKOUT).unwrap();

    let report = run_impl(&ctx.db, PROJECT, &nodes).unwrap();

    assert_eq!((report.epics, report.tasks, report.subtasks), (2, 2, 2));
    assert_eq!(report.created.len(), 6);
    let tickets = ctx.tickets();
    assert!(validate(&tickets).is_empty());

    let discounts = tickets.iter().find(|t| t.title == "Discounts").unwrap();
    assert_eq!(discounts.ticket_type, TicketType::Subtask);
    assert_eq!(discounts.description, "Coupon codes");
    assert_eq!(discounts.order_index, 1);
    let cart = ctx.get(discounts.parent_id.as_deref().unwrap());
    assert_eq!(cart.title, "Cart");
    assert_eq!(ctx.get(cart.parent_id.as_deref().unwrap()).title, "Checkout");
}

#[test]
fn test_load_appends_after_existing_epics() {
    let ctx = TestContext::new();
    ctx.add(TicketType::Epic, "Existing", None);

    run_impl(&ctx.db, PROJECT, &parse_tree(r#"[{"title": "New"}]"#).unwrap()).unwrap();

    let tickets = ctx.tickets();
    let new = tickets.iter().find(|t| t.title == "New").unwrap();
    assert_eq!(new.order_index, 1);
}

#[parameterized(
    too_deep = { r#"[{"title": "E", "children": [{"title": "T", "children": [{"title": "S", "children": [{"title": "X"}]}]}]}]"# },
    blank_title = { r#"[{"title": "E", "children": [{"title": " "}]}]"# },
)]
fn test_load_rejects_invalid_tree(json: &str) {
    let ctx = TestContext::new();
    let nodes = parse_tree(json).unwrap();

    let err = run_impl(&ctx.db, PROJECT, &nodes).unwrap_err();

    assert!(matches!(err, Error::InvalidTree(_)));
    assert!(ctx.tickets().is_empty());
}

#[parameterized(
    not_a_list = { r#"{"title": "E"}"# },
    missing_title = { r#"[{"description": "no title"}]"# },
    unknown_field = { r#"[{"title": "E", "subtasks": []}]"# },
)]
fn test_parse_rejects_malformed(json: &str) {
    assert!(matches!(parse_tree(json), Err(Error::InvalidTree(_))));
}

#[test]
fn test_load_unknown_project() {
    let ctx = TestContext::new();
    assert!(run_impl(&ctx.db, "nope", &[]).is_err());
}
