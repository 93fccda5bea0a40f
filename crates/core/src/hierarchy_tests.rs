// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::Utc;

fn ticket(id: &str, ticket_type: TicketType, parent: Option<&str>, order: i64) -> Ticket {
    let now = Utc::now();
    Ticket {
        id: id.to_string(),
        project_id: "web".to_string(),
        ticket_type,
        title: id.to_uppercase(),
        description: String::new(),
        parent_id: parent.map(String::from),
        order_index: order,
        remote_id: None,
        created_at: now,
        updated_at: now,
    }
}

fn sample_tree() -> Vec<Ticket> {
    vec![
        ticket("e1", TicketType::Epic, None, 0),
        ticket("t2", TicketType::Task, Some("e1"), 1),
        ticket("t1", TicketType::Task, Some("e1"), 0),
        ticket("s1", TicketType::Subtask, Some("t1"), 0),
        ticket("e2", TicketType::Epic, None, 1),
    ]
}

#[test]
fn check_parent_accepts_valid_links() {
    let epic = ticket("e1", TicketType::Epic, None, 0);
    let task = ticket("t1", TicketType::Task, Some("e1"), 0);
    assert!(check_parent(TicketType::Epic, None).is_ok());
    assert!(check_parent(TicketType::Task, Some(&epic)).is_ok());
    assert!(check_parent(TicketType::Task, None).is_ok());
    assert!(check_parent(TicketType::Subtask, Some(&task)).is_ok());
}

#[test]
fn check_parent_rejects_invalid_links() {
    let epic = ticket("e1", TicketType::Epic, None, 0);
    assert!(matches!(
        check_parent(TicketType::Epic, Some(&epic)),
        Err(Error::InvalidHierarchy(_))
    ));
    assert!(matches!(
        check_parent(TicketType::Subtask, Some(&epic)),
        Err(Error::InvalidHierarchy(_))
    ));
}

#[test]
fn validate_clean_tree_has_no_violations() {
    assert!(validate(&sample_tree()).is_empty());
}

#[test]
fn validate_reports_each_kind() {
    let tickets = vec![
        ticket("e1", TicketType::Epic, None, 0),
        ticket("e2", TicketType::Epic, Some("e1"), 0),
        ticket("s1", TicketType::Subtask, Some("e1"), 0),
        ticket("t9", TicketType::Task, Some("gone"), 0),
    ];
    let violations = validate(&tickets);

    assert!(violations.contains(&Violation::EpicHasParent { id: "e2".into() }));
    assert!(violations.contains(&Violation::WrongParentType {
        id: "s1".into(),
        expected: TicketType::Task,
        actual: TicketType::Epic,
    }));
    assert!(violations.contains(&Violation::MissingParent {
        id: "t9".into(),
        parent_id: "gone".into(),
    }));
}

#[test]
fn validate_detects_cycle() {
    let tickets = vec![
        ticket("t1", TicketType::Task, Some("t2"), 0),
        ticket("t2", TicketType::Task, Some("t1"), 0),
    ];
    let violations = validate(&tickets);
    assert!(violations.contains(&Violation::Cycle { id: "t1".into() }));
}

#[test]
fn descendants_walks_breadth_first() {
    let tickets = sample_tree();
    assert_eq!(descendants(&tickets, "e1").unwrap(), vec!["t1", "t2", "s1"]);
    assert!(descendants(&tickets, "s1").unwrap().is_empty());
}

#[test]
fn descendants_stops_on_cycle() {
    let tickets = vec![
        ticket("t1", TicketType::Task, Some("t2"), 0),
        ticket("t2", TicketType::Task, Some("t1"), 0),
    ];
    assert!(matches!(
        descendants(&tickets, "t1"),
        Err(Error::CycleDetected(_))
    ));
}

#[test]
fn depth_first_orders_by_type_and_sibling_index() {
    let tickets = sample_tree();
    let walk: Vec<(usize, &str)> = depth_first(&tickets)
        .into_iter()
        .map(|(depth, t)| (depth, t.id.as_str()))
        .collect();
    assert_eq!(
        walk,
        vec![(0, "e1"), (1, "t1"), (2, "s1"), (1, "t2"), (0, "e2")]
    );
}

#[test]
fn reorder_returns_only_changed_indexes() {
    let siblings = vec![
        ticket("a", TicketType::Task, Some("e1"), 0),
        ticket("b", TicketType::Task, Some("e1"), 1),
        ticket("c", TicketType::Task, Some("e1"), 2),
    ];
    let changes = reorder(&siblings, "c", 0).unwrap();
    assert_eq!(
        changes,
        vec![("c".to_string(), 0), ("a".to_string(), 1), ("b".to_string(), 2)]
    );

    assert!(reorder(&siblings, "a", 0).unwrap().is_empty());
    assert!(matches!(
        reorder(&siblings, "zz", 0),
        Err(Error::TicketNotFound(_))
    ));
}

#[test]
fn reorder_clamps_past_end() {
    let siblings = vec![
        ticket("a", TicketType::Task, None, 0),
        ticket("b", TicketType::Task, None, 1),
    ];
    let changes = reorder(&siblings, "a", 99).unwrap();
    assert_eq!(changes, vec![("b".to_string(), 0), ("a".to_string(), 1)]);
}
