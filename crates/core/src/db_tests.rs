// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

fn db_with_project() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.create_project("web", "Web storefront", None).unwrap();
    db
}

#[test]
fn open_in_memory_creates_tables() {
    let db = Database::open_in_memory().unwrap();
    let mut stmt = db
        .conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap();
    let tables: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();

    assert!(tables.contains(&"projects".to_string()));
    assert!(tables.contains(&"tickets".to_string()));
}

#[test]
fn open_on_disk_creates_parent_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("backlog.db");
    let db = Database::open(&path).unwrap();
    db.create_project("web", "Web", None).unwrap();
    assert!(path.exists());
}

#[test]
fn create_and_get_project() {
    let db = db_with_project();
    let project = db.get_project("web").unwrap();
    assert_eq!(project.name, "Web storefront");
    assert!(project.remote_project_key.is_none());
}

#[test]
fn create_project_rejects_duplicates_and_bad_ids() {
    let db = db_with_project();
    assert!(matches!(
        db.create_project("web", "Again", None),
        Err(Error::ProjectExists(_))
    ));
    assert!(matches!(
        db.create_project("Web App", "Bad", None),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn link_project_sets_remote_key() {
    let db = db_with_project();
    db.link_project("web", "WEB").unwrap();
    assert_eq!(
        db.get_project("web").unwrap().remote_project_key.as_deref(),
        Some("WEB")
    );
    assert!(matches!(
        db.link_project("nope", "X"),
        Err(Error::ProjectNotFound(_))
    ));
}

#[test]
fn insert_ticket_assigns_prefixed_id() {
    let db = db_with_project();
    let ticket = db
        .insert_ticket(&NewTicket::new("web", TicketType::Epic, "Checkout"))
        .unwrap();

    assert!(ticket.id.starts_with("web-"));
    let fetched = db.get_ticket(&ticket.id).unwrap();
    assert_eq!(fetched, ticket);
}

#[test]
fn insert_same_title_twice_gets_distinct_ids() {
    let db = db_with_project();
    let a = db
        .insert_ticket(&NewTicket::new("web", TicketType::Task, "Tests"))
        .unwrap();
    let b = db
        .insert_ticket(&NewTicket::new("web", TicketType::Task, "Tests"))
        .unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn insert_ticket_requires_project() {
    let db = Database::open_in_memory().unwrap();
    let result = db.insert_ticket(&NewTicket::new("web", TicketType::Epic, "Orphan"));
    assert!(matches!(result, Err(Error::ProjectNotFound(_))));
}

#[test]
fn list_tickets_orders_parents_first_then_siblings() {
    let db = db_with_project();
    let epic = db
        .insert_ticket(&NewTicket::new("web", TicketType::Epic, "Epic"))
        .unwrap();
    let second = db
        .insert_ticket(
            &NewTicket::new("web", TicketType::Task, "Second")
                .with_parent(&epic.id)
                .with_order(1),
        )
        .unwrap();
    let first = db
        .insert_ticket(
            &NewTicket::new("web", TicketType::Task, "First")
                .with_parent(&epic.id)
                .with_order(0),
        )
        .unwrap();

    let ids: Vec<String> = db
        .list_tickets("web")
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![epic.id, first.id, second.id]);
}

#[test]
fn update_ticket_applies_only_given_fields() {
    let db = db_with_project();
    let ticket = db
        .insert_ticket(&NewTicket::new("web", TicketType::Task, "Old").with_description("Keep"))
        .unwrap();

    db.update_ticket(
        &ticket.id,
        &TicketPatch {
            title: Some("New".into()),
            remote_id: Some(Some("WEB-1".into())),
            ..TicketPatch::default()
        },
    )
    .unwrap();

    let updated = db.get_ticket(&ticket.id).unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.description, "Keep");
    assert_eq!(updated.remote_id.as_deref(), Some("WEB-1"));
}

#[test]
fn update_ticket_can_clear_parent() {
    let db = db_with_project();
    let epic = db
        .insert_ticket(&NewTicket::new("web", TicketType::Epic, "Epic"))
        .unwrap();
    let task = db
        .insert_ticket(&NewTicket::new("web", TicketType::Task, "Task").with_parent(&epic.id))
        .unwrap();

    db.update_ticket(
        &task.id,
        &TicketPatch {
            parent_id: Some(None),
            ..TicketPatch::default()
        },
    )
    .unwrap();
    assert!(db.get_ticket(&task.id).unwrap().parent_id.is_none());
}

#[test]
fn update_missing_ticket_fails() {
    let db = db_with_project();
    let result = db.update_ticket("web-missing", &TicketPatch::link("WEB-1"));
    assert!(matches!(result, Err(Error::TicketNotFound(_))));
}

#[test]
fn remote_id_is_unique_per_project() {
    let db = db_with_project();
    db.insert_ticket(&NewTicket::new("web", TicketType::Task, "A").with_remote_id("WEB-1"))
        .unwrap();
    let dup =
        db.insert_ticket(&NewTicket::new("web", TicketType::Task, "B").with_remote_id("WEB-1"));
    assert!(matches!(dup, Err(Error::Database(_))));
}

#[test]
fn next_order_index_counts_siblings() {
    let db = db_with_project();
    assert_eq!(db.next_order_index("web", None).unwrap(), 0);
    let epic = db
        .insert_ticket(&NewTicket::new("web", TicketType::Epic, "Epic"))
        .unwrap();
    assert_eq!(db.next_order_index("web", None).unwrap(), 1);
    assert_eq!(db.next_order_index("web", Some(&epic.id)).unwrap(), 0);
}

#[test]
fn delete_ticket_refuses_missing() {
    let db = db_with_project();
    assert!(matches!(
        db.delete_ticket("web-missing"),
        Err(Error::TicketNotFound(_))
    ));
}

#[test]
fn parse_db_invalid_type() {
    let result = parse_db::<TicketType>("story", "type");
    assert!(matches!(
        result,
        Err(rusqlite::Error::FromSqlConversionFailure(..))
    ));
}

#[test]
fn parse_timestamp_invalid() {
    let result = parse_timestamp("NOT-A-TIMESTAMP", "created_at");
    assert!(matches!(
        result,
        Err(rusqlite::Error::FromSqlConversionFailure(..))
    ));
}
