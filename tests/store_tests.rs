// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use subclip::service::{self, SortKey, SubscriptionPatch};
use subclip::store::{SqliteStore, SubscriptionStore};
use subclip::{db, Cadence, Category, NewSubscription, StoreError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn new_sub(owner_id: i64, name: &str, amount: &str, cadence: Cadence, due: NaiveDate) -> NewSubscription {
    NewSubscription {
        owner_id,
        name: name.into(),
        amount: Decimal::from_str_exact(amount).unwrap(),
        category: Category::Streaming,
        cadence,
        due_date: due,
    }
}

#[test]
fn create_then_load_round_trips_exactly() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let created = store
        .create(new_sub(1, "Disney+", "33.90", Cadence::Monthly, d(2024, 1, 31)))
        .unwrap();
    let loaded = store.load(created.id()).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.amount().to_string(), "33.90");

    let stored: String = conn
        .query_row(
            "SELECT amount FROM subscriptions WHERE id=?1",
            params![created.id()],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored, "33.90");
}

#[test]
fn confirm_payment_persists_ledger_in_order() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let s = store
        .create(new_sub(1, "Spotify", "21.90", Cadence::Monthly, d(2024, 1, 31)))
        .unwrap();
    service::confirm_payment(&store, 1, s.id(), d(2024, 1, 30)).unwrap();
    service::confirm_payment(&store, 1, s.id(), d(2024, 2, 28)).unwrap();
    let after = service::confirm_payment(&store, 1, s.id(), d(2024, 3, 29)).unwrap();

    let loaded = store.load(s.id()).unwrap();
    assert_eq!(loaded, after);
    assert_eq!(loaded.due_date(), d(2024, 4, 29));
    let covered: Vec<NaiveDate> = loaded
        .history()
        .iter()
        .map(|e| e.covered_due_date)
        .collect();
    assert_eq!(covered, vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 29)]);
    assert_eq!(loaded.history().as_slice()[0].paid_on, d(2024, 1, 30));
    assert_eq!(loaded.version(), 3);
}

#[test]
fn stale_save_is_a_conflict_and_applies_nothing() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let s = store
        .create(new_sub(1, "Xbox", "44.99", Cadence::Monthly, d(2024, 5, 1)))
        .unwrap();

    let mut first = store.load(s.id()).unwrap();
    let mut second = store.load(s.id()).unwrap();
    first.confirm_payment(d(2024, 5, 1)).unwrap();
    store.save(&mut first).unwrap();

    second.confirm_payment(d(2024, 5, 1)).unwrap();
    let err = store.save(&mut second).unwrap_err();
    assert!(err.is_conflict(), "got {err:?}");

    let loaded = store.load(s.id()).unwrap();
    assert_eq!(loaded.history().len(), 1);
    assert_eq!(loaded.due_date(), d(2024, 6, 1));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM payments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn missing_and_foreign_records_are_not_found() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    assert!(matches!(store.load(42), Err(StoreError::NotFound(42))));
    assert!(store.delete(42).unwrap_err().is_not_found());

    let s = store
        .create(new_sub(1, "Mine", "10", Cadence::Weekly, d(2024, 5, 1)))
        .unwrap();
    let err = service::confirm_payment(&store, 2, s.id(), d(2024, 5, 1)).unwrap_err();
    assert!(err.is_not_found());
    assert!(store.load(s.id()).unwrap().history().is_empty());
}

#[test]
fn save_after_delete_is_not_found() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let s = store
        .create(new_sub(1, "Gone", "10", Cadence::Weekly, d(2024, 5, 1)))
        .unwrap();
    let mut stale = store.load(s.id()).unwrap();
    store.delete(s.id()).unwrap();
    stale.confirm_payment(d(2024, 5, 1)).unwrap();
    assert!(store.save(&mut stale).unwrap_err().is_not_found());
}

#[test]
fn delete_removes_ledger_and_derived_views() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let s = store
        .create(new_sub(1, "HBO", "29.90", Cadence::Monthly, d(2024, 6, 10)))
        .unwrap();
    service::confirm_payment(&store, 1, s.id(), d(2024, 6, 10)).unwrap();
    service::delete(&store, 1, s.id()).unwrap();

    assert!(store.list_all(1).unwrap().is_empty());
    assert!(service::due_soon(&store, 1, d(2024, 7, 1), 30).unwrap().is_empty());
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM payments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn paused_records_leave_the_active_list() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let a = store
        .create(new_sub(1, "A", "1", Cadence::Monthly, d(2024, 6, 11)))
        .unwrap();
    store
        .create(new_sub(1, "B", "1", Cadence::Monthly, d(2024, 6, 12)))
        .unwrap();
    store
        .create(new_sub(2, "Other owner", "1", Cadence::Monthly, d(2024, 6, 12)))
        .unwrap();

    service::set_active(&store, 1, a.id(), false).unwrap();
    let active: Vec<String> = store
        .list_active(1)
        .unwrap()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    assert_eq!(active, vec!["B"]);
    assert_eq!(store.list_all(1).unwrap().len(), 2);

    let due = service::due_soon(&store, 1, d(2024, 6, 10), 30).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].1, 2);

    service::set_active(&store, 1, a.id(), true).unwrap();
    assert_eq!(store.list_active(1).unwrap().len(), 2);
}

#[test]
fn update_changes_fields_but_not_history() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let s = store
        .create(new_sub(1, "Game Pass", "44.99", Cadence::Monthly, d(2024, 6, 1)))
        .unwrap();
    service::confirm_payment(&store, 1, s.id(), d(2024, 6, 1)).unwrap();

    let updated = service::update(
        &store,
        1,
        s.id(),
        SubscriptionPatch {
            name: Some("Game Pass Ultimate".into()),
            amount: Some(Decimal::from_str_exact("59.99").unwrap()),
            category: Some(Category::Games),
            cadence: Some(Cadence::Annual),
        },
    )
    .unwrap();
    let loaded = store.load(s.id()).unwrap();
    assert_eq!(loaded, updated);
    assert_eq!(loaded.category(), Category::Games);
    assert_eq!(loaded.cadence(), Cadence::Annual);
    assert_eq!(loaded.due_date(), d(2024, 7, 1));
    assert_eq!(loaded.history().len(), 1);

    let err = service::update(
        &store,
        1,
        s.id(),
        SubscriptionPatch {
            amount: Some(Decimal::ZERO),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
    assert_eq!(store.load(s.id()).unwrap().amount().to_string(), "59.99");
}

#[test]
fn sorted_and_search_views() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    store
        .create(new_sub(1, "Netflix", "55.90", Cadence::Monthly, d(2024, 6, 20)))
        .unwrap();
    store
        .create(new_sub(1, "Amazon Prime", "14.90", Cadence::Monthly, d(2024, 6, 25)))
        .unwrap();
    store
        .create(new_sub(1, "iCloud", "3.50", Cadence::Monthly, d(2024, 6, 5)))
        .unwrap();

    let names = |key| -> Vec<String> {
        service::sorted(&store, 1, key, false)
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    };
    assert_eq!(names(SortKey::Name), vec!["Amazon Prime", "iCloud", "Netflix"]);
    assert_eq!(names(SortKey::Price), vec!["iCloud", "Amazon Prime", "Netflix"]);
    assert_eq!(names(SortKey::DueDate), vec!["iCloud", "Netflix", "Amazon Prime"]);

    let hits = service::search_by_name(&store, 1, "  NET ").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name(), "Netflix");
    assert!(service::search_by_name(&store, 2, "net").unwrap().is_empty());
    assert!("weird".parse::<SortKey>().is_err());
}

#[test]
fn import_inside_outer_transaction_keeps_history() {
    let mut conn = setup();
    let source = {
        let store = SqliteStore::new(&conn);
        let s = store
            .create(new_sub(1, "YouTube", "24.90", Cadence::Monthly, d(2024, 1, 31)))
            .unwrap();
        service::confirm_payment(&store, 1, s.id(), d(2024, 1, 31)).unwrap();
        service::confirm_payment(&store, 1, s.id(), d(2024, 2, 29)).unwrap()
    };

    let tx = conn.transaction().unwrap();
    let copy = SqliteStore::new(&tx).insert_with_history(&source).unwrap();
    tx.commit().unwrap();

    let store = SqliteStore::new(&conn);
    let loaded = store.load(copy.id()).unwrap();
    assert_ne!(loaded.id(), source.id());
    assert_eq!(loaded.history(), source.history());
    assert_eq!(loaded.due_date(), source.due_date());
}
