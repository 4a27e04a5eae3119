// Integration tests for SqliteRepo row operations

use chrono::{Duration, Utc};
use navdeck_core::model::NewSite;
use navdeck_store::db::{open_store_in_memory, StoreConfig};
use navdeck_store::SqliteRepo;
use rusqlite::Connection;

fn setup_test_db() -> Connection {
    open_store_in_memory(&StoreConfig::default()).expect("Failed to open store")
}

#[test]
fn test_active_listing_orders_by_order_num_then_id() {
    let conn = setup_test_db();
    let now = Utc::now();
    let g = SqliteRepo::insert_group(&conn, "alice", "Tools", true, 0, now).unwrap();
    let a = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("A", "https://a"), 1, now).unwrap();
    let b = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("B", "https://b"), 1, now).unwrap();
    let c = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("C", "https://c"), 0, now).unwrap();

    let ids: Vec<i64> = SqliteRepo::list_active_sites(&conn, g.id)
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
}

#[test]
fn test_cascade_keeps_group_id_and_skips_trashed_sites() {
    let conn = setup_test_db();
    let earlier = Utc::now() - Duration::hours(1);
    let now = Utc::now();
    let g = SqliteRepo::insert_group(&conn, "alice", "Tools", true, 0, now).unwrap();
    let a = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("A", "https://a"), 0, now).unwrap();
    let b = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("B", "https://b"), 1, now).unwrap();
    SqliteRepo::mark_site_deleted(&conn, a.id, earlier).unwrap();

    let cascaded = SqliteRepo::cascade_delete_sites(&conn, g.id, now).unwrap();
    assert_eq!(cascaded, vec![b.id]);

    let a = SqliteRepo::get_site(&conn, a.id).unwrap().unwrap();
    let b = SqliteRepo::get_site(&conn, b.id).unwrap().unwrap();
    assert_eq!(a.group_id, g.id);
    assert_eq!(b.group_id, g.id);
    assert_eq!(
        a.deleted_at.map(|t| t.timestamp_millis()),
        Some(earlier.timestamp_millis())
    );
}

#[test]
fn test_trash_listing_most_recent_first() {
    let conn = setup_test_db();
    let now = Utc::now();
    let g = SqliteRepo::insert_group(&conn, "alice", "Tools", true, 0, now).unwrap();
    let a = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("A", "https://a"), 0, now).unwrap();
    let b = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("B", "https://b"), 1, now).unwrap();
    SqliteRepo::mark_site_deleted(&conn, a.id, now + Duration::seconds(5)).unwrap();
    SqliteRepo::mark_site_deleted(&conn, b.id, now).unwrap();

    let ids: Vec<i64> = SqliteRepo::list_trashed_sites(&conn, "alice")
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);
    assert!(SqliteRepo::list_trashed_sites(&conn, "bob").unwrap().is_empty());
}

#[test]
fn test_deleting_group_row_leaves_sites() {
    let conn = setup_test_db();
    let now = Utc::now();
    let g = SqliteRepo::insert_group(&conn, "alice", "Tools", true, 0, now).unwrap();
    let a = SqliteRepo::insert_site(&conn, "alice", g.id, &NewSite::new("A", "https://a"), 0, now).unwrap();

    assert!(SqliteRepo::delete_group_row(&conn, g.id).unwrap());

    assert!(SqliteRepo::get_group(&conn, g.id).unwrap().is_none());
    let site = SqliteRepo::get_site(&conn, a.id).unwrap().unwrap();
    assert_eq!(site.group_id, g.id);
}

#[test]
fn test_ids_are_not_reused() {
    let conn = setup_test_db();
    let now = Utc::now();
    let first = SqliteRepo::insert_group(&conn, "alice", "One", true, 0, now).unwrap();
    SqliteRepo::delete_group_row(&conn, first.id).unwrap();
    let second = SqliteRepo::insert_group(&conn, "alice", "Two", true, 0, now).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn test_restore_places_site() {
    let conn = setup_test_db();
    let now = Utc::now();
    let g1 = SqliteRepo::insert_group(&conn, "alice", "One", true, 0, now).unwrap();
    let g2 = SqliteRepo::insert_group(&conn, "alice", "Two", true, 1, now).unwrap();
    let a = SqliteRepo::insert_site(&conn, "alice", g1.id, &NewSite::new("A", "https://a"), 0, now).unwrap();
    SqliteRepo::mark_site_deleted(&conn, a.id, now).unwrap();

    assert!(SqliteRepo::mark_site_restored(&conn, a.id, g2.id, 3, now).unwrap());

    let site = SqliteRepo::get_site(&conn, a.id).unwrap().unwrap();
    assert!(site.is_active());
    assert_eq!(site.group_id, g2.id);
    assert_eq!(site.order_num, 3);
    assert!(site.deleted_at.is_none());
}
