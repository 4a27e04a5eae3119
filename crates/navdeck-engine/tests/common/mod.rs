// Shared fixtures for engine integration tests

#![allow(dead_code)]

use navdeck_core::model::{Group, GroupId, NewSite, Site, SiteId};
use navdeck_engine::commands::{lifecycle, queries};
use navdeck_store::db::{open_store, open_store_in_memory, StoreConfig};
use rusqlite::Connection;
use tempfile::TempDir;

pub const OWNER: &str = "alice";
pub const OTHER_OWNER: &str = "bob";

pub fn setup_test_db() -> Connection {
    open_store_in_memory(&StoreConfig::default()).expect("in-memory store")
}

/// File-backed store for tests that need more than one connection
pub fn setup_file_db() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("navdeck.db");
    open_store(&path, &StoreConfig::default()).unwrap();
    (dir, path)
}

pub fn group(conn: &mut Connection, name: &str) -> Group {
    lifecycle::create_group(OWNER, name, true, conn).unwrap()
}

pub fn site(conn: &mut Connection, group_id: GroupId, name: &str) -> Site {
    let url = format!("https://{}.example", name.to_lowercase());
    lifecycle::create_site(OWNER, group_id, NewSite::new(name, url), conn).unwrap()
}

/// A group holding one site per name, in that order
pub fn group_with_sites(conn: &mut Connection, name: &str, sites: &[&str]) -> (Group, Vec<Site>) {
    let g = group(conn, name);
    let created = sites.iter().map(|s| site(conn, g.id, s)).collect();
    (g, created)
}

pub fn active_site_ids(conn: &Connection, group_id: GroupId) -> Vec<SiteId> {
    queries::list_sites(OWNER, group_id, conn)
        .unwrap()
        .items
        .iter()
        .map(|s| s.id)
        .collect()
}

pub fn active_group_ids(conn: &Connection) -> Vec<GroupId> {
    queries::list_groups(OWNER, conn)
        .unwrap()
        .items
        .iter()
        .map(|g| g.id)
        .collect()
}

pub fn ids(sites: &[Site]) -> Vec<SiteId> {
    sites.iter().map(|s| s.id).collect()
}
