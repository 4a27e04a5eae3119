//! Row mapping between SQLite and the core models

use chrono::{DateTime, Utc};
use navdeck_core::model::{Group, Site};
use rusqlite::Row;

pub(crate) const GROUP_COLUMNS: &str =
    "id, owner_id, name, order_num, is_public, is_deleted, deleted_at, created_at, updated_at";

pub(crate) const SITE_COLUMNS: &str = "id, owner_id, group_id, name, url, icon, description, notes, \
     order_num, is_public, is_featured, is_deleted, deleted_at, last_clicked_at, created_at, updated_at";

pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}

fn from_millis_opt(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(DateTime::from_timestamp_millis)
}

pub(crate) fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        order_num: row.get(3)?,
        is_public: row.get(4)?,
        is_deleted: row.get(5)?,
        deleted_at: from_millis_opt(row.get(6)?),
        created_at: from_millis(row.get(7)?),
        updated_at: from_millis(row.get(8)?),
    })
}

pub(crate) fn site_from_row(row: &Row<'_>) -> rusqlite::Result<Site> {
    Ok(Site {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        group_id: row.get(2)?,
        name: row.get(3)?,
        url: row.get(4)?,
        icon: row.get(5)?,
        description: row.get(6)?,
        notes: row.get(7)?,
        order_num: row.get(8)?,
        is_public: row.get(9)?,
        is_featured: row.get(10)?,
        is_deleted: row.get(11)?,
        deleted_at: from_millis_opt(row.get(12)?),
        last_clicked_at: from_millis_opt(row.get(13)?),
        created_at: from_millis(row.get(14)?),
        updated_at: from_millis(row.get(15)?),
    })
}
