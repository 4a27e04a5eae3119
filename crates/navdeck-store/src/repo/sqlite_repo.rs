//! SQLite repository implementation
//!
//! All functions take `&Connection`; pass a `Transaction` (it derefs) when
//! several writes must commit together.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use navdeck_core::model::{Group, GroupId, NewSite, Site, SiteId};
use navdeck_core::ordering::OrderKey;
use rusqlite::{params, Connection, OptionalExtension};

use super::rows::{group_from_row, site_from_row, to_millis, GROUP_COLUMNS, SITE_COLUMNS};
use crate::errors::{from_rusqlite, Result};

/// SQLite repository for groups and sites
pub struct SqliteRepo;

impl SqliteRepo {
    // ---------- groups ----------

    /// Insert a new active group and return it as stored
    pub fn insert_group(
        conn: &Connection,
        owner_id: &str,
        name: &str,
        is_public: bool,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<Group> {
        conn.execute(
            "INSERT INTO groups (owner_id, name, order_num, is_public, is_deleted, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            params![owner_id, name, order_num, is_public, to_millis(now)],
        )
        .map_err(from_rusqlite)?;

        let id = conn.last_insert_rowid();
        Self::require_group(conn, id)
    }

    /// Load a group by id, active or trashed
    pub fn get_group(conn: &Connection, group_id: GroupId) -> Result<Option<Group>> {
        let sql = format!("SELECT {} FROM groups WHERE id = ?1", GROUP_COLUMNS);
        conn.query_row(&sql, [group_id], group_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// Active groups of an owner in `(order_num, id)` order
    pub fn list_active_groups(conn: &Connection, owner_id: &str) -> Result<Vec<Group>> {
        let sql = format!(
            "SELECT {} FROM groups WHERE owner_id = ?1 AND is_deleted = 0 ORDER BY order_num, id",
            GROUP_COLUMNS
        );
        Self::query_groups(conn, &sql, params![owner_id])
    }

    /// Order keys of an owner's active groups
    pub fn active_group_keys(conn: &Connection, owner_id: &str) -> Result<Vec<OrderKey>> {
        Self::query_keys(
            conn,
            "SELECT id, order_num FROM groups WHERE owner_id = ?1 AND is_deleted = 0 ORDER BY order_num, id",
            params![owner_id],
        )
    }

    /// Trashed groups of an owner, most recently deleted first
    pub fn list_trashed_groups(conn: &Connection, owner_id: &str) -> Result<Vec<Group>> {
        let sql = format!(
            "SELECT {} FROM groups WHERE owner_id = ?1 AND is_deleted = 1
             ORDER BY deleted_at DESC, id ASC",
            GROUP_COLUMNS
        );
        Self::query_groups(conn, &sql, params![owner_id])
    }

    pub fn set_group_order(
        conn: &Connection,
        group_id: GroupId,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        conn.execute(
            "UPDATE groups SET order_num = ?1, updated_at = ?2 WHERE id = ?3",
            params![order_num, to_millis(now), group_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Move an active group to the trash
    ///
    /// Returns false when the group was not active.
    pub fn mark_group_deleted(
        conn: &Connection,
        group_id: GroupId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE groups SET is_deleted = 1, deleted_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND is_deleted = 0",
                params![to_millis(now), group_id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Reactivate a trashed group at `order_num`
    pub fn mark_group_restored(
        conn: &Connection,
        group_id: GroupId,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE groups SET is_deleted = 0, deleted_at = NULL, order_num = ?1, updated_at = ?2
                 WHERE id = ?3 AND is_deleted = 1",
                params![order_num, to_millis(now), group_id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Remove a group row; its sites are untouched
    pub fn delete_group_row(conn: &Connection, group_id: GroupId) -> Result<bool> {
        let changed = conn
            .execute("DELETE FROM groups WHERE id = ?1", [group_id])
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Remove every trashed group of an owner, returning their ids
    pub fn delete_trashed_groups(conn: &Connection, owner_id: &str) -> Result<Vec<GroupId>> {
        let ids = Self::query_ids(
            conn,
            "SELECT id FROM groups WHERE owner_id = ?1 AND is_deleted = 1 ORDER BY id",
            params![owner_id],
        )?;
        conn.execute(
            "DELETE FROM groups WHERE owner_id = ?1 AND is_deleted = 1",
            [owner_id],
        )
        .map_err(from_rusqlite)?;
        Ok(ids)
    }

    // ---------- sites ----------

    /// Insert a new active site and return it as stored
    pub fn insert_site(
        conn: &Connection,
        owner_id: &str,
        group_id: GroupId,
        site: &NewSite,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<Site> {
        conn.execute(
            "INSERT INTO sites (owner_id, group_id, name, url, icon, description, notes,
                                order_num, is_public, is_featured, is_deleted, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11, ?11)",
            params![
                owner_id,
                group_id,
                site.name,
                site.url,
                site.icon,
                site.description,
                site.notes,
                order_num,
                site.is_public,
                site.is_featured,
                to_millis(now),
            ],
        )
        .map_err(from_rusqlite)?;

        let id = conn.last_insert_rowid();
        Self::require_site(conn, id)
    }

    /// Load a site by id, active or trashed
    pub fn get_site(conn: &Connection, site_id: SiteId) -> Result<Option<Site>> {
        let sql = format!("SELECT {} FROM sites WHERE id = ?1", SITE_COLUMNS);
        conn.query_row(&sql, [site_id], site_from_row)
            .optional()
            .map_err(from_rusqlite)
    }

    /// Active sites of a group in `(order_num, id)` order
    pub fn list_active_sites(conn: &Connection, group_id: GroupId) -> Result<Vec<Site>> {
        let sql = format!(
            "SELECT {} FROM sites WHERE group_id = ?1 AND is_deleted = 0 ORDER BY order_num, id",
            SITE_COLUMNS
        );
        Self::query_sites(conn, &sql, params![group_id])
    }

    /// Order keys of a group's active sites
    pub fn active_site_keys(conn: &Connection, group_id: GroupId) -> Result<Vec<OrderKey>> {
        Self::query_keys(
            conn,
            "SELECT id, order_num FROM sites WHERE group_id = ?1 AND is_deleted = 0 ORDER BY order_num, id",
            params![group_id],
        )
    }

    /// Trashed sites of an owner, most recently deleted first
    pub fn list_trashed_sites(conn: &Connection, owner_id: &str) -> Result<Vec<Site>> {
        let sql = format!(
            "SELECT {} FROM sites WHERE owner_id = ?1 AND is_deleted = 1
             ORDER BY deleted_at DESC, id ASC",
            SITE_COLUMNS
        );
        Self::query_sites(conn, &sql, params![owner_id])
    }

    pub fn set_site_order(
        conn: &Connection,
        site_id: SiteId,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        conn.execute(
            "UPDATE sites SET order_num = ?1, updated_at = ?2 WHERE id = ?3",
            params![order_num, to_millis(now), site_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Reassign a site to a group at `order_num`
    pub fn set_site_placement(
        conn: &Connection,
        site_id: SiteId,
        group_id: GroupId,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        conn.execute(
            "UPDATE sites SET group_id = ?1, order_num = ?2, updated_at = ?3 WHERE id = ?4",
            params![group_id, order_num, to_millis(now), site_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Move an active site to the trash, keeping its `group_id`
    ///
    /// Returns false when the site was not active.
    pub fn mark_site_deleted(conn: &Connection, site_id: SiteId, now: DateTime<Utc>) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE sites SET is_deleted = 1, deleted_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND is_deleted = 0",
                params![to_millis(now), site_id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Trash every active site of a group, returning the cascaded ids
    ///
    /// Sites already in the trash keep their original `deleted_at`.
    pub fn cascade_delete_sites(
        conn: &Connection,
        group_id: GroupId,
        now: DateTime<Utc>,
    ) -> Result<Vec<SiteId>> {
        let ids = Self::query_ids(
            conn,
            "SELECT id FROM sites WHERE group_id = ?1 AND is_deleted = 0 ORDER BY order_num, id",
            params![group_id],
        )?;
        conn.execute(
            "UPDATE sites SET is_deleted = 1, deleted_at = ?1, updated_at = ?1
             WHERE group_id = ?2 AND is_deleted = 0",
            params![to_millis(now), group_id],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(group_id, cascaded = ids.len(), "cascaded site deletes");
        Ok(ids)
    }

    /// Reactivate a trashed site into `group_id` at `order_num`
    pub fn mark_site_restored(
        conn: &Connection,
        site_id: SiteId,
        group_id: GroupId,
        order_num: i64,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE sites SET is_deleted = 0, deleted_at = NULL, group_id = ?1, order_num = ?2,
                                  updated_at = ?3
                 WHERE id = ?4 AND is_deleted = 1",
                params![group_id, order_num, to_millis(now), site_id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    pub fn record_site_click(conn: &Connection, site_id: SiteId, now: DateTime<Utc>) -> Result<()> {
        conn.execute(
            "UPDATE sites SET last_clicked_at = ?1 WHERE id = ?2",
            params![to_millis(now), site_id],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn delete_site_row(conn: &Connection, site_id: SiteId) -> Result<bool> {
        let changed = conn
            .execute("DELETE FROM sites WHERE id = ?1", [site_id])
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Remove every trashed site of an owner, returning their ids
    pub fn delete_trashed_sites(conn: &Connection, owner_id: &str) -> Result<Vec<SiteId>> {
        let ids = Self::query_ids(
            conn,
            "SELECT id FROM sites WHERE owner_id = ?1 AND is_deleted = 1 ORDER BY id",
            params![owner_id],
        )?;
        conn.execute(
            "DELETE FROM sites WHERE owner_id = ?1 AND is_deleted = 1",
            [owner_id],
        )
        .map_err(from_rusqlite)?;
        Ok(ids)
    }

    // ---------- helpers ----------

    fn require_group(conn: &Connection, group_id: GroupId) -> Result<Group> {
        let sql = format!("SELECT {} FROM groups WHERE id = ?1", GROUP_COLUMNS);
        conn.query_row(&sql, [group_id], group_from_row)
            .map_err(from_rusqlite)
    }

    fn require_site(conn: &Connection, site_id: SiteId) -> Result<Site> {
        let sql = format!("SELECT {} FROM sites WHERE id = ?1", SITE_COLUMNS);
        conn.query_row(&sql, [site_id], site_from_row)
            .map_err(from_rusqlite)
    }

    fn query_groups(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Group>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let groups = stmt
            .query_map(params, group_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(groups)
    }

    fn query_sites(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Site>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let sites = stmt
            .query_map(params, site_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(sites)
    }

    fn query_keys(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<OrderKey>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let keys = stmt
            .query_map(params, |row| Ok(OrderKey::new(row.get(0)?, row.get(1)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(keys)
    }

    fn query_ids(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<i64>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let ids = stmt
            .query_map(params, |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<i64>, _>>()
            .map_err(from_rusqlite)?;
        Ok(ids)
    }
}
