//! Lifecycle engine command handlers.
//!
//! Creation, soft delete with cascade, restore (in place or with
//! reassignment), permanent removal, and trash purge. Every write path
//! commits in one IMMEDIATE transaction.

#![allow(clippy::result_large_err)]

use chrono::Utc;
use navdeck_core::errors::NavError;
use navdeck_core::lifecycle::{
    plan_delete, plan_group_restore, plan_permanent_delete, plan_site_restore,
    plan_site_restore_to, LifecycleOutcome, SiteRestorePlan,
};
use navdeck_core::model::{EntityKind, Group, GroupId, NewSite, Site, SiteId};
use navdeck_core::ordering::next_order_num;
use navdeck_core::rules::{validate_group_name, validate_site};
use navdeck_core::{log_op_end, log_op_error, log_op_start};
use navdeck_store::db::immediate;
use navdeck_store::errors::{from_rusqlite, Result};
use navdeck_store::SqliteRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::{access, elapsed_ms};

/// Outcome of deleting a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDeletion {
    pub outcome: LifecycleOutcome,
    /// Sites that were active and went to the trash with the group
    pub cascaded_site_ids: Vec<SiteId>,
}

/// An entity after a restore request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restored<T> {
    pub entity: T,
    pub outcome: LifecycleOutcome,
}

/// Ids removed by emptying an owner's trash
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashPurge {
    pub sites: Vec<SiteId>,
    pub groups: Vec<GroupId>,
}

// ---------- creation ----------

/// Create a group at the end of the owner's order
///
/// ## Errors
///
/// - `InvalidInput`: name is blank
/// - `DuplicateName`: an active group already uses the name (case-insensitive)
pub fn create_group(
    owner_id: &str,
    name: &str,
    is_public: bool,
    conn: &mut Connection,
) -> Result<Group> {
    log_op_start!("create_group", owner_id = owner_id);
    let start = std::time::Instant::now();

    let result = create_group_impl(owner_id, name, is_public, conn).map_err(|e| {
        log_op_error!("create_group", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "create_group",
        duration_ms = elapsed_ms(start),
        group_id = result.id
    );
    Ok(result)
}

fn create_group_impl(
    owner_id: &str,
    name: &str,
    is_public: bool,
    conn: &mut Connection,
) -> Result<Group> {
    let name = validate_group_name(name)?;
    let tx = immediate(conn)?;

    if access::group_name_taken(&tx, owner_id, &name, None)? {
        return Err(NavError::DuplicateName { name }.into());
    }

    let order_num = next_order_num(&SqliteRepo::active_group_keys(&tx, owner_id)?);
    let group = SqliteRepo::insert_group(&tx, owner_id, &name, is_public, order_num, Utc::now())?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(group)
}

/// Create a site at the end of an active group
///
/// ## Errors
///
/// - `InvalidInput`: name or url is blank
/// - `NotFound` / `GroupDeleted`: the group cannot take members
pub fn create_site(
    owner_id: &str,
    group_id: GroupId,
    site: NewSite,
    conn: &mut Connection,
) -> Result<Site> {
    log_op_start!("create_site", owner_id = owner_id, group_id = group_id);
    let start = std::time::Instant::now();

    let result = create_site_impl(owner_id, group_id, site, conn).map_err(|e| {
        log_op_error!("create_site", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "create_site",
        duration_ms = elapsed_ms(start),
        site_id = result.id
    );
    Ok(result)
}

fn create_site_impl(
    owner_id: &str,
    group_id: GroupId,
    site: NewSite,
    conn: &mut Connection,
) -> Result<Site> {
    let site = validate_site(site)?;
    let tx = immediate(conn)?;
    access::active_group(&tx, owner_id, group_id)?;

    let order_num = next_order_num(&SqliteRepo::active_site_keys(&tx, group_id)?);
    let created = SqliteRepo::insert_site(&tx, owner_id, group_id, &site, order_num, Utc::now())?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(created)
}

/// Stamp `last_clicked_at` on an active site
pub fn record_site_click(owner_id: &str, site_id: SiteId, conn: &mut Connection) -> Result<Site> {
    log_op_start!("record_site_click", owner_id = owner_id, site_id = site_id);
    let start = std::time::Instant::now();

    let result = record_site_click_impl(owner_id, site_id, conn).map_err(|e| {
        log_op_error!("record_site_click", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!("record_site_click", duration_ms = elapsed_ms(start));
    Ok(result)
}

fn record_site_click_impl(owner_id: &str, site_id: SiteId, conn: &mut Connection) -> Result<Site> {
    let tx = immediate(conn)?;
    access::active_site(&tx, owner_id, site_id)?;
    SqliteRepo::record_site_click(&tx, site_id, Utc::now())?;
    let site = access::owned_site(&tx, owner_id, site_id)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(site)
}

// ---------- delete ----------

/// Move a site to the trash
///
/// Deleting a trashed site is a no-op reported as `AlreadyDeleted`.
pub fn delete_site(
    owner_id: &str,
    site_id: SiteId,
    conn: &mut Connection,
) -> Result<LifecycleOutcome> {
    log_op_start!("delete_site", owner_id = owner_id, site_id = site_id);
    let start = std::time::Instant::now();

    let result = delete_site_impl(owner_id, site_id, conn).map_err(|e| {
        log_op_error!("delete_site", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "delete_site",
        duration_ms = elapsed_ms(start),
        outcome = ?result
    );
    Ok(result)
}

pub(crate) fn delete_site_impl(
    owner_id: &str,
    site_id: SiteId,
    conn: &mut Connection,
) -> Result<LifecycleOutcome> {
    let tx = immediate(conn)?;
    let site = access::owned_site(&tx, owner_id, site_id)?;

    let outcome = plan_delete(site.state());
    if outcome.is_applied() {
        SqliteRepo::mark_site_deleted(&tx, site_id, Utc::now())?;
    }
    tx.commit().map_err(from_rusqlite)?;
    Ok(outcome)
}

/// Move a group and all of its active sites to the trash
///
/// Cascaded sites keep their `group_id` and `order_num`. Sites that were
/// already trashed are left alone.
pub fn delete_group(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<GroupDeletion> {
    log_op_start!("delete_group", owner_id = owner_id, group_id = group_id);
    let start = std::time::Instant::now();

    let result = delete_group_impl(owner_id, group_id, conn).map_err(|e| {
        log_op_error!("delete_group", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "delete_group",
        duration_ms = elapsed_ms(start),
        cascade_len = result.cascaded_site_ids.len()
    );
    Ok(result)
}

pub(crate) fn delete_group_impl(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<GroupDeletion> {
    let tx = immediate(conn)?;
    let group = access::owned_group(&tx, owner_id, group_id)?;

    let outcome = plan_delete(group.state());
    let mut cascaded_site_ids = Vec::new();
    if outcome.is_applied() {
        let now = Utc::now();
        SqliteRepo::mark_group_deleted(&tx, group_id, now)?;
        cascaded_site_ids = SqliteRepo::cascade_delete_sites(&tx, group_id, now)?;
    }
    tx.commit().map_err(from_rusqlite)?;

    Ok(GroupDeletion {
        outcome,
        cascaded_site_ids,
    })
}

// ---------- restore ----------

/// Restore a trashed site into the group it was deleted from
///
/// The site is appended after the group's current last site.
///
/// ## Errors
///
/// - `NotFound`: site missing or foreign
/// - `OrphanedParent`: its group is trashed or gone; use `restore_site_to`
pub fn restore_site(
    owner_id: &str,
    site_id: SiteId,
    conn: &mut Connection,
) -> Result<Restored<Site>> {
    log_op_start!("restore_site", owner_id = owner_id, site_id = site_id);
    let start = std::time::Instant::now();

    let result = restore_site_impl(owner_id, site_id, conn).map_err(|e| {
        log_op_error!("restore_site", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "restore_site",
        duration_ms = elapsed_ms(start),
        outcome = ?result.outcome
    );
    Ok(result)
}

pub(crate) fn restore_site_impl(
    owner_id: &str,
    site_id: SiteId,
    conn: &mut Connection,
) -> Result<Restored<Site>> {
    let tx = immediate(conn)?;
    let site = access::owned_site(&tx, owner_id, site_id)?;
    let parent = access::parent_state(&tx, &site)?;

    let plan = plan_site_restore(&site, parent)?;
    let restored = apply_site_restore(&tx, site, plan)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(restored)
}

/// Restore a trashed site into a caller-chosen active group
///
/// Resolves the orphaned-parent case. An active site is returned
/// unchanged with `AlreadyActive`; it is not moved.
///
/// ## Errors
///
/// - `NotFound`: site or group missing or foreign
/// - `GroupDeleted`: the chosen group is in the trash
pub fn restore_site_to(
    owner_id: &str,
    site_id: SiteId,
    new_group_id: GroupId,
    conn: &mut Connection,
) -> Result<Restored<Site>> {
    log_op_start!(
        "restore_site_to",
        owner_id = owner_id,
        site_id = site_id,
        group_id = new_group_id
    );
    let start = std::time::Instant::now();

    let result = restore_site_to_impl(owner_id, site_id, new_group_id, conn).map_err(|e| {
        log_op_error!("restore_site_to", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "restore_site_to",
        duration_ms = elapsed_ms(start),
        outcome = ?result.outcome
    );
    Ok(result)
}

pub(crate) fn restore_site_to_impl(
    owner_id: &str,
    site_id: SiteId,
    new_group_id: GroupId,
    conn: &mut Connection,
) -> Result<Restored<Site>> {
    let tx = immediate(conn)?;
    let site = access::owned_site(&tx, owner_id, site_id)?;
    let target = access::find_owned_group(&tx, owner_id, new_group_id)?;

    let plan = plan_site_restore_to(&site, new_group_id, target.as_ref())?;
    let restored = apply_site_restore(&tx, site, plan)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(restored)
}

fn apply_site_restore(conn: &Connection, site: Site, plan: SiteRestorePlan) -> Result<Restored<Site>> {
    match plan {
        SiteRestorePlan::AlreadyActive => Ok(Restored {
            entity: site,
            outcome: LifecycleOutcome::AlreadyActive,
        }),
        SiteRestorePlan::Into(group_id) => {
            let order_num = next_order_num(&SqliteRepo::active_site_keys(conn, group_id)?);
            SqliteRepo::mark_site_restored(conn, site.id, group_id, order_num, Utc::now())?;
            let entity = access::owned_site(conn, &site.owner_id, site.id)?;
            Ok(Restored {
                entity,
                outcome: LifecycleOutcome::Applied,
            })
        }
    }
}

/// Restore a trashed group to the end of the owner's order
///
/// Its cascaded sites stay in the trash.
///
/// ## Errors
///
/// - `NotFound`: group missing or foreign
/// - `DuplicateName`: an active group has taken the name meanwhile
pub fn restore_group(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<Restored<Group>> {
    log_op_start!("restore_group", owner_id = owner_id, group_id = group_id);
    let start = std::time::Instant::now();

    let result = restore_group_impl(owner_id, group_id, conn).map_err(|e| {
        log_op_error!("restore_group", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "restore_group",
        duration_ms = elapsed_ms(start),
        outcome = ?result.outcome
    );
    Ok(result)
}

pub(crate) fn restore_group_impl(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<Restored<Group>> {
    let tx = immediate(conn)?;
    let group = access::owned_group(&tx, owner_id, group_id)?;
    let name_taken = !group.is_active()
        && access::group_name_taken(&tx, owner_id, &group.name, Some(group_id))?;

    let outcome = plan_group_restore(&group, name_taken)?;
    let entity = if outcome.is_applied() {
        let order_num = next_order_num(&SqliteRepo::active_group_keys(&tx, owner_id)?);
        SqliteRepo::mark_group_restored(&tx, group_id, order_num, Utc::now())?;
        access::owned_group(&tx, owner_id, group_id)?
    } else {
        group
    };
    tx.commit().map_err(from_rusqlite)?;

    Ok(Restored { entity, outcome })
}

// ---------- permanent delete ----------

/// Remove a trashed site for good
///
/// ## Errors
///
/// - `NotFound`: site missing or foreign
/// - `NotTrashed`: the site is still active
pub fn permanently_delete_site(owner_id: &str, site_id: SiteId, conn: &mut Connection) -> Result<()> {
    log_op_start!("permanently_delete_site", owner_id = owner_id, site_id = site_id);
    let start = std::time::Instant::now();

    permanently_delete_site_impl(owner_id, site_id, conn).map_err(|e| {
        log_op_error!(
            "permanently_delete_site",
            e.clone(),
            duration_ms = elapsed_ms(start)
        );
        e
    })?;

    log_op_end!("permanently_delete_site", duration_ms = elapsed_ms(start));
    Ok(())
}

pub(crate) fn permanently_delete_site_impl(
    owner_id: &str,
    site_id: SiteId,
    conn: &mut Connection,
) -> Result<()> {
    let tx = immediate(conn)?;
    let site = access::owned_site(&tx, owner_id, site_id)?;
    plan_permanent_delete(EntityKind::Site, site_id, site.state())?;
    SqliteRepo::delete_site_row(&tx, site_id)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(())
}

/// Remove a trashed group for good
///
/// Its trashed sites stay behind and can only come back through
/// `restore_site_to`.
///
/// ## Errors
///
/// - `NotFound`: group missing or foreign
/// - `NotTrashed`: the group is still active
pub fn permanently_delete_group(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<()> {
    log_op_start!("permanently_delete_group", owner_id = owner_id, group_id = group_id);
    let start = std::time::Instant::now();

    permanently_delete_group_impl(owner_id, group_id, conn).map_err(|e| {
        log_op_error!(
            "permanently_delete_group",
            e.clone(),
            duration_ms = elapsed_ms(start)
        );
        e
    })?;

    log_op_end!("permanently_delete_group", duration_ms = elapsed_ms(start));
    Ok(())
}

pub(crate) fn permanently_delete_group_impl(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<()> {
    let tx = immediate(conn)?;
    let group = access::owned_group(&tx, owner_id, group_id)?;
    plan_permanent_delete(EntityKind::Group, group_id, group.state())?;
    SqliteRepo::delete_group_row(&tx, group_id)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(())
}

/// Permanently delete everything in an owner's trash
pub fn empty_trash(owner_id: &str, conn: &mut Connection) -> Result<TrashPurge> {
    log_op_start!("empty_trash", owner_id = owner_id);
    let start = std::time::Instant::now();

    let result = empty_trash_impl(owner_id, conn).map_err(|e| {
        log_op_error!("empty_trash", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "empty_trash",
        duration_ms = elapsed_ms(start),
        sites = result.sites.len(),
        groups = result.groups.len()
    );
    Ok(result)
}

fn empty_trash_impl(owner_id: &str, conn: &mut Connection) -> Result<TrashPurge> {
    let tx = immediate(conn)?;
    let sites = SqliteRepo::delete_trashed_sites(&tx, owner_id)?;
    let groups = SqliteRepo::delete_trashed_groups(&tx, owner_id)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(TrashPurge { sites, groups })
}
