//! Ordering engine command handlers.
//!
//! Declarative reorder of a whole scope, single-site moves across groups,
//! and scope compaction. Each handler reads the scope, validates, and
//! writes inside one IMMEDIATE transaction.

#![allow(clippy::result_large_err)]

use chrono::Utc;
use navdeck_core::model::{GroupId, Site, SiteId};
use navdeck_core::ordering::{
    changed_assignments, check_revision, ordered_ids, place, scope_revision,
    validate_permutation, Scope,
};
use navdeck_core::{log_op_end, log_op_error, log_op_start};
use navdeck_store::db::immediate;
use navdeck_store::errors::{from_rusqlite, Result};
use navdeck_store::SqliteRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::{access, elapsed_ms};

/// Result of rewriting a scope's order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderOutcome {
    /// Rows whose `order_num` actually changed
    pub updated: usize,
    /// Revision of the scope after the write
    pub revision: String,
}

/// Apply a full target order to a group's active sites
///
/// ## Errors
///
/// - `NotFound`: group missing or owned by someone else
/// - `GroupDeleted`: group is in the trash
/// - `StaleOrder`: `expected_revision` no longer matches
/// - `InvalidScope`: list is not a permutation of the active sites
pub fn reorder_sites(
    owner_id: &str,
    group_id: GroupId,
    ordered_site_ids: &[SiteId],
    expected_revision: Option<&str>,
    conn: &mut Connection,
) -> Result<ReorderOutcome> {
    log_op_start!(
        "reorder_sites",
        owner_id = owner_id,
        group_id = group_id,
        scope_len = ordered_site_ids.len()
    );
    let start = std::time::Instant::now();

    let result = reorder_sites_impl(owner_id, group_id, ordered_site_ids, expected_revision, conn)
        .map_err(|e| {
            log_op_error!("reorder_sites", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "reorder_sites",
        duration_ms = elapsed_ms(start),
        updated = result.updated
    );
    Ok(result)
}

fn reorder_sites_impl(
    owner_id: &str,
    group_id: GroupId,
    ordered_site_ids: &[SiteId],
    expected_revision: Option<&str>,
    conn: &mut Connection,
) -> Result<ReorderOutcome> {
    let tx = immediate(conn)?;
    access::active_group(&tx, owner_id, group_id)?;

    let scope = Scope::GroupSites { group_id };
    let members = SqliteRepo::active_site_keys(&tx, group_id)?;
    check_revision(&scope, expected_revision, &scope_revision(&members))?;
    validate_permutation(&scope, &ordered_ids(&members), ordered_site_ids)?;

    let now = Utc::now();
    let changes = changed_assignments(&members, ordered_site_ids);
    for &(site_id, order_num) in &changes {
        SqliteRepo::set_site_order(&tx, site_id, order_num, now)?;
    }

    let revision = scope_revision(&SqliteRepo::active_site_keys(&tx, group_id)?);
    tx.commit().map_err(from_rusqlite)?;

    Ok(ReorderOutcome {
        updated: changes.len(),
        revision,
    })
}

/// Apply a full target order to an owner's active groups
///
/// ## Errors
///
/// - `StaleOrder`: `expected_revision` no longer matches
/// - `InvalidScope`: list is not a permutation of the active groups
pub fn reorder_groups(
    owner_id: &str,
    ordered_group_ids: &[GroupId],
    expected_revision: Option<&str>,
    conn: &mut Connection,
) -> Result<ReorderOutcome> {
    log_op_start!(
        "reorder_groups",
        owner_id = owner_id,
        scope_len = ordered_group_ids.len()
    );
    let start = std::time::Instant::now();

    let result = reorder_groups_impl(owner_id, ordered_group_ids, expected_revision, conn)
        .map_err(|e| {
            log_op_error!("reorder_groups", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "reorder_groups",
        duration_ms = elapsed_ms(start),
        updated = result.updated
    );
    Ok(result)
}

fn reorder_groups_impl(
    owner_id: &str,
    ordered_group_ids: &[GroupId],
    expected_revision: Option<&str>,
    conn: &mut Connection,
) -> Result<ReorderOutcome> {
    let tx = immediate(conn)?;

    let scope = Scope::OwnerGroups {
        owner_id: owner_id.to_string(),
    };
    let members = SqliteRepo::active_group_keys(&tx, owner_id)?;
    check_revision(&scope, expected_revision, &scope_revision(&members))?;
    validate_permutation(&scope, &ordered_ids(&members), ordered_group_ids)?;

    let now = Utc::now();
    let changes = changed_assignments(&members, ordered_group_ids);
    for &(group_id, order_num) in &changes {
        SqliteRepo::set_group_order(&tx, group_id, order_num, now)?;
    }

    let revision = scope_revision(&SqliteRepo::active_group_keys(&tx, owner_id)?);
    tx.commit().map_err(from_rusqlite)?;

    Ok(ReorderOutcome {
        updated: changes.len(),
        revision,
    })
}

/// Move one active site to `target_index` within `target_group_id`
///
/// The target group is renumbered densely with the site in place. The
/// source group keeps its remaining `order_num` values, gap included;
/// relative order there is unchanged. An index past the end appends.
///
/// ## Errors
///
/// - `NotFound`: site missing, trashed, or foreign; target group missing or foreign
/// - `GroupDeleted`: target group is in the trash
/// - `StaleOrder`: `expected_revision` does not match the target group
pub fn move_site(
    owner_id: &str,
    site_id: SiteId,
    target_group_id: GroupId,
    target_index: usize,
    expected_revision: Option<&str>,
    conn: &mut Connection,
) -> Result<Site> {
    log_op_start!(
        "move_site",
        owner_id = owner_id,
        site_id = site_id,
        group_id = target_group_id,
        target_index = target_index
    );
    let start = std::time::Instant::now();

    let result = move_site_impl(
        owner_id,
        site_id,
        target_group_id,
        target_index,
        expected_revision,
        conn,
    )
    .map_err(|e| {
        log_op_error!("move_site", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "move_site",
        duration_ms = elapsed_ms(start),
        order_num = result.order_num
    );
    Ok(result)
}

fn move_site_impl(
    owner_id: &str,
    site_id: SiteId,
    target_group_id: GroupId,
    target_index: usize,
    expected_revision: Option<&str>,
    conn: &mut Connection,
) -> Result<Site> {
    let tx = immediate(conn)?;
    access::active_site(&tx, owner_id, site_id)?;
    access::active_group(&tx, owner_id, target_group_id)?;

    let scope = Scope::GroupSites {
        group_id: target_group_id,
    };
    let members = SqliteRepo::active_site_keys(&tx, target_group_id)?;
    check_revision(&scope, expected_revision, &scope_revision(&members))?;

    let target_order = place(&ordered_ids(&members), site_id, target_index);
    let now = Utc::now();
    for (id, order_num) in changed_assignments(&members, &target_order) {
        if id == site_id {
            SqliteRepo::set_site_placement(&tx, id, target_group_id, order_num, now)?;
        } else {
            SqliteRepo::set_site_order(&tx, id, order_num, now)?;
        }
    }

    let site = access::owned_site(&tx, owner_id, site_id)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(site)
}

/// Renumber a group's active sites to `0..N-1`, keeping their order
pub fn compact_sites(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<ReorderOutcome> {
    log_op_start!("compact_sites", owner_id = owner_id, group_id = group_id);
    let start = std::time::Instant::now();

    let result = compact_sites_impl(owner_id, group_id, conn).map_err(|e| {
        log_op_error!("compact_sites", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "compact_sites",
        duration_ms = elapsed_ms(start),
        updated = result.updated
    );
    Ok(result)
}

fn compact_sites_impl(
    owner_id: &str,
    group_id: GroupId,
    conn: &mut Connection,
) -> Result<ReorderOutcome> {
    let tx = immediate(conn)?;
    access::active_group(&tx, owner_id, group_id)?;

    let members = SqliteRepo::active_site_keys(&tx, group_id)?;
    let ids = ordered_ids(&members);
    let now = Utc::now();
    let changes = changed_assignments(&members, &ids);
    for &(site_id, order_num) in &changes {
        SqliteRepo::set_site_order(&tx, site_id, order_num, now)?;
    }

    let revision = scope_revision(&SqliteRepo::active_site_keys(&tx, group_id)?);
    tx.commit().map_err(from_rusqlite)?;

    Ok(ReorderOutcome {
        updated: changes.len(),
        revision,
    })
}

/// Renumber an owner's active groups to `0..N-1`, keeping their order
pub fn compact_groups(owner_id: &str, conn: &mut Connection) -> Result<ReorderOutcome> {
    log_op_start!("compact_groups", owner_id = owner_id);
    let start = std::time::Instant::now();

    let result = compact_groups_impl(owner_id, conn).map_err(|e| {
        log_op_error!("compact_groups", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "compact_groups",
        duration_ms = elapsed_ms(start),
        updated = result.updated
    );
    Ok(result)
}

fn compact_groups_impl(owner_id: &str, conn: &mut Connection) -> Result<ReorderOutcome> {
    let tx = immediate(conn)?;

    let members = SqliteRepo::active_group_keys(&tx, owner_id)?;
    let ids = ordered_ids(&members);
    let now = Utc::now();
    let changes = changed_assignments(&members, &ids);
    for &(group_id, order_num) in &changes {
        SqliteRepo::set_group_order(&tx, group_id, order_num, now)?;
    }

    let revision = scope_revision(&SqliteRepo::active_group_keys(&tx, owner_id)?);
    tx.commit().map_err(from_rusqlite)?;

    Ok(ReorderOutcome {
        updated: changes.len(),
        revision,
    })
}
