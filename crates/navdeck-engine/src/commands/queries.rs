//! Read-only query handlers.
//!
//! Active listings come back in canonical `(order_num, id)` order with the
//! scope revision a caller can pass back to guard a later reorder.

#![allow(clippy::result_large_err)]

use navdeck_core::model::{Group, GroupId, Site, SiteId};
use navdeck_core::ordering::scope_revision;
use navdeck_core::{log_op_end, log_op_error, log_op_start};
use navdeck_store::errors::Result;
use navdeck_store::SqliteRepo;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use super::{access, elapsed_ms};

/// Active members of one scope plus its revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeListing<T> {
    pub items: Vec<T>,
    pub revision: String,
}

/// Active groups of the owner
pub fn list_groups(owner_id: &str, conn: &Connection) -> Result<ScopeListing<Group>> {
    log_op_start!("list_groups", owner_id = owner_id);
    let start = std::time::Instant::now();

    let result = SqliteRepo::list_active_groups(conn, owner_id)
        .map(|items| ScopeListing {
            revision: scope_revision(&items),
            items,
        })
        .map_err(|e| {
            log_op_error!("list_groups", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "list_groups",
        duration_ms = elapsed_ms(start),
        scope_len = result.items.len()
    );
    Ok(result)
}

/// Active sites of one of the owner's groups
///
/// ## Errors
///
/// - `NotFound`: group missing or foreign
/// - `GroupDeleted`: the group is in the trash; its sites are only in the trash listing
pub fn list_sites(owner_id: &str, group_id: GroupId, conn: &Connection) -> Result<ScopeListing<Site>> {
    log_op_start!("list_sites", owner_id = owner_id, group_id = group_id);
    let start = std::time::Instant::now();

    let result = list_sites_impl(owner_id, group_id, conn).map_err(|e| {
        log_op_error!("list_sites", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "list_sites",
        duration_ms = elapsed_ms(start),
        scope_len = result.items.len()
    );
    Ok(result)
}

fn list_sites_impl(owner_id: &str, group_id: GroupId, conn: &Connection) -> Result<ScopeListing<Site>> {
    access::active_group(conn, owner_id, group_id)?;
    let items = SqliteRepo::list_active_sites(conn, group_id)?;
    Ok(ScopeListing {
        revision: scope_revision(&items),
        items,
    })
}

/// A group by id, active or trashed
pub fn get_group(owner_id: &str, group_id: GroupId, conn: &Connection) -> Result<Group> {
    access::owned_group(conn, owner_id, group_id)
}

/// A site by id, active or trashed
pub fn get_site(owner_id: &str, site_id: SiteId, conn: &Connection) -> Result<Site> {
    access::owned_site(conn, owner_id, site_id)
}

/// Trashed sites of the owner, most recently deleted first
///
/// Includes sites whose group is trashed or gone, each with its original
/// `group_id`.
pub fn list_trash_sites(owner_id: &str, conn: &Connection) -> Result<Vec<Site>> {
    SqliteRepo::list_trashed_sites(conn, owner_id)
}

/// Trashed groups of the owner, most recently deleted first
pub fn list_trash_groups(owner_id: &str, conn: &Connection) -> Result<Vec<Group>> {
    SqliteRepo::list_trashed_groups(conn, owner_id)
}
