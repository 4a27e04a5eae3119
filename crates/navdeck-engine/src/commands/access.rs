//! Owner-gated loads shared by the command handlers

#![allow(clippy::result_large_err)]

use navdeck_core::errors::NavError;
use navdeck_core::lifecycle::ParentState;
use navdeck_core::model::{Group, GroupId, Site, SiteId};
use navdeck_store::errors::Result;
use navdeck_store::SqliteRepo;
use rusqlite::Connection;

/// A group of this owner in any lifecycle state
pub(crate) fn owned_group(conn: &Connection, owner_id: &str, group_id: GroupId) -> Result<Group> {
    SqliteRepo::get_group(conn, group_id)?
        .filter(|g| g.owner_id == owner_id)
        .ok_or_else(|| NavError::GroupNotFound { group_id }.into())
}

/// A group of this owner that can take members
pub(crate) fn active_group(conn: &Connection, owner_id: &str, group_id: GroupId) -> Result<Group> {
    let group = owned_group(conn, owner_id, group_id)?;
    if !group.is_active() {
        return Err(NavError::GroupDeleted { group_id }.into());
    }
    Ok(group)
}

/// The group if present and owned, otherwise None
pub(crate) fn find_owned_group(
    conn: &Connection,
    owner_id: &str,
    group_id: GroupId,
) -> Result<Option<Group>> {
    Ok(SqliteRepo::get_group(conn, group_id)?.filter(|g| g.owner_id == owner_id))
}

/// A site of this owner in any lifecycle state
pub(crate) fn owned_site(conn: &Connection, owner_id: &str, site_id: SiteId) -> Result<Site> {
    SqliteRepo::get_site(conn, site_id)?
        .filter(|s| s.owner_id == owner_id)
        .ok_or_else(|| NavError::SiteNotFound { site_id }.into())
}

/// An active site of this owner
pub(crate) fn active_site(conn: &Connection, owner_id: &str, site_id: SiteId) -> Result<Site> {
    let site = owned_site(conn, owner_id, site_id)?;
    if !site.is_active() {
        return Err(NavError::SiteNotFound { site_id }.into());
    }
    Ok(site)
}

/// State of the group a site references
///
/// A group owned by someone else is as good as gone for this owner.
pub(crate) fn parent_state(conn: &Connection, site: &Site) -> Result<ParentState> {
    let state = match find_owned_group(conn, &site.owner_id, site.group_id)? {
        None => ParentState::Gone,
        Some(g) if g.is_active() => ParentState::Active,
        Some(_) => ParentState::Trashed,
    };
    Ok(state)
}

/// Whether an active group of the owner, other than `except`, uses `name`
pub(crate) fn group_name_taken(
    conn: &Connection,
    owner_id: &str,
    name: &str,
    except: Option<GroupId>,
) -> Result<bool> {
    let taken = SqliteRepo::list_active_groups(conn, owner_id)?
        .iter()
        .any(|g| Some(g.id) != except && g.name_matches(name));
    Ok(taken)
}
