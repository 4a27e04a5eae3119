use super::{LifecycleOutcome, ParentState};
use crate::errors::{NavError, Result};
use crate::model::{Group, GroupId, Site};

/// Where a restored site goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteRestorePlan {
    /// The site is active already; leave it where it is
    AlreadyActive,
    /// Reactivate the site and append it to this group
    Into(GroupId),
}

/// Plain restore: back into the group the site was deleted from
///
/// # Errors
/// `OrphanedParent` when that group is trashed or gone. The caller
/// resolves it by restoring the group first, or by restoring into a
/// different group.
pub fn plan_site_restore(site: &Site, parent: ParentState) -> Result<SiteRestorePlan> {
    if site.is_active() {
        return Ok(SiteRestorePlan::AlreadyActive);
    }
    match parent {
        ParentState::Active => Ok(SiteRestorePlan::Into(site.group_id)),
        ParentState::Trashed | ParentState::Gone => Err(NavError::OrphanedParent {
            site_id: site.id,
            group_id: site.group_id,
            parent,
        }),
    }
}

/// Restore with reassignment into a caller-chosen group
///
/// An already-active site is never moved by this path; moving active
/// sites is the ordering engine's job.
///
/// # Errors
/// `GroupNotFound` when `target` is missing, `GroupDeleted` when it is in
/// the trash.
pub fn plan_site_restore_to(
    site: &Site,
    target_id: GroupId,
    target: Option<&Group>,
) -> Result<SiteRestorePlan> {
    let target = target.ok_or(NavError::GroupNotFound {
        group_id: target_id,
    })?;
    if !target.is_active() {
        return Err(NavError::GroupDeleted {
            group_id: target.id,
        });
    }
    if site.is_active() {
        return Ok(SiteRestorePlan::AlreadyActive);
    }
    Ok(SiteRestorePlan::Into(target.id))
}

/// Group restore
///
/// Sites that were cascaded into the trash with the group stay there.
///
/// # Errors
/// `DuplicateName` when an active group of the same owner already uses
/// the name.
pub fn plan_group_restore(group: &Group, name_taken: bool) -> Result<LifecycleOutcome> {
    if group.is_active() {
        return Ok(LifecycleOutcome::AlreadyActive);
    }
    if name_taken {
        return Err(NavError::DuplicateName {
            name: group.name.clone(),
        });
    }
    Ok(LifecycleOutcome::Applied)
}
