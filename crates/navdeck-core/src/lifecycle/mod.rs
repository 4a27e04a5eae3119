//! Lifecycle rules: trash, restore, and permanent removal
//!
//! Every entity is either active or in the trash. Nothing here touches
//! storage: the planners inspect the current state and say what the store
//! should do, or why it must refuse.

pub mod restore;

pub use restore::{plan_group_restore, plan_site_restore, plan_site_restore_to, SiteRestorePlan};

use serde::{Deserialize, Serialize};

use crate::errors::{NavError, Result};
use crate::model::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Active,
    Trashed,
}

impl LifecycleState {
    pub fn of(is_deleted: bool) -> Self {
        if is_deleted {
            LifecycleState::Trashed
        } else {
            LifecycleState::Active
        }
    }
}

/// What a lifecycle request did
///
/// Repeating a delete or restore is not an error; the second call reports
/// that nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleOutcome {
    Applied,
    AlreadyDeleted,
    AlreadyActive,
}

impl LifecycleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LifecycleOutcome::Applied)
    }
}

/// State of the group a trashed site points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentState {
    Active,
    Trashed,
    /// Permanently deleted, or never existed
    Gone,
}

impl std::fmt::Display for ParentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParentState::Active => "active",
            ParentState::Trashed => "deleted",
            ParentState::Gone => "gone",
        };
        f.write_str(s)
    }
}

/// Decide whether a delete has anything to do
pub fn plan_delete(state: LifecycleState) -> LifecycleOutcome {
    match state {
        LifecycleState::Active => LifecycleOutcome::Applied,
        LifecycleState::Trashed => LifecycleOutcome::AlreadyDeleted,
    }
}

/// Permanent removal is only allowed from the trash
///
/// # Errors
/// `NotTrashed` when the entity is still active.
pub fn plan_permanent_delete(kind: EntityKind, id: i64, state: LifecycleState) -> Result<()> {
    match state {
        LifecycleState::Trashed => Ok(()),
        LifecycleState::Active => Err(NavError::NotTrashed { kind, id }),
    }
}
