use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GroupId;
use crate::lifecycle::LifecycleState;
use crate::ordering::Ordered;

/// Group - a named, orderable container of sites
///
/// Groups are ordered within their owner's workspace by `order_num`, ties
/// broken by `id`. A trashed group keeps its row (and its id) until it is
/// permanently deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,

    /// Ownership scope for ordering and name uniqueness
    pub owner_id: String,

    pub name: String,

    /// Position among the owner's active groups
    pub order_num: i64,

    pub is_public: bool,

    /// Soft-delete flag
    pub is_deleted: bool,

    pub deleted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create an active group with current timestamps
    pub fn new(
        id: GroupId,
        owner_id: impl Into<String>,
        name: impl Into<String>,
        order_num: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id: owner_id.into(),
            name: name.into(),
            order_num,
            is_public: true,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::of(self.is_deleted)
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Case-insensitive name comparison used for per-owner uniqueness
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.trim().to_lowercase() == other.trim().to_lowercase()
    }
}

impl Ordered for Group {
    fn entity_id(&self) -> i64 {
        self.id
    }

    fn order_num(&self) -> i64 {
        self.order_num
    }
}
