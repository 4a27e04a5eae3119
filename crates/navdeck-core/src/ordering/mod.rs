//! Scoped ordering rules
//!
//! A scope is the set of active members an order applies to: the sites of
//! one group, or the groups of one owner. Order within a scope is
//! `(order_num, id)` ascending, so two members sharing an `order_num` still
//! come back in the same sequence on every read.

pub mod permutation;
pub mod placement;
pub mod revision;

pub use permutation::validate_permutation;
pub use placement::{changed_assignments, dense_assignments, next_order_num, place};
pub use revision::{check_revision, scope_revision};

use serde::{Deserialize, Serialize};

use crate::model::GroupId;

/// Anything that occupies a position in a scope
pub trait Ordered {
    fn entity_id(&self) -> i64;
    fn order_num(&self) -> i64;

    /// Total order key: position first, id breaks ties
    fn order_key(&self) -> (i64, i64) {
        (self.order_num(), self.entity_id())
    }
}

/// Minimal projection of a scope member: enough to order it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderKey {
    pub id: i64,
    pub order_num: i64,
}

impl OrderKey {
    pub fn new(id: i64, order_num: i64) -> Self {
        Self { id, order_num }
    }
}

impl Ordered for OrderKey {
    fn entity_id(&self) -> i64 {
        self.id
    }

    fn order_num(&self) -> i64 {
        self.order_num
    }
}

/// The collection an ordering invariant applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// All active groups of one owner
    OwnerGroups { owner_id: String },
    /// All active sites of one group
    GroupSites { group_id: GroupId },
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::OwnerGroups { owner_id } => write!(f, "groups of owner {}", owner_id),
            Scope::GroupSites { group_id } => write!(f, "sites of group {}", group_id),
        }
    }
}

/// Sort scope members into canonical order
pub fn sort_in_scope<T: Ordered>(members: &mut [T]) {
    members.sort_by_key(|m| m.order_key());
}

/// Ids of scope members in canonical order
pub fn ordered_ids<T: Ordered>(members: &[T]) -> Vec<i64> {
    let mut keys: Vec<(i64, i64)> = members.iter().map(|m| m.order_key()).collect();
    keys.sort_unstable();
    keys.into_iter().map(|(_, id)| id).collect()
}
