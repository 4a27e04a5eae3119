use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GroupId, SiteId};
use crate::lifecycle::LifecycleState;
use crate::ordering::Ordered;

/// Site - a bookmarked link inside a group
///
/// `group_id` may reference a trashed group or one that no longer exists.
/// That is a normal state for trashed sites, not corruption: restore has to
/// resolve it (see `lifecycle::plan_site_restore`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: SiteId,

    /// Recorded on the row so ownership survives the loss of the group
    pub owner_id: String,

    pub group_id: GroupId,

    pub name: String,
    pub url: String,
    pub icon: String,
    pub description: String,
    pub notes: String,

    /// Position among active sites sharing `group_id`
    pub order_num: i64,

    pub is_public: bool,
    pub is_featured: bool,

    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_clicked_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// An active site at `order_num` with empty optional fields
    pub fn new(
        id: SiteId,
        owner_id: impl Into<String>,
        group_id: GroupId,
        name: impl Into<String>,
        url: impl Into<String>,
        order_num: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id: owner_id.into(),
            group_id,
            name: name.into(),
            url: url.into(),
            icon: String::new(),
            description: String::new(),
            notes: String::new(),
            order_num,
            is_public: true,
            is_featured: false,
            is_deleted: false,
            deleted_at: None,
            last_clicked_at: None,
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
}

impl Ordered for Site {
    fn entity_id(&self) -> i64 {
        self.id
    }

    fn order_num(&self) -> i64 {
        self.order_num
    }
}

/// Caller-supplied fields for a new site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewSite {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub description: String,
    pub notes: String,
    pub is_public: bool,
    pub is_featured: bool,
}

impl Default for NewSite {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            icon: String::new(),
            description: String::new(),
            notes: String::new(),
            is_public: true,
            is_featured: false,
        }
    }
}

impl NewSite {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Trim the fields that identify the link
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.url = self.url.trim().to_string();
        self.icon = self.icon.trim().to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_site_defaults_public() {
        let new_site: NewSite = serde_json::from_str(r#"{"name":"Docs","url":"https://docs.rs"}"#).unwrap();
        assert!(new_site.is_public);
        assert!(!new_site.is_featured);
        assert!(new_site.icon.is_empty());
    }

    #[test]
    fn test_normalized_trims_link_fields() {
        let site = NewSite::new("  Docs ", " https://docs.rs ").normalized();
        assert_eq!(site.name, "Docs");
        assert_eq!(site.url, "https://docs.rs");
    }
}
