pub mod group;
pub mod site;

pub use group::Group;
pub use site::{NewSite, Site};

use serde::{Deserialize, Serialize};

/// Row id of a group. Assigned by the store, never reused.
pub type GroupId = i64;

/// Row id of a site. Assigned by the store, never reused.
pub type SiteId = i64;

/// The two entity types the engine manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "sites")]
    Site,
    #[serde(rename = "groups")]
    Group,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Site => "site",
            EntityKind::Group => "group",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_wire_names() {
        assert_eq!(serde_json::to_string(&EntityKind::Site).unwrap(), "\"sites\"");
        let kind: EntityKind = serde_json::from_str("\"groups\"").unwrap();
        assert_eq!(kind, EntityKind::Group);
    }

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::Site.to_string(), "site");
        assert_eq!(EntityKind::Group.to_string(), "group");
    }
}
