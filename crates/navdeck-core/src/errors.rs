use navdeck_core_types::RequestId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lifecycle::ParentState;
use crate::model::{EntityKind, GroupId, SiteId};

/// Result type alias using NavError
pub type Result<T> = std::result::Result<T, NavError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used by the JSON boundary, by
/// batch reports, and by tests. Codes never change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExErrorKind {
    // Lookup
    NotFound,

    // Parent / target group unusable
    GroupDeleted,
    OrphanedParent,

    // Ordering
    InvalidScope,
    StaleOrder,

    // Lifecycle
    NotTrashed,

    // Validation
    DuplicateName,
    InvalidInput,

    // Integration/IO
    Persistence,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::GroupDeleted => "ERR_GROUP_DELETED",
            ExErrorKind::OrphanedParent => "ERR_ORPHANED_PARENT",
            ExErrorKind::InvalidScope => "ERR_INVALID_SCOPE",
            ExErrorKind::StaleOrder => "ERR_STALE_ORDER",
            ExErrorKind::NotTrashed => "ERR_NOT_TRASHED",
            ExErrorKind::DuplicateName => "ERR_DUPLICATE_NAME",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a caller can fix the condition by re-reading state and retrying
    ///
    /// Everything except storage and internal failures is request-local.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            ExErrorKind::Persistence | ExErrorKind::Io | ExErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus context for
/// debugging. Store and engine functions return this type.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Why a requested order does not describe the current scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeViolation {
    /// The same id appears more than once
    Duplicate(i64),
    /// The id is not an active member of the scope
    NotAMember(i64),
    /// An active member is absent from the list
    Missing(i64),
}

impl std::fmt::Display for ScopeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScopeViolation::Duplicate(id) => write!(f, "id {} listed more than once", id),
            ScopeViolation::NotAMember(id) => write!(f, "id {} is not an active member", id),
            ScopeViolation::Missing(id) => write!(f, "active member {} is missing", id),
        }
    }
}

/// Typed domain errors raised by the ordering and lifecycle rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavError {
    #[error("Group not found: {group_id}")]
    GroupNotFound { group_id: GroupId },

    #[error("Site not found: {site_id}")]
    SiteNotFound { site_id: SiteId },

    /// Target or parent group is in the trash
    #[error("Group {group_id} is deleted")]
    GroupDeleted { group_id: GroupId },

    /// A trashed site's group is trashed or gone, so plain restore cannot place it
    #[error("Cannot restore site {site_id}: its group {group_id} is {parent}")]
    OrphanedParent {
        site_id: SiteId,
        group_id: GroupId,
        parent: ParentState,
    },

    #[error("Order does not match {scope}: {violation}")]
    InvalidScope {
        scope: String,
        violation: ScopeViolation,
    },

    #[error("Order of {scope} changed: expected revision {expected}, found {actual}")]
    StaleOrder {
        scope: String,
        expected: String,
        actual: String,
    },

    /// Permanent delete requested for an entity that is still active
    #[error("Cannot permanently delete active {kind} {id}: move it to the trash first")]
    NotTrashed { kind: EntityKind, id: i64 },

    #[error("A group named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NavError {
    /// The entity a lookup failure refers to, for "not found" reporting
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        match kind {
            EntityKind::Site => NavError::SiteNotFound { site_id: id },
            EntityKind::Group => NavError::GroupNotFound { group_id: id },
        }
    }
}

/// Conversion from NavError to ExError
impl From<NavError> for ExError {
    fn from(err: NavError) -> Self {
        let message = err.to_string();
        match err {
            NavError::GroupNotFound { group_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(group_id)
                .with_message(message),

            NavError::SiteNotFound { site_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(site_id)
                .with_message(message),

            NavError::GroupDeleted { group_id } => ExError::new(ExErrorKind::GroupDeleted)
                .with_entity_id(group_id)
                .with_message(message),

            NavError::OrphanedParent { site_id, .. } => ExError::new(ExErrorKind::OrphanedParent)
                .with_entity_id(site_id)
                .with_message(message),

            NavError::InvalidScope { violation, .. } => {
                let id = match violation {
                    ScopeViolation::Duplicate(id)
                    | ScopeViolation::NotAMember(id)
                    | ScopeViolation::Missing(id) => id,
                };
                ExError::new(ExErrorKind::InvalidScope)
                    .with_entity_id(id)
                    .with_message(message)
            }

            NavError::StaleOrder { .. } => {
                ExError::new(ExErrorKind::StaleOrder).with_message(message)
            }

            NavError::NotTrashed { id, .. } => ExError::new(ExErrorKind::NotTrashed)
                .with_entity_id(id)
                .with_message(message),

            NavError::DuplicateName { .. } => {
                ExError::new(ExErrorKind::DuplicateName).with_message(message)
            }

            NavError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            NavError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            NavError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to NavError
impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        NavError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::NotFound,
            ExErrorKind::GroupDeleted,
            ExErrorKind::OrphanedParent,
            ExErrorKind::InvalidScope,
            ExErrorKind::StaleOrder,
            ExErrorKind::NotTrashed,
            ExErrorKind::DuplicateName,
            ExErrorKind::InvalidInput,
            ExErrorKind::Persistence,
            ExErrorKind::Serialization,
            ExErrorKind::Io,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_orphaned_parent_message_names_parent_state() {
        let trashed = NavError::OrphanedParent {
            site_id: 4,
            group_id: 2,
            parent: ParentState::Trashed,
        };
        let gone = NavError::OrphanedParent {
            site_id: 4,
            group_id: 2,
            parent: ParentState::Gone,
        };
        assert!(trashed.to_string().ends_with("is deleted"));
        assert!(gone.to_string().ends_with("is gone"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error as _;

        let inner = ExError::new(ExErrorKind::Persistence).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);
        assert!(outer.source().is_some());
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Persistence)
        );
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(ExErrorKind::OrphanedParent.is_recoverable());
        assert!(ExErrorKind::StaleOrder.is_recoverable());
        assert!(!ExErrorKind::Persistence.is_recoverable());
    }
}
