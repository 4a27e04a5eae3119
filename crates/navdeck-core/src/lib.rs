//! navdeck Core - ordering and lifecycle kernel for the bookmark navigator
//!
//! This crate holds the pure rules the engine enforces, with no I/O:
//! - Group and Site models with their soft-delete state
//! - Scoped ordering: permutation checks, placement, dense renumbering,
//!   scope revisions
//! - The lifecycle state machine and orphaned-parent restore planning
//! - Batch report types
//! - The structured error facility and the logging facility

pub mod batch;
pub mod errors;
pub mod lifecycle;
pub mod logging_facility;
pub mod model;
pub mod ordering;
pub mod rules;

// Re-export commonly used types
pub use batch::{BatchFailure, BatchOperation, BatchReport};
pub use errors::{ExError, ExErrorKind, NavError, Result};
pub use lifecycle::{LifecycleOutcome, LifecycleState, ParentState};
pub use model::{EntityKind, Group, GroupId, NewSite, Site, SiteId};
pub use ordering::{OrderKey, Ordered, Scope};
