//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across the engine's
//! boundary logs and the error facility.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_OWNER_ID: &str = "owner_id";
pub const FIELD_GROUP_ID: &str = "group_id";
pub const FIELD_SITE_ID: &str = "site_id";

// Collection sizes
pub const FIELD_SCOPE_LEN: &str = "scope_len";
pub const FIELD_BATCH_LEN: &str = "batch_len";
pub const FIELD_CASCADE_LEN: &str = "cascade_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
