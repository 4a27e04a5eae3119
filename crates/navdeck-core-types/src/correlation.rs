//! Correlation types for request tracking and tracing
//!
//! Every request that reaches the engine carries a `RequestContext`: the
//! owner the auth gate resolved, plus ids that tie its log lines together.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh id using UUIDv7
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap an id received from a caller
            pub fn from_string(s: String) -> Self {
                Self(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Unique identifier for a single request
    RequestId
);
correlation_id!(
    /// Trace identifier propagated from an upstream caller
    TraceId
);

/// Context carried through operation boundaries
///
/// `owner_id` is trusted: it is whatever principal the external auth gate
/// resolved for this request. All ordering and lifecycle rules are scoped
/// to it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub owner_id: String,
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    /// Create a context for an owner with a fresh RequestId
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            request_id: RequestId::new(),
            trace_id: None,
        }
    }

    /// Replace the generated RequestId with one supplied by the caller
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_trace_id_keeps_caller_value() {
        let trace = TraceId::from_string("upstream-7".to_string());
        assert_eq!(trace.as_str(), "upstream-7");
        assert_ne!(TraceId::new(), trace);
    }

    #[test]
    fn test_request_context_carries_owner() {
        let ctx = RequestContext::new("owner-1");
        assert_eq!(ctx.owner_id, "owner-1");
        assert!(ctx.trace_id.is_none());
    }

    #[test]
    fn test_request_context_with_ids() {
        let trace_id = TraceId::new();
        let request_id = RequestId::from_string("req-42".to_string());
        let ctx = RequestContext::new("owner-1")
            .with_request_id(request_id)
            .with_trace_id(trace_id.clone());

        assert_eq!(ctx.request_id.as_str(), "req-42");
        assert_eq!(ctx.trace_id, Some(trace_id));
    }

    #[test]
    fn test_serialization_is_transparent() {
        let id = RequestId::from_string("abc".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
