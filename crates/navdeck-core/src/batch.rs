//! Batch request and report types
//!
//! A batch fans one lifecycle operation out over many ids. Each id is an
//! independent unit of work: one failing id never rolls back the others,
//! and the report says exactly what happened to each.

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind};
use crate::lifecycle::LifecycleOutcome;
use crate::model::GroupId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BatchOperation {
    Delete,
    Restore,
    PermanentDelete,
    /// Sites only: restore each trashed site into `group_id`
    RestoreTo { group_id: GroupId },
}

impl BatchOperation {
    pub fn name(&self) -> &'static str {
        match self {
            BatchOperation::Delete => "delete",
            BatchOperation::Restore => "restore",
            BatchOperation::PermanentDelete => "permanentDelete",
            BatchOperation::RestoreTo { .. } => "restoreTo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub id: i64,
    pub kind: ExErrorKind,
    pub code: String,
    pub message: String,
}

/// Per-id outcome of a batch
///
/// Every distinct requested id lands in either `succeeded` or `failed`, in
/// request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub succeeded: Vec<i64>,
    /// The part of `succeeded` that was already in the requested state
    pub unchanged: Vec<i64>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, id: i64, outcome: LifecycleOutcome) {
        self.succeeded.push(id);
        if !outcome.is_applied() {
            self.unchanged.push(id);
        }
    }

    pub fn record_failure(&mut self, id: i64, err: &ExError) {
        self.failed.push(BatchFailure {
            id,
            kind: err.kind(),
            code: err.code().to_string(),
            message: err.message().to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drop repeated ids, keeping first occurrence order
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_report_partitions_outcomes() {
        let mut report = BatchReport::new();
        report.record_success(1, LifecycleOutcome::Applied);
        report.record_success(2, LifecycleOutcome::AlreadyDeleted);
        let err = ExError::new(ExErrorKind::NotFound).with_message("Site not found: 3");
        report.record_failure(3, &err);

        assert_eq!(report.succeeded, vec![1, 2]);
        assert_eq!(report.unchanged, vec![2]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].code, "ERR_NOT_FOUND");
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_operation_wire_format() {
        let op: BatchOperation =
            serde_json::from_str(r#"{"type":"restoreTo","group_id":4}"#).unwrap();
        assert_eq!(op, BatchOperation::RestoreTo { group_id: 4 });
        let op: BatchOperation = serde_json::from_str(r#"{"type":"permanentDelete"}"#).unwrap();
        assert_eq!(op, BatchOperation::PermanentDelete);
    }
}
