//! Batch coordinator.
//!
//! Applies one lifecycle operation to many ids. Each id runs through the
//! single-item handler in its own transaction, so a failure on one id
//! never undoes the ids before it. Failures are reported per id.

#![allow(clippy::result_large_err)]

use navdeck_core::batch::{dedup_ids, BatchOperation, BatchReport};
use navdeck_core::errors::NavError;
use navdeck_core::lifecycle::LifecycleOutcome;
use navdeck_core::model::{EntityKind, GroupId};
use navdeck_core::{log_op_end, log_op_error, log_op_start};
use navdeck_store::errors::Result;
use rusqlite::Connection;

use super::elapsed_ms;
use super::lifecycle::{
    delete_group_impl, delete_site_impl, permanently_delete_group_impl,
    permanently_delete_site_impl, restore_group_impl, restore_site_impl, restore_site_to_impl,
};

/// Apply `operation` to every id in `ids`
///
/// Repeated ids are processed once, in first-occurrence order.
///
/// ## Errors
///
/// Only request-shape problems fail the whole call: `InvalidInput` for
/// `restoreTo` on groups. Everything else lands in the report.
pub fn batch_apply(
    owner_id: &str,
    kind: EntityKind,
    operation: &BatchOperation,
    ids: &[i64],
    conn: &mut Connection,
) -> Result<BatchReport> {
    log_op_start!(
        "batch_apply",
        owner_id = owner_id,
        kind = kind.as_str(),
        operation = operation.name(),
        batch_len = ids.len()
    );
    let start = std::time::Instant::now();

    let result = batch_apply_impl(owner_id, kind, operation, ids, conn).map_err(|e| {
        log_op_error!("batch_apply", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "batch_apply",
        duration_ms = elapsed_ms(start),
        succeeded = result.succeeded.len(),
        failed = result.failed.len()
    );
    Ok(result)
}

fn batch_apply_impl(
    owner_id: &str,
    kind: EntityKind,
    operation: &BatchOperation,
    ids: &[i64],
    conn: &mut Connection,
) -> Result<BatchReport> {
    let step = Step::plan(kind, operation)?;

    let mut report = BatchReport::new();
    for id in dedup_ids(ids) {
        match step.apply(owner_id, id, conn) {
            Ok(outcome) => report.record_success(id, outcome),
            Err(err) => {
                tracing::debug!(id, code = err.code(), "batch item failed");
                report.record_failure(id, &err);
            }
        }
    }
    Ok(report)
}

/// A (kind, operation) pair that has passed request-shape checks
#[derive(Debug, Clone, Copy)]
enum Step {
    DeleteSite,
    DeleteGroup,
    RestoreSite,
    RestoreGroup,
    RestoreSiteTo(GroupId),
    PurgeSite,
    PurgeGroup,
}

impl Step {
    fn plan(kind: EntityKind, operation: &BatchOperation) -> Result<Self> {
        let step = match (kind, operation) {
            (EntityKind::Site, BatchOperation::Delete) => Step::DeleteSite,
            (EntityKind::Group, BatchOperation::Delete) => Step::DeleteGroup,
            (EntityKind::Site, BatchOperation::Restore) => Step::RestoreSite,
            (EntityKind::Group, BatchOperation::Restore) => Step::RestoreGroup,
            (EntityKind::Site, BatchOperation::RestoreTo { group_id }) => {
                Step::RestoreSiteTo(*group_id)
            }
            (EntityKind::Group, BatchOperation::RestoreTo { .. }) => {
                return Err(NavError::InvalidInput {
                    reason: "restoreTo applies to sites only".to_string(),
                }
                .into())
            }
            (EntityKind::Site, BatchOperation::PermanentDelete) => Step::PurgeSite,
            (EntityKind::Group, BatchOperation::PermanentDelete) => Step::PurgeGroup,
        };
        Ok(step)
    }

    fn apply(self, owner_id: &str, id: i64, conn: &mut Connection) -> Result<LifecycleOutcome> {
        match self {
            Step::DeleteSite => delete_site_impl(owner_id, id, conn),
            Step::DeleteGroup => delete_group_impl(owner_id, id, conn).map(|d| d.outcome),
            Step::RestoreSite => restore_site_impl(owner_id, id, conn).map(|r| r.outcome),
            Step::RestoreGroup => restore_group_impl(owner_id, id, conn).map(|r| r.outcome),
            Step::RestoreSiteTo(group_id) => {
                restore_site_to_impl(owner_id, id, group_id, conn).map(|r| r.outcome)
            }
            Step::PurgeSite => {
                permanently_delete_site_impl(owner_id, id, conn).map(|_| LifecycleOutcome::Applied)
            }
            Step::PurgeGroup => {
                permanently_delete_group_impl(owner_id, id, conn).map(|_| LifecycleOutcome::Applied)
            }
        }
    }
}
