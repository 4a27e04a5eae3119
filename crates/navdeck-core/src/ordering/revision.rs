use sha2::{Digest, Sha256};

use super::{Ordered, Scope};
use crate::errors::{NavError, Result};

/// Revision token for a scope's current order
///
/// Hex SHA-256 over `id:order_num` lines in canonical order. Any reorder,
/// insertion, or removal in the scope changes it.
pub fn scope_revision<T: Ordered>(members: &[T]) -> String {
    let mut keys: Vec<(i64, i64)> = members.iter().map(|m| m.order_key()).collect();
    keys.sort_unstable();

    let mut hasher = Sha256::new();
    for (order_num, id) in keys {
        hasher.update(format!("{}:{}\n", id, order_num).as_bytes());
    }
    hex::encode(hasher.finalize())
}

/// Fail closed when the caller's view of the scope is out of date
///
/// `None` means the caller accepts last-writer-wins.
///
/// # Errors
/// `StaleOrder` when `expected` is present and differs from `actual`.
pub fn check_revision(scope: &Scope, expected: Option<&str>, actual: &str) -> Result<()> {
    match expected {
        Some(expected) if expected != actual => Err(NavError::StaleOrder {
            scope: scope.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}
