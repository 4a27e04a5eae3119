use std::collections::HashSet;

use super::Scope;
use crate::errors::{NavError, Result, ScopeViolation};

/// Check that `requested` is exactly a permutation of `current`
///
/// `current` is the scope's active membership. The first violation found
/// is reported, scanning `requested` front to back before looking for
/// missing members, so the error points at the entry the caller sent.
///
/// # Errors
/// `InvalidScope` on a duplicate id, an id that is not an active member,
/// or an active member absent from `requested`.
pub fn validate_permutation(scope: &Scope, current: &[i64], requested: &[i64]) -> Result<()> {
    let members: HashSet<i64> = current.iter().copied().collect();
    let mut seen: HashSet<i64> = HashSet::with_capacity(requested.len());

    for &id in requested {
        if !members.contains(&id) {
            return Err(invalid(scope, ScopeViolation::NotAMember(id)));
        }
        if !seen.insert(id) {
            return Err(invalid(scope, ScopeViolation::Duplicate(id)));
        }
    }

    if let Some(&missing) = current.iter().find(|id| !seen.contains(id)) {
        return Err(invalid(scope, ScopeViolation::Missing(missing)));
    }

    Ok(())
}

fn invalid(scope: &Scope, violation: ScopeViolation) -> NavError {
    NavError::InvalidScope {
        scope: scope.to_string(),
        violation,
    }
}
