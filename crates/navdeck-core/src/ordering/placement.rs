use super::Ordered;

/// Position for a member appended to the end of a scope
///
/// One past the current maximum, so an appended member never collides
/// with members that were renumbered while it was away.
pub fn next_order_num<T: Ordered>(members: &[T]) -> i64 {
    members
        .iter()
        .map(|m| m.order_num())
        .max()
        .map_or(0, |max| max + 1)
}

/// Insert `moving` into an ordered id list at `target_index`
///
/// Any existing occurrence of `moving` is removed first, so a move within
/// the same scope behaves as remove-then-insert. Indexes past the end are
/// clamped to an append.
pub fn place(ordered: &[i64], moving: i64, target_index: usize) -> Vec<i64> {
    let mut ids: Vec<i64> = ordered.iter().copied().filter(|&id| id != moving).collect();
    let index = target_index.min(ids.len());
    ids.insert(index, moving);
    ids
}

/// Dense `(id, order_num)` assignments reflecting the list order
pub fn dense_assignments(ordered: &[i64]) -> Vec<(i64, i64)> {
    ordered
        .iter()
        .enumerate()
        .map(|(pos, &id)| (id, pos as i64))
        .collect()
}

/// Dense assignments that differ from the members' stored positions
///
/// Rows that already hold their target value are skipped so a repeated
/// reorder issues no writes.
pub fn changed_assignments<T: Ordered>(members: &[T], ordered: &[i64]) -> Vec<(i64, i64)> {
    dense_assignments(ordered)
        .into_iter()
        .filter(|&(id, order_num)| {
            members
                .iter()
                .find(|m| m.entity_id() == id)
                .map_or(true, |m| m.order_num() != order_num)
        })
        .collect()
}
