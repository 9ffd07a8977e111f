//! Merging of local and remote collections

use std::collections::HashSet;

use crate::models::Identified;

/// Local entries first, in stored order, then every remote entry whose id
/// is not already present locally, in remote order.
///
/// When both sides hold the same id the local copy wins.
pub fn merge<T: Identified>(local: Vec<T>, remote: Vec<T>) -> Vec<T> {
    let local_ids: HashSet<i64> = local.iter().map(|item| item.id().raw()).collect();

    let mut merged = local;
    merged.extend(
        remote
            .into_iter()
            .filter(|item| !local_ids.contains(&item.id().raw())),
    );
    merged
}
