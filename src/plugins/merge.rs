//! Field-wise merging of duplicate records.
//!
//! For every field the merged record holds the first non-empty value among
//! its contributors, in contributor order. A populated field is never
//! overwritten by a later record.

use crate::core::record::RestaurantRecord;
use rustc_hash::FxHashMap;

/// Merges records that share an exact name. Output keeps first-seen order.
pub fn merge(records: Vec<RestaurantRecord>) -> Vec<RestaurantRecord> {
    let mut merged: Vec<RestaurantRecord> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for record in records {
        match index.get(&record.name) {
            Some(&idx) => merged[idx].backfill_from(&record),
            None => {
                index.insert(record.name.clone(), merged.len());
                merged.push(record);
            }
        }
    }
    merged
}

/// Folds one group into a single record named after its first member.
pub fn merge_group(group: Vec<RestaurantRecord>) -> Option<RestaurantRecord> {
    let mut members = group.into_iter();
    let mut canonical = members.next()?;
    for member in members {
        canonical.backfill_from(&member);
    }
    Some(canonical)
}
