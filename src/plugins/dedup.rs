//! Near-duplicate detection over a working set.
//!
//! Both operations walk the records in load order and compare each candidate
//! against the names accepted so far, which makes them quadratic in the
//! number of distinct establishments. That is fine for the few hundred
//! records a collection run produces.
//!
//! Identical names are always one establishment, whatever the threshold.

use crate::core::record::RestaurantRecord;
use crate::plugins::similarity::{NameMatcher, Similarity};
use tracing::debug;

fn same_establishment<S: Similarity>(matcher: &NameMatcher<S>, a: &str, b: &str) -> bool {
    a == b || matcher.is_same(a, b)
}

/// Keeps the first record of every group of similar names and drops the rest.
pub fn deduplicate<S: Similarity>(
    records: Vec<RestaurantRecord>,
    matcher: &NameMatcher<S>,
) -> Vec<RestaurantRecord> {
    let mut unique: Vec<RestaurantRecord> = Vec::new();
    for record in records {
        let kept = unique
            .iter()
            .find(|kept| same_establishment(matcher, &record.name, &kept.name));
        match kept {
            Some(kept) => {
                debug!(dropped = %record.name, kept = %kept.name, "dropping near-duplicate");
            }
            None => unique.push(record),
        }
    }
    unique
}

/// Partitions records into groups of similar names.
///
/// Each group is led by the first record whose name was not similar to any
/// earlier leader; later records join the first group whose leader they
/// match. Groups and their members keep load order.
pub fn cluster<S: Similarity>(
    records: Vec<RestaurantRecord>,
    matcher: &NameMatcher<S>,
) -> Vec<Vec<RestaurantRecord>> {
    let mut groups: Vec<Vec<RestaurantRecord>> = Vec::new();
    for record in records {
        let existing = groups
            .iter()
            .position(|group| same_establishment(matcher, &record.name, &group[0].name));
        match existing {
            Some(idx) => {
                debug!(member = %record.name, leader = %groups[idx][0].name, "joining group");
                groups[idx].push(record);
            }
            None => groups.push(vec![record]),
        }
    }
    groups
}
