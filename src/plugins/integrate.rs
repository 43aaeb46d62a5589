//! The integration pipeline: working set in, canonical records out.
//!
//! `MergeStrategy::Cluster` groups records by name similarity and merges each
//! group, so every contributor's fields survive. `MergeStrategy::Legacy` runs
//! the older two-step sequence (drop similar names, then merge exact names),
//! which discards the fields of dropped duplicates.

use crate::core::config::{DedupConfig, MergeStrategy};
use crate::core::error::GurumeError;
use crate::core::record::RestaurantRecord;
use crate::plugins::dedup;
use crate::plugins::merge;
use crate::plugins::similarity::{NameMatcher, SequenceRatio, Similarity};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationSummary {
    pub input: usize,
    pub canonical: usize,
}

impl IntegrationSummary {
    pub fn collapsed(&self) -> usize {
        self.input - self.canonical
    }
}

#[derive(Debug, Clone)]
pub struct Integrator<S: Similarity = SequenceRatio> {
    matcher: NameMatcher<S>,
    strategy: MergeStrategy,
}

impl Integrator<SequenceRatio> {
    pub fn from_config(config: &DedupConfig) -> Result<Self, GurumeError> {
        Ok(Integrator {
            matcher: NameMatcher::new(config.threshold)?,
            strategy: config.strategy,
        })
    }
}

impl<S: Similarity> Integrator<S> {
    pub fn new(matcher: NameMatcher<S>, strategy: MergeStrategy) -> Self {
        Integrator { matcher, strategy }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub fn integrate(&self, records: Vec<RestaurantRecord>) -> (Vec<RestaurantRecord>, IntegrationSummary) {
        let input = records.len();
        let canonical = match self.strategy {
            MergeStrategy::Cluster => dedup::cluster(records, &self.matcher)
                .into_iter()
                .filter_map(merge::merge_group)
                .collect::<Vec<_>>(),
            MergeStrategy::Legacy => merge::merge(dedup::deduplicate(records, &self.matcher)),
        };
        let summary = IntegrationSummary {
            input,
            canonical: canonical.len(),
        };
        info!(
            strategy = ?self.strategy,
            threshold = self.matcher.threshold(),
            input,
            canonical = summary.canonical,
            "integrated working set"
        );
        (canonical, summary)
    }
}
