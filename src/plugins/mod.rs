//! Pipeline stages: load, score, deduplicate, merge, integrate, report.

pub mod dedup;
pub mod integrate;
pub mod loader;
pub mod merge;
pub mod report;
pub mod similarity;
