//! Core modules: the record model, configuration, errors and the SQLite catalog.
//!
//! Everything the pipeline stages in [`crate::plugins`] share lives here.

pub mod config;
pub mod db;
pub mod error;
pub mod output;
pub mod record;
pub mod schemas;
pub mod store;
pub mod time;
