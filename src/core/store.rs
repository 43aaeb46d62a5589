//! SQLite-backed catalog of canonical restaurant records.
//!
//! A `Store` owns exactly one connection for its whole lifetime. The
//! connection is released when the store is dropped, or explicitly through
//! [`Store::close`] when the caller wants close errors surfaced. `Store` is
//! `Send` but not `Sync`; callers needing concurrent writers must serialize
//! access themselves.

use crate::core::config::StoreConfig;
use crate::core::db;
use crate::core::error::GurumeError;
use crate::core::record::{Blank, RestaurantRecord, Scalar};
use crate::core::schemas;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Categorical column a distribution can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Location,
    Menu,
}

impl Dimension {
    fn column(self) -> &'static str {
        match self {
            Dimension::Location => "location",
            Dimension::Menu => "menu",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Averages over all rows with non-null values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantStats {
    pub restaurants: i64,
    pub avg_rating: Option<f64>,
    pub avg_reviews: Option<f64>,
}

/// A row as persisted, with numeric fields already coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRestaurant {
    pub id: i64,
    pub name: String,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hours: Option<String>,
    pub price_range: Option<String>,
    pub location: Option<String>,
    pub menu: Option<String>,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub name: String,
    pub reason: String,
}

/// Outcome of a [`Store::bulk_load`]: rejected records do not stop the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkLoadReport {
    pub upserted: usize,
    pub rejected: Vec<RejectedRecord>,
}

impl BulkLoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the catalog at `path`.
    pub fn open(path: &Path) -> Result<Self, GurumeError> {
        Self::open_with(&StoreConfig {
            path: path.to_path_buf(),
            ..StoreConfig::default()
        })
    }

    pub fn open_with(config: &StoreConfig) -> Result<Self, GurumeError> {
        let conn = db::db_connect(&config.path, config.busy_timeout_secs)?;
        db::initialize_catalog(&conn)?;
        Ok(Store {
            conn,
            path: Some(config.path.clone()),
        })
    }

    /// Open a catalog that must already exist, for read paths such as reports.
    /// A missing file is `NotFound` and nothing is created on disk.
    pub fn open_existing(config: &StoreConfig) -> Result<Self, GurumeError> {
        let conn = db::db_connect_existing(&config.path, config.busy_timeout_secs)?;
        db::initialize_catalog(&conn)?;
        Ok(Store {
            conn,
            path: Some(config.path.clone()),
        })
    }

    pub fn open_in_memory() -> Result<Self, GurumeError> {
        let conn = db::db_connect_in_memory()?;
        db::initialize_catalog(&conn)?;
        Ok(Store { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert `record`, or replace the row already stored under the same name.
    pub fn upsert(&self, record: &RestaurantRecord) -> Result<(), GurumeError> {
        if record.name.is_blank() {
            return Err(GurumeError::ValidationError(
                "record name must not be empty".to_string(),
            ));
        }
        let rating = numeric(&record.rating, Scalar::to_rating)?;
        let reviews = numeric(&record.reviews, Scalar::to_review_count)?;

        self.conn.execute(
            schemas::UPSERT_RESTAURANT,
            params![
                record.name,
                rating,
                reviews,
                text(&record.address),
                text(&record.phone),
                text(&record.hours),
                text(&record.price_range),
                text(&record.location),
                text(&record.menu),
            ],
        )?;
        Ok(())
    }

    /// Upsert every record in order. Validation failures are collected in the
    /// report and the batch continues; storage failures abort it.
    pub fn bulk_load(&self, records: &[RestaurantRecord]) -> Result<BulkLoadReport, GurumeError> {
        let mut report = BulkLoadReport::default();
        for record in records {
            match self.upsert(record) {
                Ok(()) => report.upserted += 1,
                Err(GurumeError::ValidationError(reason)) => {
                    warn!(name = %record.name, %reason, "record rejected");
                    report.rejected.push(RejectedRecord {
                        name: record.name.clone(),
                        reason,
                    });
                }
                Err(other) => return Err(other),
            }
        }
        info!(
            upserted = report.upserted,
            rejected = report.rejected.len(),
            "bulk load finished"
        );
        Ok(report)
    }

    pub fn count(&self) -> Result<i64, GurumeError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Returns `None` when the catalog holds no rows.
    pub fn stats(&self) -> Result<Option<RestaurantStats>, GurumeError> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), AVG(rating), AVG(reviews) FROM restaurants",
            [],
            |row| {
                Ok(RestaurantStats {
                    restaurants: row.get(0)?,
                    avg_rating: row.get(1)?,
                    avg_reviews: row.get(2)?,
                })
            },
        )?;
        if stats.restaurants == 0 {
            return Ok(None);
        }
        Ok(Some(stats))
    }

    /// Row counts per category. Untagged rows are counted under the empty string.
    pub fn distribution_by(&self, dimension: Dimension) -> Result<BTreeMap<String, i64>, GurumeError> {
        let sql = format!(
            "SELECT COALESCE({col}, ''), COUNT(*) FROM restaurants GROUP BY COALESCE({col}, '')",
            col = dimension.column()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;

        let mut distribution = BTreeMap::new();
        for r in rows {
            let (category, count) = r?;
            distribution.insert(category, count);
        }
        Ok(distribution)
    }

    /// Stored rows, best rated first, at most `limit` of them.
    pub fn list(&self, limit: usize) -> Result<Vec<StoredRestaurant>, GurumeError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, rating, reviews, address, phone, hours, price_range, location, menu,
                    last_updated
             FROM restaurants
             ORDER BY rating IS NULL, rating DESC, name ASC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok(StoredRestaurant {
                id: row.get(0)?,
                name: row.get(1)?,
                rating: row.get(2)?,
                reviews: row.get(3)?,
                address: row.get(4)?,
                phone: row.get(5)?,
                hours: row.get(6)?,
                price_range: row.get(7)?,
                location: row.get(8)?,
                menu: row.get(9)?,
                last_updated: row.get(10)?,
            })
        })?;

        let mut results = Vec::new();
        for r in rows {
            results.push(r?);
        }
        Ok(results)
    }

    /// All non-null ratings.
    pub fn ratings(&self) -> Result<Vec<f64>, GurumeError> {
        let mut stmt = self
            .conn
            .prepare("SELECT rating FROM restaurants WHERE rating IS NOT NULL")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<f64>, _>>().map_err(GurumeError::from)
    }

    /// All non-empty price range strings.
    pub fn price_ranges(&self) -> Result<Vec<String>, GurumeError> {
        let mut stmt = self.conn.prepare(
            "SELECT price_range FROM restaurants WHERE price_range IS NOT NULL AND price_range != ''",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<String>, _>>().map_err(GurumeError::from)
    }

    /// Release the connection, reporting any error SQLite raises while closing.
    pub fn close(self) -> Result<(), GurumeError> {
        self.conn.close().map_err(|(_, e)| GurumeError::RusqliteError(e))
    }
}

fn numeric<T>(
    value: &Option<Scalar>,
    coerce: fn(&Scalar) -> Result<T, GurumeError>,
) -> Result<Option<T>, GurumeError> {
    match value {
        Some(v) if !v.is_empty() => coerce(v).map(Some),
        _ => Ok(None),
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
