//! Aggregate views over the catalog beyond the store's own counts.
//!
//! - Rating histogram: equal-width bins over `[0, 5]`, last bin closed.
//! - Price bands: the leading yen amount of `price_range` bucketed at
//!   ¥1000 / ¥2000 / ¥3000. Price strings without a number are counted as
//!   unparsed rather than failing the report.

use crate::core::error::GurumeError;
use crate::core::record::MAX_RATING;
use crate::core::store::Store;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static LEADING_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*").expect("valid price regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: i64,
}

pub fn histogram(ratings: &[f64], bins: usize) -> Result<Vec<HistogramBin>, GurumeError> {
    if bins == 0 {
        return Err(GurumeError::ValidationError(
            "histogram needs at least one bin".to_string(),
        ));
    }
    let width = MAX_RATING / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: width * i as f64,
            upper: width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for &rating in ratings {
        let idx = ((rating / width).floor() as usize).min(bins - 1);
        result[idx].count += 1;
    }
    Ok(result)
}

pub fn rating_histogram(store: &Store, bins: usize) -> Result<Vec<HistogramBin>, GurumeError> {
    histogram(&store.ratings()?, bins)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    Under1000,
    From1000To2000,
    From2000To3000,
    From3000,
}

impl PriceBand {
    pub const ALL: [PriceBand; 4] = [
        PriceBand::Under1000,
        PriceBand::From1000To2000,
        PriceBand::From2000To3000,
        PriceBand::From3000,
    ];

    pub fn for_amount(yen: u64) -> Self {
        match yen {
            0..1000 => PriceBand::Under1000,
            1000..2000 => PriceBand::From1000To2000,
            2000..3000 => PriceBand::From2000To3000,
            _ => PriceBand::From3000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBand::Under1000 => "~¥1000",
            PriceBand::From1000To2000 => "¥1000~¥2000",
            PriceBand::From2000To3000 => "¥2000~¥3000",
            PriceBand::From3000 => "¥3000~",
        }
    }
}

/// First yen amount in a price string: `"¥1,000～¥1,999"` is 1000.
pub fn leading_amount(price_range: &str) -> Option<u64> {
    LEADING_AMOUNT
        .find(price_range)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandCount {
    pub band: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBandReport {
    pub bands: Vec<BandCount>,
    pub unparsed: i64,
}

pub fn band_prices<'a>(prices: impl IntoIterator<Item = &'a str>) -> PriceBandReport {
    let mut counts = [0_i64; 4];
    let mut unparsed = 0;
    for price in prices {
        match leading_amount(price) {
            Some(amount) => {
                counts[PriceBand::for_amount(amount) as usize] += 1;
            }
            None => {
                debug!(price, "price range without an amount");
                unparsed += 1;
            }
        }
    }
    PriceBandReport {
        bands: PriceBand::ALL
            .iter()
            .zip(counts)
            .map(|(band, count)| BandCount {
                band: band.label().to_string(),
                count,
            })
            .collect(),
        unparsed,
    }
}

pub fn price_bands(store: &Store) -> Result<PriceBandReport, GurumeError> {
    let prices = store.price_ranges()?;
    Ok(band_prices(prices.iter().map(String::as_str)))
}
