//! Restaurant record model.
//!
//! A `RestaurantRecord` is one observation of an establishment, as produced by
//! a scraper run or a recommendation request. Every field except `name` is
//! optional; absence is always `None`, never a placeholder string.

use crate::core::error::GurumeError;
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Highest rating a record may carry.
pub const MAX_RATING: f64 = 5.0;

/// A numeric field as it arrived: either a JSON number or text such as `"1,234"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(Number),
    Text(String),
}

impl Scalar {
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Number(_) => false,
            Scalar::Text(s) => s.trim().is_empty(),
        }
    }

    /// Coerces the value to a rating in `[0, MAX_RATING]`.
    pub fn to_rating(&self) -> Result<f64, GurumeError> {
        let value = match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
        .ok_or_else(|| GurumeError::ValidationError(format!("rating '{}' is not a number", self)))?;

        if !(0.0..=MAX_RATING).contains(&value) {
            return Err(GurumeError::ValidationError(format!(
                "rating {} is outside [0, {}]",
                value, MAX_RATING
            )));
        }
        Ok(value)
    }

    /// Coerces the value to a non-negative review count, stripping thousands separators.
    pub fn to_review_count(&self) -> Result<i64, GurumeError> {
        let value = match self {
            Scalar::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Scalar::Text(s) => s.trim().replace(',', "").parse::<i64>().ok(),
        }
        .ok_or_else(|| {
            GurumeError::ValidationError(format!("reviews '{}' is not an integer count", self))
        })?;

        if value < 0 {
            return Err(GurumeError::ValidationError(format!(
                "reviews {} is negative",
                value
            )));
        }
        Ok(value)
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(Scalar::Number)
            .unwrap_or_else(|| Scalar::Text(value.to_string()))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(Number::from(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Scraped listings call this `url`.
    #[serde(default, alias = "url", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu: Option<String>,
}

/// Field emptiness as used by merge backfill.
pub trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for Scalar {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Blank> Blank for Option<T> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(Blank::is_blank)
    }
}

fn backfill<T: Blank + Clone>(target: &mut Option<T>, source: &Option<T>) {
    if target.is_blank() && !source.is_blank() {
        target.clone_from(source);
    }
}

impl RestaurantRecord {
    pub fn new(name: impl Into<String>) -> Self {
        RestaurantRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating: impl Into<Scalar>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_reviews(mut self, reviews: impl Into<Scalar>) -> Self {
        self.reviews = Some(reviews.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_menu(mut self, menu: impl Into<String>) -> Self {
        self.menu = Some(menu.into());
        self
    }

    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.price_range = Some(price_range.into());
        self
    }

    /// Fills every blank field of `self` from `other`. Populated fields are never overwritten.
    pub fn backfill_from(&mut self, other: &RestaurantRecord) {
        backfill(&mut self.rating, &other.rating);
        backfill(&mut self.reviews, &other.reviews);
        backfill(&mut self.address, &other.address);
        backfill(&mut self.phone, &other.phone);
        backfill(&mut self.hours, &other.hours);
        backfill(&mut self.price_range, &other.price_range);
        backfill(&mut self.review_summary, &other.review_summary);
        backfill(&mut self.details, &other.details);
        backfill(&mut self.reason, &other.reason);
        backfill(&mut self.website, &other.website);
        backfill(&mut self.location, &other.location);
        backfill(&mut self.menu, &other.menu);
    }
}
