use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::market_data_errors::MarketDataError;

/// Granularity of a price observation.
///
/// The valuation engine only reads daily closes; finer intervals are stored
/// for other consumers of the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Tick,
    Minute,
    Hour,
    Day,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Tick => "tick",
            Interval::Minute => "min",
            Interval::Hour => "hour",
            Interval::Day => "day",
        }
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tick" => Ok(Interval::Tick),
            "min" => Ok(Interval::Minute),
            "hour" => Ok(Interval::Hour),
            "day" => Ok(Interval::Day),
            other => Err(MarketDataError::UnknownInterval(other.to_string())),
        }
    }
}

/// Origin of a price or rate observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Manual,
    Frankfurter,
    CoinGecko,
    Yahoo,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Manual => "MANUAL",
            DataSource::Frankfurter => "FRANKFURTER",
            DataSource::CoinGecko => "COINGECKO",
            DataSource::Yahoo => "YAHOO",
        }
    }
}

impl FromStr for DataSource {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANUAL" => Ok(DataSource::Manual),
            "FRANKFURTER" => Ok(DataSource::Frankfurter),
            "COINGECKO" => Ok(DataSource::CoinGecko),
            "YAHOO" => Ok(DataSource::Yahoo),
            other => Err(MarketDataError::UnknownDataSource(other.to_string())),
        }
    }
}

/// A point observation of an asset's value, uniquely keyed by
/// (asset, ts, source, interval).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    pub asset_id: String,
    pub ts: DateTime<Utc>,
    pub price: Decimal,
    pub currency: String,
    pub source: DataSource,
    pub interval: Interval,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new price observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPrice {
    pub asset_id: String,
    pub ts: DateTime<Utc>,
    pub price: Decimal,
    pub currency: String,
    pub source: DataSource,
    pub interval: Interval,
}

/// A resolved daily close with its quoted currency.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPrice {
    pub price: Decimal,
    pub currency: String,
}
