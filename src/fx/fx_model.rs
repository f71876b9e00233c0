use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market_data::DataSource;

/// A directional point observation of one currency's value in another.
///
/// Observations are keyed by (base, quote, ts, source). Absence of a
/// requested direction is handled by the resolver via an inverse lookup,
/// never by storing synthetic reciprocal rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxRate {
    pub id: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub ts: DateTime<Utc>,
    pub rate: Decimal,
    pub source: DataSource,
}

impl FxRate {
    pub fn pair_symbol(base: &str, quote: &str) -> String {
        format!("{}{}", base, quote)
    }
}

/// Input model for recording a new exchange rate observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFxRate {
    pub base_currency: String,
    pub quote_currency: String,
    pub ts: DateTime<Utc>,
    pub rate: Decimal,
    pub source: DataSource,
}
