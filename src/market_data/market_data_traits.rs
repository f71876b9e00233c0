use chrono::NaiveDate;

use super::market_data_model::{DailyPrice, Interval, Price};
use crate::errors::Result;

/// Contract for reading price observations.
///
/// The valuation engine consumes price history read-only; ingestion lives
/// with external collaborators.
pub trait PriceRepositoryTrait: Send + Sync {
    /// Most recent price for the asset at the given interval observed on or
    /// before `as_of`.
    fn get_latest_price_for_date(
        &self,
        asset_id: &str,
        interval: Interval,
        as_of: NaiveDate,
    ) -> Result<Option<Price>>;
}

/// Contract for daily price resolution.
pub trait PriceServiceTrait: Send + Sync {
    /// Most recent daily close at or before `as_of`. `None` means the caller
    /// must skip valuation for the asset/day, not error.
    fn daily_price(&self, asset_id: &str, as_of: NaiveDate) -> Result<Option<DailyPrice>>;
}
