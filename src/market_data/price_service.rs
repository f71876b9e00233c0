use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::market_data_model::{DailyPrice, Interval};
use super::market_data_traits::{PriceRepositoryTrait, PriceServiceTrait};
use crate::errors::Result;

/// Resolves the most recent daily close at or before a date.
#[derive(Clone)]
pub struct PriceService {
    repository: Arc<dyn PriceRepositoryTrait>,
}

impl PriceService {
    pub fn new(repository: Arc<dyn PriceRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl PriceServiceTrait for PriceService {
    fn daily_price(&self, asset_id: &str, as_of: NaiveDate) -> Result<Option<DailyPrice>> {
        match self
            .repository
            .get_latest_price_for_date(asset_id, Interval::Day, as_of)?
        {
            Some(price) => Ok(Some(DailyPrice {
                price: price.price,
                currency: price.currency,
            })),
            None => {
                debug!("No daily price for asset {} on or before {}", asset_id, as_of);
                Ok(None)
            }
        }
    }
}
