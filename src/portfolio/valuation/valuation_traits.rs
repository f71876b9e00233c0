use async_trait::async_trait;
use chrono::NaiveDate;

use super::valuation_model::PositionValuationDaily;
use crate::errors::Result;
use crate::portfolio::portfolio_model::Portfolio;

/// Contract for the PositionValuationDaily derived-fact store.
///
/// Writes are an explicit delete-then-insert scoped to one
/// (portfolio, asset, date) key, so recomputes stay idempotent on any
/// backend.
#[async_trait]
pub trait ValuationRepositoryTrait: Send + Sync {
    fn get_fact(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Option<PositionValuationDaily>>;

    /// All facts for the portfolio on one day, in a stable order.
    fn get_facts_for_date(
        &self,
        portfolio_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<Vec<PositionValuationDaily>>;

    async fn upsert_fact(&self, fact: PositionValuationDaily) -> Result<PositionValuationDaily>;

    async fn delete_fact(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        valuation_date: NaiveDate,
    ) -> Result<()>;
}

/// Contract for computing one position valuation fact.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// `None` means no daily price was available and any stale fact for the
    /// key was cleared.
    async fn calculate(
        &self,
        portfolio: &Portfolio,
        asset_id: &str,
        as_of: NaiveDate,
    ) -> Result<Option<PositionValuationDaily>>;
}
