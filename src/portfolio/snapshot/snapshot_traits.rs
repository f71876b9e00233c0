use async_trait::async_trait;
use chrono::NaiveDate;

use super::snapshot_model::PortfolioSnapshot;
use crate::errors::Result;
use crate::portfolio::portfolio_model::Portfolio;

/// Contract for the PortfolioSnapshot derived-fact store. Same
/// delete-then-insert idempotence as the valuation store, keyed by
/// (portfolio, snapshot_date).
#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    fn get_snapshot(
        &self,
        portfolio_id: &str,
        snapshot_date: NaiveDate,
    ) -> Result<Option<PortfolioSnapshot>>;

    async fn save_snapshot(&self, snapshot: PortfolioSnapshot) -> Result<PortfolioSnapshot>;

    async fn delete_snapshot(&self, portfolio_id: &str, snapshot_date: NaiveDate) -> Result<()>;
}

/// Contract for recomputing a portfolio's daily snapshot.
#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    async fn recompute(&self, portfolio: &Portfolio, as_of: NaiveDate)
        -> Result<PortfolioSnapshot>;
}
