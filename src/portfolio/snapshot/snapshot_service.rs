use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::snapshot_model::PortfolioSnapshot;
use super::snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
use crate::constants::DECIMAL_PRECISION;
use crate::errors::Result;
use crate::portfolio::portfolio_model::Portfolio;
use crate::portfolio::valuation::ValuationRepositoryTrait;

/// Rolls position valuation facts up into a portfolio-level daily snapshot
/// with 1/7/30-day P&L deltas.
#[derive(Clone)]
pub struct SnapshotService {
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl SnapshotService {
    pub fn new(
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    ) -> Self {
        Self {
            valuation_repository,
            snapshot_repository,
        }
    }

    /// Total position value on one day; a day without facts totals zero.
    fn total_value_on(&self, portfolio_id: &str, date: NaiveDate) -> Result<Decimal> {
        let facts = self
            .valuation_repository
            .get_facts_for_date(portfolio_id, date)?;
        Ok(facts.iter().map(|fact| fact.value_base).sum())
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
    async fn recompute(
        &self,
        portfolio: &Portfolio,
        as_of: NaiveDate,
    ) -> Result<PortfolioSnapshot> {
        self.snapshot_repository
            .delete_snapshot(&portfolio.id, as_of)
            .await?;

        let total_value_base = self.total_value_on(&portfolio.id, as_of)?;

        // Each window total is derived independently from that day's facts,
        // not from prior snapshot rows.
        let total_1d_ago = self.total_value_on(&portfolio.id, as_of - Duration::days(1))?;
        let total_7d_ago = self.total_value_on(&portfolio.id, as_of - Duration::days(7))?;
        let total_30d_ago = self.total_value_on(&portfolio.id, as_of - Duration::days(30))?;

        debug!(
            "Snapshot for portfolio {} on {}: total {}",
            portfolio.id, as_of, total_value_base
        );

        let snapshot = PortfolioSnapshot {
            id: PortfolioSnapshot::make_id(&portfolio.id, as_of),
            portfolio_id: portfolio.id.clone(),
            snapshot_date: as_of,
            base_currency: portfolio.base_currency.clone(),
            total_value_base: total_value_base.round_dp(DECIMAL_PRECISION),
            pnl_1d_base: (total_value_base - total_1d_ago).round_dp(DECIMAL_PRECISION),
            pnl_7d_base: (total_value_base - total_7d_ago).round_dp(DECIMAL_PRECISION),
            pnl_30d_base: (total_value_base - total_30d_ago).round_dp(DECIMAL_PRECISION),
            calculated_at: Utc::now(),
        };

        self.snapshot_repository.save_snapshot(snapshot).await
    }
}
