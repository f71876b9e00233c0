use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, error, info};

use super::portfolio_model::Portfolio;
use super::portfolio_traits::PortfolioRepositoryTrait;
use super::snapshot::SnapshotServiceTrait;
use super::valuation::ValuationServiceTrait;
use crate::errors::{Error, Result};
use crate::transactions::TransactionRepositoryTrait;

/// Top-level batch entry point: recomputes valuation facts and the daily
/// snapshot for one portfolio or all of them.
///
/// Safe to re-run for any as-of date; every write is a keyed
/// delete-then-insert, so repeated runs converge on identical facts.
/// Failures are isolated per unit: a bad (portfolio, asset) pair or a bad
/// portfolio is logged and skipped without disturbing the rest of the batch.
#[derive(Clone)]
pub struct RecalculationService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    valuation_service: Arc<dyn ValuationServiceTrait>,
    snapshot_service: Arc<dyn SnapshotServiceTrait>,
}

impl RecalculationService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        valuation_service: Arc<dyn ValuationServiceTrait>,
        snapshot_service: Arc<dyn SnapshotServiceTrait>,
    ) -> Self {
        Self {
            portfolio_repository,
            transaction_repository,
            valuation_service,
            snapshot_service,
        }
    }

    /// Recalculates the given portfolio, or every registered portfolio when
    /// `portfolio_id` is `None`.
    pub async fn recalc(&self, as_of: NaiveDate, portfolio_id: Option<&str>) -> Result<()> {
        let portfolios = match portfolio_id {
            Some(id) => match self.portfolio_repository.get_portfolio(id)? {
                Some(portfolio) => vec![portfolio],
                None => return Err(Error::Validation(format!("Unknown portfolio: {}", id))),
            },
            None => self.portfolio_repository.list_portfolios()?,
        };

        info!(
            "Recalculating {} portfolio(s) as of {}",
            portfolios.len(),
            as_of
        );

        for portfolio in &portfolios {
            if let Err(e) = self.recalc_portfolio(portfolio, as_of).await {
                error!(
                    "Recalculation failed for portfolio {} on {}: {}",
                    portfolio.id, as_of, e
                );
            }
        }
        Ok(())
    }

    async fn recalc_portfolio(&self, portfolio: &Portfolio, as_of: NaiveDate) -> Result<()> {
        let asset_ids = self
            .transaction_repository
            .get_active_asset_ids(&portfolio.id, as_of)?;
        debug!(
            "Portfolio {}: {} asset(s) with history up to {}",
            portfolio.id,
            asset_ids.len(),
            as_of
        );

        for asset_id in &asset_ids {
            // Typically a missing FX rate; skip the pair and keep the rest
            // of the portfolio intact.
            if let Err(e) = self
                .valuation_service
                .calculate(portfolio, asset_id, as_of)
                .await
            {
                error!(
                    "Valuation failed for portfolio {} asset {} on {}: {}",
                    portfolio.id, asset_id, as_of, e
                );
            }
        }

        self.snapshot_service.recompute(portfolio, as_of).await?;
        Ok(())
    }
}
