use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;

use super::valuation_model::PositionValuationDaily;
use super::valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
use crate::constants::{DECIMAL_PRECISION, METADATA_KEY_AVG_COST};
use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::market_data::PriceServiceTrait;
use crate::portfolio::ledger::LedgerCalculator;
use crate::portfolio::portfolio_model::Portfolio;
use crate::transactions::TransactionRepositoryTrait;

/// Computes one daily valuation fact per (portfolio, asset, day): ledger
/// replay, then price and FX resolution at the as-of date.
#[derive(Clone)]
pub struct ValuationService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    valuation_repository: Arc<dyn ValuationRepositoryTrait>,
    price_service: Arc<dyn PriceServiceTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
    ledger_calculator: LedgerCalculator,
}

impl ValuationService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        valuation_repository: Arc<dyn ValuationRepositoryTrait>,
        price_service: Arc<dyn PriceServiceTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        let ledger_calculator = LedgerCalculator::new(fx_service.clone());
        Self {
            transaction_repository,
            valuation_repository,
            price_service,
            fx_service,
            ledger_calculator,
        }
    }

    fn merge_metadata(
        existing: Option<&serde_json::Value>,
        avg_cost_base: Decimal,
    ) -> Result<serde_json::Value> {
        let mut map = match existing {
            Some(serde_json::Value::Object(object)) => object.clone(),
            _ => serde_json::Map::new(),
        };
        map.insert(
            METADATA_KEY_AVG_COST.to_string(),
            serde_json::to_value(avg_cost_base)?,
        );
        Ok(serde_json::Value::Object(map))
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn calculate(
        &self,
        portfolio: &Portfolio,
        asset_id: &str,
        as_of: NaiveDate,
    ) -> Result<Option<PositionValuationDaily>> {
        let transactions =
            self.transaction_repository
                .get_for_asset_until(&portfolio.id, asset_id, as_of)?;
        let ledger = self
            .ledger_calculator
            .replay(&transactions, &portfolio.base_currency, as_of)?;

        let daily_price = match self.price_service.daily_price(asset_id, as_of)? {
            Some(price) => price,
            None => {
                // No price means no fact: clear anything a prior run wrote
                // for this key so "no data" is itself idempotent.
                debug!(
                    "No daily price for {}/{} on {}, clearing stale fact",
                    portfolio.id, asset_id, as_of
                );
                self.valuation_repository
                    .delete_fact(&portfolio.id, asset_id, as_of)
                    .await?;
                return Ok(None);
            }
        };

        let fx_rate =
            self.fx_service
                .rate_for_date(&daily_price.currency, &portfolio.base_currency, as_of)?;

        let cost_basis_base = ledger.quantity * ledger.avg_cost_base;
        let value_base = ledger.quantity * daily_price.price * fx_rate;
        let unrealized_pnl_base = value_base - cost_basis_base;

        let existing = self
            .valuation_repository
            .get_fact(&portfolio.id, asset_id, as_of)?;
        let metadata =
            Self::merge_metadata(existing.as_ref().map(|f| &f.metadata), ledger.avg_cost_base)?;

        let fact = PositionValuationDaily {
            id: PositionValuationDaily::make_id(&portfolio.id, asset_id, as_of),
            portfolio_id: portfolio.id.clone(),
            asset_id: asset_id.to_string(),
            valuation_date: as_of,
            quantity: ledger.quantity,
            price: daily_price.price,
            price_currency: daily_price.currency,
            fx_rate,
            value_base: value_base.round_dp(DECIMAL_PRECISION),
            cost_basis_base: cost_basis_base.round_dp(DECIMAL_PRECISION),
            realized_pnl_base: ledger.realized_pnl_base.round_dp(DECIMAL_PRECISION),
            unrealized_pnl_base: unrealized_pnl_base.round_dp(DECIMAL_PRECISION),
            income_base: ledger.income_base.round_dp(DECIMAL_PRECISION),
            metadata,
            calculated_at: Utc::now(),
        };

        let saved = self.valuation_repository.upsert_fact(fact).await?;
        Ok(Some(saved))
    }
}
