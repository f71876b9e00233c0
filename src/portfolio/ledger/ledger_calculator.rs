use std::sync::Arc;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::fx::FxServiceTrait;
use crate::transactions::{Transaction, TransactionType};

/// Running accounting state for one (portfolio, asset) pair after replaying
/// its ledger up to a date. All monetary fields are in the portfolio base
/// currency.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerState {
    pub quantity: Decimal,
    pub avg_cost_base: Decimal,
    pub realized_pnl_base: Decimal,
    pub income_base: Decimal,
}

/// Replays an ordered transaction ledger into weighted-average-cost state.
///
/// Each transaction's price-currency amounts are converted to base currency
/// at the transaction's own date, not the as-of date.
#[derive(Clone)]
pub struct LedgerCalculator {
    fx_service: Arc<dyn FxServiceTrait>,
}

impl LedgerCalculator {
    pub fn new(fx_service: Arc<dyn FxServiceTrait>) -> Self {
        Self { fx_service }
    }

    /// Folds transactions dated on or before `as_of` in ascending
    /// (tx_time, id) order; the id tie-break keeps replay deterministic when
    /// timestamps collide.
    pub fn replay(
        &self,
        transactions: &[Transaction],
        base_currency: &str,
        as_of: NaiveDate,
    ) -> Result<LedgerState> {
        let mut ordered: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.tx_time.date_naive() <= as_of)
            .collect();
        ordered.sort_by(|a, b| (a.tx_time, a.id.as_str()).cmp(&(b.tx_time, b.id.as_str())));

        let mut state = LedgerState::default();
        for tx in ordered {
            self.apply(tx, &mut state, base_currency)?;
        }
        Ok(state)
    }

    fn apply(&self, tx: &Transaction, state: &mut LedgerState, base_currency: &str) -> Result<()> {
        match tx.tx_type {
            TransactionType::Buy | TransactionType::TransferIn => {
                self.apply_acquisition(tx, state, base_currency)
            }
            TransactionType::Sell | TransactionType::TransferOut => {
                self.apply_disposal(tx, state, base_currency)
            }
            TransactionType::Dividend | TransactionType::Coupon | TransactionType::Interest => {
                self.apply_income(tx, state, base_currency)
            }
            TransactionType::Fee => self.apply_charge(tx, state, base_currency),
            // Cash flows and corporate actions do not adjust quantity or
            // cost basis in this engine.
            TransactionType::Deposit
            | TransactionType::Withdraw
            | TransactionType::Split
            | TransactionType::Merge
            | TransactionType::Adjustment => Ok(()),
        }
    }

    /// FX rate from the transaction's price currency into base, at the
    /// transaction date. Entries without a price currency are already in
    /// base terms.
    fn tx_fx_rate(&self, tx: &Transaction, base_currency: &str) -> Result<Decimal> {
        match &tx.price_currency {
            Some(currency) => {
                self.fx_service
                    .rate_for_date(currency, base_currency, tx.tx_time.date_naive())
            }
            None => Ok(Decimal::ONE),
        }
    }

    fn apply_acquisition(
        &self,
        tx: &Transaction,
        state: &mut LedgerState,
        base_currency: &str,
    ) -> Result<()> {
        let (quantity, price) = match (tx.quantity, tx.price) {
            (Some(quantity), Some(price)) => (quantity, price),
            _ => {
                warn!(
                    "Transaction {} ({}) missing quantity or price, skipping",
                    tx.id,
                    tx.tx_type.as_str()
                );
                return Ok(());
            }
        };

        let fx = self.tx_fx_rate(tx, base_currency)?;
        let added_cost = quantity * price * fx + tx.fee * fx;
        let new_quantity = state.quantity + quantity;

        state.avg_cost_base = if new_quantity > Decimal::ZERO {
            (state.quantity * state.avg_cost_base + added_cost) / new_quantity
        } else {
            Decimal::ZERO
        };
        state.quantity = new_quantity;
        Ok(())
    }

    fn apply_disposal(
        &self,
        tx: &Transaction,
        state: &mut LedgerState,
        base_currency: &str,
    ) -> Result<()> {
        let (quantity, price) = match (tx.quantity, tx.price) {
            (Some(quantity), Some(price)) => (quantity, price),
            _ => {
                warn!(
                    "Transaction {} ({}) missing quantity or price, skipping",
                    tx.id,
                    tx.tx_type.as_str()
                );
                return Ok(());
            }
        };
        if state.quantity <= Decimal::ZERO {
            warn!(
                "Transaction {} ({}) with no open quantity, skipping",
                tx.id,
                tx.tx_type.as_str()
            );
            return Ok(());
        }

        let fx = self.tx_fx_rate(tx, base_currency)?;
        let proceeds = quantity * price * fx - tx.fee * fx;
        state.realized_pnl_base += proceeds - quantity * state.avg_cost_base;

        // Disposing more than held is not guarded: quantity may go negative
        // and the average cost stays frozen at its last value.
        state.quantity -= quantity;
        if state.quantity.is_zero() {
            state.avg_cost_base = Decimal::ZERO;
        }
        Ok(())
    }

    fn apply_income(
        &self,
        tx: &Transaction,
        state: &mut LedgerState,
        base_currency: &str,
    ) -> Result<()> {
        let amount = match tx.price {
            Some(price) => price,
            None => return Ok(()),
        };

        // Quantity acts as a multiplier, defaulting to 1 when zero or absent
        // (per-unit distributions vs. lump sums).
        let multiplier = tx
            .quantity
            .filter(|quantity| !quantity.is_zero())
            .unwrap_or(Decimal::ONE);

        let fx = self.tx_fx_rate(tx, base_currency)?;
        state.income_base += amount * multiplier * fx;
        Ok(())
    }

    fn apply_charge(
        &self,
        tx: &Transaction,
        state: &mut LedgerState,
        base_currency: &str,
    ) -> Result<()> {
        let fx = self.tx_fx_rate(tx, base_currency)?;
        state.realized_pnl_base -= tx.fee * fx;
        Ok(())
    }
}
