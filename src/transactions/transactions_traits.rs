use chrono::NaiveDate;

use super::transactions_model::Transaction;
use crate::errors::Result;

/// Contract for reading the transaction ledger.
///
/// The engine consumes the ledger read-only; corrective edits happen
/// upstream.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Transactions for (portfolio, asset) dated on or before `as_of`,
    /// ascending by (tx_time, id).
    fn get_for_asset_until(
        &self,
        portfolio_id: &str,
        asset_id: &str,
        as_of: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    /// Distinct asset ids with at least one transaction dated on or before
    /// `as_of`.
    fn get_active_asset_ids(&self, portfolio_id: &str, as_of: NaiveDate) -> Result<Vec<String>>;
}
