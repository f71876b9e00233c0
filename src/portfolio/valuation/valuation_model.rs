use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One derived valuation fact per (portfolio, asset, day).
///
/// Fully recomputed and overwritten on each run for its key; always
/// reproducible from transaction + price + rate history and never a source
/// of truth for replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionValuationDaily {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub valuation_date: NaiveDate,
    pub quantity: Decimal,
    pub price: Decimal,
    pub price_currency: String,
    pub fx_rate: Decimal,
    pub value_base: Decimal,
    pub cost_basis_base: Decimal,
    pub realized_pnl_base: Decimal,
    pub unrealized_pnl_base: Decimal,
    pub income_base: Decimal,
    /// Merged across runs: recomputed keys are overwritten, unrelated keys
    /// are preserved.
    pub metadata: serde_json::Value,
    pub calculated_at: DateTime<Utc>,
}

impl PositionValuationDaily {
    pub fn make_id(portfolio_id: &str, asset_id: &str, valuation_date: NaiveDate) -> String {
        format!(
            "{}_{}_{}",
            portfolio_id,
            asset_id,
            valuation_date.format("%Y-%m-%d")
        )
    }
}
