use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio-level daily rollup, derived strictly from the portfolio's
/// position valuation facts. Keyed by (portfolio, snapshot_date) and fully
/// recomputed on each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub id: String,
    pub portfolio_id: String,
    pub snapshot_date: NaiveDate,
    pub base_currency: String,
    pub total_value_base: Decimal,
    pub pnl_1d_base: Decimal,
    pub pnl_7d_base: Decimal,
    pub pnl_30d_base: Decimal,
    pub calculated_at: DateTime<Utc>,
}

impl PortfolioSnapshot {
    pub fn make_id(portfolio_id: &str, snapshot_date: NaiveDate) -> String {
        format!("{}_{}", portfolio_id, snapshot_date.format("%Y-%m-%d"))
    }
}
