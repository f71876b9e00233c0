use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_errors::TransactionError;

/// Ledger entry type. Only a subset participates in weighted-average-cost
/// math; cash flows and corporate actions are recorded but replay as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Buy,
    Sell,
    Deposit,
    Withdraw,
    TransferIn,
    TransferOut,
    Dividend,
    Coupon,
    Interest,
    Fee,
    Split,
    Merge,
    Adjustment,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::TransferIn => "transfer_in",
            TransactionType::TransferOut => "transfer_out",
            TransactionType::Dividend => "dividend",
            TransactionType::Coupon => "coupon",
            TransactionType::Interest => "interest",
            TransactionType::Fee => "fee",
            TransactionType::Split => "split",
            TransactionType::Merge => "merge",
            TransactionType::Adjustment => "adjustment",
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TransactionType::Buy),
            "sell" => Ok(TransactionType::Sell),
            "deposit" => Ok(TransactionType::Deposit),
            "withdraw" => Ok(TransactionType::Withdraw),
            "transfer_in" => Ok(TransactionType::TransferIn),
            "transfer_out" => Ok(TransactionType::TransferOut),
            "dividend" => Ok(TransactionType::Dividend),
            "coupon" => Ok(TransactionType::Coupon),
            "interest" => Ok(TransactionType::Interest),
            "fee" => Ok(TransactionType::Fee),
            "split" => Ok(TransactionType::Split),
            "merge" => Ok(TransactionType::Merge),
            "adjustment" => Ok(TransactionType::Adjustment),
            other => Err(TransactionError::UnknownType(other.to_string())),
        }
    }
}

/// Domain model for one ledger entry. Immutable once recorded; the engine
/// only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub tx_type: TransactionType,
    pub tx_time: DateTime<Utc>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    /// Present exactly when `price` is present.
    pub price_currency: Option<String>,
    /// Denominated in the price currency.
    pub fee: Decimal,
    /// Paired leg of a transfer, when applicable.
    pub linked_tx_id: Option<String>,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub portfolio_id: String,
    pub asset_id: String,
    pub tx_type: TransactionType,
    pub tx_time: DateTime<Utc>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub price_currency: Option<String>,
    pub fee: Decimal,
    pub linked_tx_id: Option<String>,
    pub notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl NewTransaction {
    /// Validates the data-entry invariants the engine later assumes.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.portfolio_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Portfolio ID cannot be empty".to_string(),
            ));
        }
        if self.asset_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Asset ID cannot be empty".to_string(),
            ));
        }
        if self.price.is_some() != self.price_currency.is_some() {
            return Err(TransactionError::InvalidData(
                "Price and price currency must be provided together".to_string(),
            ));
        }
        if self.fee < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Fee cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}
