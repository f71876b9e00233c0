use thiserror::Error;

use crate::fx::FxError;
use crate::market_data::MarketDataError;
use crate::transactions::TransactionError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the valuation engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Currency operation failed: {0}")]
    Fx(#[from] FxError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// Storage backends map their native failures into this variant.
    #[error("Repository operation failed: {0}")]
    Repository(String),

    #[error("Input validation failed: {0}")]
    Validation(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(err.to_string())
    }
}
