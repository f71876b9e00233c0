use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Unknown interval: {0}")]
    UnknownInterval(String),

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}
