use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Invalid transaction data: {0}")]
    InvalidData(String),

    #[error("Unknown transaction type: {0}")]
    UnknownType(String),
}
