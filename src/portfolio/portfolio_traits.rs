use super::portfolio_model::Portfolio;
use crate::errors::Result;

/// Contract for the portfolio registry.
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Option<Portfolio>>;

    /// All portfolios eligible for recalculation, in a stable order.
    fn list_portfolios(&self) -> Result<Vec<Portfolio>>;
}
