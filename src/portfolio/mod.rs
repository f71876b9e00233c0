pub mod ledger;
pub mod portfolio_model;
pub mod portfolio_traits;
pub mod recalc_service;
pub mod snapshot;
pub mod valuation;

#[cfg(test)]
mod recalc_service_tests;

pub use ledger::{LedgerCalculator, LedgerState};
pub use portfolio_model::Portfolio;
pub use portfolio_traits::PortfolioRepositoryTrait;
pub use recalc_service::RecalculationService;
pub use snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait, SnapshotService, SnapshotServiceTrait};
pub use valuation::{
    PositionValuationDaily, ValuationRepositoryTrait, ValuationService, ValuationServiceTrait,
};
