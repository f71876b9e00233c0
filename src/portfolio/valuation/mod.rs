pub mod valuation_model;
pub mod valuation_service;
pub mod valuation_traits;


pub use valuation_model::PositionValuationDaily;
pub use valuation_service::ValuationService;
pub use valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
