pub mod market_data_errors;
pub mod market_data_model;
pub mod market_data_traits;
pub mod price_service;


pub use market_data_errors::MarketDataError;
pub use market_data_model::{DailyPrice, DataSource, Interval, NewPrice, Price};
pub use market_data_traits::{PriceRepositoryTrait, PriceServiceTrait};
pub use price_service::PriceService;
