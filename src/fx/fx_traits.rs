use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::fx_model::FxRate;
use crate::errors::Result;

/// Contract for reading exchange rate observations.
///
/// The valuation engine consumes rate history read-only; ingestion lives
/// with external collaborators.
pub trait FxRepositoryTrait: Send + Sync {
    /// Most recent rate for (base, quote) observed on or before `as_of`.
    fn get_latest_rate_for_date(
        &self,
        base_currency: &str,
        quote_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Option<FxRate>>;
}

/// Contract for FX resolution at a historical date.
pub trait FxServiceTrait: Send + Sync {
    fn rate_for_date(
        &self,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal>;

    fn convert_for_date(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal>;
}
