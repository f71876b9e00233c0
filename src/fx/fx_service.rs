use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::fx_errors::FxError;
use super::fx_traits::{FxRepositoryTrait, FxServiceTrait};
use crate::errors::Result;

/// Resolves exchange rates with latest-at-or-before semantics.
///
/// Lookup order: identity, direct pair, then the inverse pair taken as a
/// full-precision reciprocal. No rate in either direction is a hard
/// `RateNotFound` for the caller; the resolver never zero-fills.
#[derive(Clone)]
pub struct FxService {
    repository: Arc<dyn FxRepositoryTrait>,
}

impl FxService {
    pub fn new(repository: Arc<dyn FxRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_currency_code(code: &str) -> Result<()> {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::InvalidCurrencyCode(code.to_string()).into());
        }
        Ok(())
    }

    fn load_rate_for_date(&self, from: &str, to: &str, as_of: NaiveDate) -> Result<Decimal> {
        if let Some(direct) = self.repository.get_latest_rate_for_date(from, to, as_of)? {
            return Ok(direct.rate);
        }

        // Inverse pair fallback; reciprocal taken in decimal, not float.
        match self.repository.get_latest_rate_for_date(to, from, as_of)? {
            Some(inverse) if !inverse.rate.is_zero() => Ok(Decimal::ONE / inverse.rate),
            _ => Err(FxError::RateNotFound(format!(
                "{}/{} on or before {}",
                from, to, as_of
            ))
            .into()),
        }
    }
}

impl FxServiceTrait for FxService {
    fn rate_for_date(
        &self,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal> {
        Self::validate_currency_code(from_currency)?;
        Self::validate_currency_code(to_currency)?;

        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }

        let rate = self.load_rate_for_date(from_currency, to_currency, as_of)?;
        debug!(
            "Resolved {}->{} as of {} at {}",
            from_currency, to_currency, as_of, rate
        );
        Ok(rate)
    }

    fn convert_for_date(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        as_of: NaiveDate,
    ) -> Result<Decimal> {
        if from_currency == to_currency {
            return Ok(amount);
        }
        let rate = self.rate_for_date(from_currency, to_currency, as_of)?;
        Ok(amount * rate)
    }
}
