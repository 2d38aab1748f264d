//! Hardcoded development rates.

use std::collections::BTreeMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use conversions_types::{RateError, RateProvider, RateTable};

use crate::catalog::KNOWN_CURRENCIES;

/// Serves rates derived from the built-in USD values, without any network
/// access.
///
/// Cross rates are computed through USD and rounded to 6 decimal places.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticRates;

fn usd_value(code: &str) -> Option<Decimal> {
    KNOWN_CURRENCIES
        .iter()
        .find(|c| c.code == code)
        .map(|c| c.usd_value)
}

impl StaticRates {
    /// Rate between two built-in currencies.
    pub fn rate(from: &str, to: &str) -> Option<Decimal> {
        let from_usd = usd_value(from)?;
        let to_usd = usd_value(to)?;
        if from == to {
            return Some(Decimal::ONE);
        }
        from_usd.checked_div(to_usd).map(|r| r.round_dp(6))
    }
}

#[async_trait]
impl RateProvider for StaticRates {
    async fn symbols(&self) -> Result<BTreeMap<String, String>, RateError> {
        Ok(KNOWN_CURRENCIES
            .iter()
            .map(|c| (c.code.to_string(), c.name.to_string()))
            .collect())
    }

    async fn latest(&self, base: &str) -> Result<RateTable, RateError> {
        if usd_value(base).is_none() {
            return Err(RateError::UnsupportedCurrency(base.to_string()));
        }

        let rates = KNOWN_CURRENCIES
            .iter()
            .filter_map(|c| Self::rate(base, c.code).map(|r| (c.code.to_string(), r)))
            .collect();

        Ok(RateTable {
            base: base.to_string(),
            date: None,
            rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cross_rates() {
        assert_eq!(StaticRates::rate("USD", "USD"), Some(dec!(1)));
        assert_eq!(StaticRates::rate("EUR", "USD"), Some(dec!(1.087)));
        // 1 / 1.087 rounded to 6 places
        assert_eq!(StaticRates::rate("USD", "EUR"), Some(dec!(0.919963)));
        assert_eq!(StaticRates::rate("USD", "XYZ"), None);
    }

    #[tokio::test]
    async fn test_latest_lists_every_known_currency() {
        let table = StaticRates.latest("GBP").await.unwrap();

        assert_eq!(table.base, "GBP");
        assert_eq!(table.rates.len(), KNOWN_CURRENCIES.len());
        assert_eq!(table.rate("GBP"), Some(dec!(1)));
        assert_eq!(table.rate("USD"), Some(dec!(1.266)));
    }

    #[tokio::test]
    async fn test_latest_rejects_unknown_base() {
        let err = StaticRates.latest("XYZ").await.unwrap_err();
        assert!(matches!(err, RateError::UnsupportedCurrency(code) if code == "XYZ"));
    }
}
