//! Built-in currency list and the currency catalog shown to users.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use conversions_types::RateProvider;

/// A currency the converter knows about without asking a provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownCurrency {
    pub code: &'static str,
    pub name: &'static str,
    /// Approximate value of one unit in US dollars
    pub usd_value: Decimal,
}

/// Declares the built-in currency table.
///
/// ```ignore
/// define_currencies! {
///     CODE => ("Name", usd_value),
/// }
/// ```
macro_rules! define_currencies {
    (
        $(
            $code:ident => ($name:literal, $usd:literal)
        ),* $(,)?
    ) => {
        /// Common currencies, used when the provider's symbol list is unavailable
        /// and as the development rate table.
        pub const KNOWN_CURRENCIES: &[KnownCurrency] = &[
            $(
                KnownCurrency {
                    code: stringify!($code),
                    name: $name,
                    usd_value: rust_decimal_macros::dec!($usd),
                },
            )*
        ];
    };
}

define_currencies! {
    USD => ("US Dollar", 1.0),
    EUR => ("Euro", 1.087),
    GBP => ("British Pound", 1.266),
    JPY => ("Japanese Yen", 0.0067),
    CAD => ("Canadian Dollar", 0.73),
    AUD => ("Australian Dollar", 0.66),
    CHF => ("Swiss Franc", 1.13),
    CNY => ("Chinese Yuan", 0.138),
    INR => ("Indian Rupee", 0.01203),
    RUB => ("Russian Ruble", 0.011),
    NZD => ("New Zealand Dollar", 0.61),
    MXN => ("Mexican Peso", 0.058),
    SGD => ("Singapore Dollar", 0.74),
    HKD => ("Hong Kong Dollar", 0.128),
    NOK => ("Norwegian Krone", 0.094),
    SEK => ("Swedish Krona", 0.096),
    TRY => ("Turkish Lira", 0.031),
    ZAR => ("South African Rand", 0.054),
    BRL => ("Brazilian Real", 0.18),
    THB => ("Thai Baht", 0.028),
}

/// Codes listed ahead of all others.
pub const POPULAR_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "INR", "RUB",
];

/// Where a catalog's entries came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Provider,
    Fallback,
}

/// Currency codes with their display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyCatalog {
    pub entries: BTreeMap<String, String>,
    pub source: CatalogSource,
}

impl CurrencyCatalog {
    /// The built-in list.
    pub fn fallback() -> Self {
        Self {
            entries: KNOWN_CURRENCIES
                .iter()
                .map(|c| (c.code.to_string(), c.name.to_string()))
                .collect(),
            source: CatalogSource::Fallback,
        }
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// Popular currencies first (in their fixed order, when present), then
    /// every other currency sorted by name.
    pub fn ordered(&self) -> Vec<(&str, &str)> {
        let mut popular: Vec<(&str, &str)> = POPULAR_CURRENCIES
            .iter()
            .filter_map(|code| self.entries.get_key_value(*code))
            .map(|(code, name)| (code.as_str(), name.as_str()))
            .collect();

        let mut rest: Vec<(&str, &str)> = self
            .entries
            .iter()
            .filter(|(code, _)| !POPULAR_CURRENCIES.contains(&code.as_str()))
            .map(|(code, name)| (code.as_str(), name.as_str()))
            .collect();
        rest.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));

        popular.append(&mut rest);
        popular
    }
}

/// Fetches the provider's currency list, or the built-in list if that fails.
pub async fn currency_catalog<P: RateProvider + ?Sized>(provider: &P) -> CurrencyCatalog {
    match provider.symbols().await {
        Ok(entries) if !entries.is_empty() => CurrencyCatalog {
            entries,
            source: CatalogSource::Provider,
        },
        Ok(_) => {
            tracing::warn!("Provider returned no currencies, using predefined currency list");
            CurrencyCatalog::fallback()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Using predefined currency list due to API error");
            CurrencyCatalog::fallback()
        }
    }
}
