//! Exchange rates for the currency converter.
//!
//! This crate is the client side of the conversion flow:
//! - [`ExchangeRateHost`] fetches live symbols and rates over HTTP
//! - [`StaticRates`] serves a hardcoded table for development and testing
//! - [`currency_catalog`] lists currencies, falling back to a built-in list
//!   when the provider cannot be reached
//! - [`Converter`] caches rate tables and computes conversions
//!
//! # Example
//! ```
//! use exchange_rates::{Converter, StaticRates};
//! use rust_decimal_macros::dec;
//!
//! # tokio_test_block(async {
//! let converter = Converter::new(StaticRates);
//! let conversion = converter.convert(dec!(100), "USD", "EUR").await.unwrap();
//! assert_eq!(conversion.from_currency, "USD");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

mod catalog;
mod converter;
mod host;
mod table;

pub use catalog::{
    CatalogSource, CurrencyCatalog, KNOWN_CURRENCIES, KnownCurrency, POPULAR_CURRENCIES,
    currency_catalog,
};
pub use converter::{Conversion, ConvertError, Converter, RATES_TTL};
pub use host::{DEFAULT_API_URL, ExchangeRateHost};
pub use table::StaticRates;

pub use conversions_types::{RateError, RateProvider, RateTable};
