//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod rates;
mod repository;

pub use rates::{RateError, RateProvider, RateTable};
pub use repository::ConversionRepository;
