//! # Conversions Hex
//!
//! Application service layer and HTTP adapter for the conversion log.
//!
//! ## Architecture
//!
//! - `service` - Application service (validation and repository orchestration)
//! - `inbound/` - HTTP adapter (Axum server) and the function-per-request adapter
//! - `openapi` - OpenAPI document served at `/api-docs/openapi.json`
//!
//! The service is generic over `R: ConversionRepository`, allowing
//! different repository implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use service::ConversionService;
