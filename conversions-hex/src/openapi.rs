//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use conversions_types::domain::{
    ConversionId, ConversionRecord, CurrencyCount, PairStat, SavedConversion,
};
use conversions_types::dto::{ErrorResponse, HealthResponse, HistoryQuery, SaveConversionRequest};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
async fn health() {}

/// Record a completed conversion
#[utoipa::path(
    post,
    path = "/api/conversions",
    tag = "conversions",
    request_body = SaveConversionRequest,
    responses(
        (status = 201, description = "Conversion recorded", body = SavedConversion),
        (status = 400, description = "A required field is missing, empty or zero", body = ErrorResponse,
            example = json!({"error": "Missing required fields", "code": 400})),
        (status = 500, description = "Storage failure", body = ErrorResponse,
            example = json!({"error": "Failed to save conversion", "code": 500}))
    )
)]
async fn save_conversion() {}

/// Recent conversions, newest first
#[utoipa::path(
    get,
    path = "/api/conversions",
    tag = "conversions",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Conversion history", body = Vec<ConversionRecord>),
        (status = 500, description = "Storage failure", body = ErrorResponse,
            example = json!({"error": "Failed to fetch conversion history", "code": 500}))
    )
)]
async fn conversion_history() {}

/// Five most frequent currency pairs
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "statistics",
    responses(
        (status = 200, description = "Pair counts, most frequent first", body = Vec<PairStat>),
        (status = 500, description = "Storage failure", body = ErrorResponse,
            example = json!({"error": "Failed to fetch conversion statistics", "code": 500}))
    )
)]
async fn pair_stats() {}

/// Ten most used currencies, counting both sides of every conversion
#[utoipa::path(
    get,
    path = "/api/distribution",
    tag = "statistics",
    responses(
        (status = 200, description = "Currency counts, most used first", body = Vec<CurrencyCount>),
        (status = 500, description = "Storage failure", body = ErrorResponse,
            example = json!({"error": "Failed to fetch currency distribution", "code": 500}))
    )
)]
async fn currency_distribution() {}

/// OpenAPI documentation for the Conversions API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Currency Conversion Log API",
        version = "1.0.0",
        description = "Records currency conversions performed by clients and reports history and usage statistics.",
        license(name = "MIT"),
    ),
    paths(
        health,
        save_conversion,
        conversion_history,
        pair_stats,
        currency_distribution,
    ),
    components(
        schemas(
            SaveConversionRequest,
            SavedConversion,
            ConversionRecord,
            ConversionId,
            PairStat,
            CurrencyCount,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "conversions", description = "Record and list conversions"),
        (name = "statistics", description = "Aggregates over the conversion log"),
    )
)]
pub struct ApiDoc;
