//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use conversions_types::{
    AppError, ConversionRepository, DomainError, ErrorResponse, HealthResponse, HistoryQuery,
    SaveConversionRequest,
};

use crate::ConversionService;

/// Application state shared across handlers.
pub struct AppState<R: ConversionRepository> {
    pub service: ConversionService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorResponse {
            error: message,
            code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::ok())
}

/// Record a completed conversion.
///
/// A body that is not a JSON object of the expected shape is reported the
/// same way as a missing field.
#[tracing::instrument(skip(state, payload))]
pub async fn save_conversion<R: ConversionRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<SaveConversionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected conversion body");
        DomainError::MissingFields
    })?;

    let saved = state.service.save_conversion(req).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Recent conversions, newest first.
#[tracing::instrument(skip(state, query))]
pub async fn conversion_history<R: ConversionRepository>(
    State(state): State<Arc<AppState<R>>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // An unreadable query string behaves like an absent one.
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let limit = query.limit();
    tracing::debug!(limit, "Fetching conversion history");

    let records = state.service.conversion_history(limit).await?;
    Ok(Json(records))
}

/// Most frequent currency pairs.
#[tracing::instrument(skip(state))]
pub async fn pair_stats<R: ConversionRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.service.pair_stats().await?;
    Ok(Json(stats))
}

/// Per-currency usage counts.
#[tracing::instrument(skip(state))]
pub async fn currency_distribution<R: ConversionRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<impl IntoResponse, ApiError> {
    let distribution = state.service.currency_distribution().await?;
    Ok(Json(distribution))
}
