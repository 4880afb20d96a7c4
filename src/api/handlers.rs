//! HTTP request handlers for the pricing API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{BasePriceRequest, CompareRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/pricing/base", post(base_price_handler))
        .route("/pricing/compare", post(compare_handler))
        .with_state(state)
}

/// Handler for POST /pricing/base.
///
/// Returns one courier's base price without merchant markup.
async fn base_price_handler(
    State(state): State<AppState>,
    payload: Result<Json<BasePriceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing base price request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let (courier_id, shipment) = request.into_parts();
    let start_time = Instant::now();

    match state.engine().get_base_price(&courier_id, &shipment).await {
        Ok(quote) => {
            info!(
                correlation_id = %correlation_id,
                courier_id = %quote.courier_id,
                service_type = %quote.service_type,
                total_base_price = %quote.base_pricing.total_base_price,
                duration_us = start_time.elapsed().as_micros(),
                "Base price calculated successfully"
            );
            json_response(StatusCode::OK, &quote)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                courier_id = %courier_id,
                error = %err,
                "Base price calculation failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /pricing/compare.
///
/// Prices the shipment across the candidate couriers and returns the ranked
/// comparison.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let (shipment, merchant_id) = request.into_parts();
    let start_time = Instant::now();

    match state
        .engine()
        .compare(&shipment, merchant_id.as_deref(), Utc::now())
        .await
    {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                comparison_id = %result.comparison_id,
                merchant_id = merchant_id.as_deref().unwrap_or("-"),
                couriers_priced = result.couriers_priced,
                couriers_excluded = result.excluded.len(),
                cheapest_price = %result.price_range.min,
                duration_us = start_time.elapsed().as_micros(),
                "Comparison completed successfully"
            );
            json_response(StatusCode::OK, &result)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Comparison failed"
            );
            error_response(err.into())
        }
    }
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the failure
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, &api_error.error)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
