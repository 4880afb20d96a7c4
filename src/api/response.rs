//! Response types for the pricing API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::InvalidInput { field, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    format!("The field '{}' is invalid", field),
                ),
            ),
            EngineError::InvalidWeight { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_INPUT",
                    message,
                    "The field 'actual_weight' is invalid",
                ),
            ),
            EngineError::CourierNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("COURIER_NOT_FOUND", message),
            ),
            EngineError::PricingRuleNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("PRICING_RULE_NOT_FOUND", message),
            ),
            EngineError::NoPricingAvailable { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "NO_PRICING_AVAILABLE",
                    message,
                    "No candidate courier could price this shipment",
                ),
            ),
            EngineError::ConfigurationUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("CONFIGURATION_UNAVAILABLE", message),
            ),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::CalculationError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceType;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_engine_error_status_codes() {
        let cases = [
            (
                EngineError::invalid_input("actual_weight", "must be greater than zero"),
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
            ),
            (
                EngineError::CourierNotFound {
                    courier_id: "ghost".to_string(),
                },
                StatusCode::NOT_FOUND,
                "COURIER_NOT_FOUND",
            ),
            (
                EngineError::NoPricingAvailable {
                    service_type: ServiceType::Overnight,
                    excluded: 3,
                },
                StatusCode::NOT_FOUND,
                "NO_PRICING_AVAILABLE",
            ),
            (
                EngineError::ConfigurationUnavailable {
                    message: "timeout".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "CONFIGURATION_UNAVAILABLE",
            ),
            (
                EngineError::CalculationError {
                    message: "overflow".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "CALCULATION_ERROR",
            ),
        ];

        for (engine_error, status, code) in cases {
            let api_error: ApiErrorResponse = engine_error.into();
            assert_eq!(api_error.status, status);
            assert_eq!(api_error.error.code, code);
        }
    }

    #[test]
    fn test_invalid_input_names_field() {
        let api_error: ApiErrorResponse = EngineError::invalid_input("origin", "must not be empty").into();
        assert_eq!(api_error.error.details.as_deref(), Some("The field 'origin' is invalid"));
        assert!(api_error.error.message.contains("origin"));
    }
}
