//! Error types for the delivery pricing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while pricing shipments.

use thiserror::Error;

use crate::models::ServiceType;

/// The main error type for the pricing engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use delivery_pricing::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/couriers.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/couriers.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A shipment request field was missing or malformed.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The actual weight handed to the weight normalizer was not positive.
    #[error("Invalid weight {weight}: actual weight must be greater than zero")]
    InvalidWeight {
        /// The rejected weight in kilograms.
        weight: rust_decimal::Decimal,
    },

    /// The courier is unknown to the catalog or is not active.
    #[error("Courier not found: {courier_id}")]
    CourierNotFound {
        /// The requested courier.
        courier_id: String,
    },

    /// No active pricing rule exists for the courier and service type.
    #[error("No active pricing rule for courier '{courier_id}' and service type '{service_type}'")]
    PricingRuleNotFound {
        /// The courier that was queried.
        courier_id: String,
        /// The service type that was queried.
        service_type: ServiceType,
    },

    /// Every candidate courier was excluded from a comparison.
    #[error("No pricing available for service type '{service_type}' ({excluded} couriers excluded)")]
    NoPricingAvailable {
        /// The requested service type.
        service_type: ServiceType,
        /// The number of couriers that were excluded.
        excluded: usize,
    },

    /// The pricing configuration source could not be read.
    #[error("Pricing configuration unavailable: {message}")]
    ConfigurationUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
