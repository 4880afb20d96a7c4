//! HTTP API module for the delivery pricing engine.
//!
//! This module provides the REST endpoints for single-courier base prices
//! and multi-courier comparisons.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BasePriceRequest, CompareRequest, DimensionsRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
