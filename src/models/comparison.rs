//! Comparison result models.
//!
//! A [`ComparisonResult`] is the ranked outcome of pricing one shipment across
//! a set of couriers. Couriers that could not be priced are listed with an
//! [`ExclusionReason`] instead of being silently dropped.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PriceQuote, ServiceType};

/// A price quote with its position in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedQuote {
    /// 1-based rank, cheapest first.
    pub rank: u32,
    /// True only for rank 1.
    pub is_cheapest: bool,
    /// `final_price - cheapest final_price`.
    pub price_difference_from_cheapest: Decimal,
    /// The underlying quote.
    #[serde(flatten)]
    pub quote: PriceQuote,
}

/// Spread statistics over the priced couriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// The cheapest final price.
    pub min: Decimal,
    /// The most expensive final price.
    pub max: Decimal,
    /// `max - min`.
    pub difference: Decimal,
}

/// Why a courier was left out of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// No active pricing rule for the requested service type.
    NoPricingRule,
    /// The courier exists but is not active.
    CourierInactive,
    /// The courier is not in the catalog.
    UnknownCourier,
    /// The pricing configuration could not be read for this courier.
    ConfigurationUnavailable {
        /// A description of the failure.
        message: String,
    },
    /// The base price calculation raised a fault.
    CalculationFault {
        /// A description of the fault.
        message: String,
    },
    /// The per-courier computation did not finish in time.
    TimedOut {
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
    /// The per-courier task terminated abnormally.
    TaskFailed {
        /// A description of the failure.
        message: String,
    },
}

/// A courier that was excluded from a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedCourier {
    /// The excluded courier.
    pub courier_id: String,
    /// Why it was excluded.
    #[serde(flatten)]
    pub reason: ExclusionReason,
}

/// The ranked outcome of a multi-courier comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Unique identifier for this comparison.
    pub comparison_id: Uuid,
    /// The version of the engine that produced the comparison.
    pub engine_version: String,
    /// The compared service level.
    pub service_type: ServiceType,
    /// The merchant whose markup policies were applied, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    /// Quotes ascending by final price, ties broken by courier id.
    pub quotes: Vec<RankedQuote>,
    /// The courier holding rank 1.
    pub cheapest_courier_id: String,
    /// Spread over the priced couriers.
    pub price_range: PriceRange,
    /// Couriers that could not be priced.
    pub excluded: Vec<ExcludedCourier>,
    /// Number of candidate couriers.
    pub couriers_considered: usize,
    /// Number of couriers that produced a quote.
    pub couriers_priced: usize,
    /// When the comparison was computed.
    pub calculated_at: DateTime<Utc>,
    /// Freshness contract for callers; not enforced by the engine.
    pub valid_until: DateTime<Utc>,
}

impl ComparisonResult {
    /// Returns the cheapest quote.
    pub fn cheapest(&self) -> Option<&RankedQuote> {
        self.quotes.first()
    }

    /// Returns the quote for the given courier, if it was priced.
    pub fn quote_for(&self, courier_id: &str) -> Option<&RankedQuote> {
        self.quotes.iter().find(|q| q.quote.courier_id == courier_id)
    }
}
