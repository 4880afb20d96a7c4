//! Core data models for the pricing engine.
//!
//! This module contains all the domain models used throughout the engine.

mod comparison;
mod quote;
mod shipment;

pub use comparison::{ComparisonResult, ExcludedCourier, ExclusionReason, PriceRange, RankedQuote};
pub use quote::{
    AppliedSurcharge, BasePriceQuote, BasePricing, CalculationStep, FinalPricing, MarginType,
    MarkupDetails, PriceQuote, WeightDetails,
};
pub use shipment::{Dimensions, ServiceType, ShipmentRequest};
