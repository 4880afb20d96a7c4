//! Asynchronous pricing orchestration.
//!
//! The engine reads configuration through a
//! [`PricingConfigProvider`](crate::config::PricingConfigProvider), fans out
//! one task per candidate courier and assembles a ranked
//! [`ComparisonResult`](crate::models::ComparisonResult).

mod courier_pricing;
mod pricing_engine;

pub use pricing_engine::{ENGINE_VERSION, PricingEngine};
