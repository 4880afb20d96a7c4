//! Configuration loading and management for the pricing engine.
//!
//! This module provides functionality to load pricing configurations from YAML
//! files (courier catalog, pricing rules, merchant markup policies, merchant
//! courier selections and engine settings) and the [`PricingConfigProvider`]
//! query interface the engine reads them through.
//!
//! # Example
//!
//! ```no_run
//! use delivery_pricing::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/pricing").unwrap();
//! println!("Loaded {} couriers", config.config().couriers().len());
//! ```

mod loader;
mod provider;
mod types;

pub use loader::ConfigLoader;
pub use provider::{PricingConfigProvider, resolve_markup_policy};
pub use types::{
    Courier, CourierCatalog, CourierPricingRule, EngineSettings, MarkupPoliciesFile,
    MerchantCourierSelection, MerchantMarkupPolicy, PricingConfig, PricingRulesFile,
    SelectionsFile, SurchargeCharge, SurchargeCondition, SurchargeRule, ZoneRate,
};
