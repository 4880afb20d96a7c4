//! Configuration types for delivery pricing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files: the courier catalog,
//! courier pricing rules, merchant markup policies and courier selections.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{MarginType, ServiceType};

fn default_true() -> bool {
    true
}

fn default_volumetric_divisor() -> Decimal {
    Decimal::from(5000)
}

fn default_currency() -> String {
    "AUD".to_string()
}

/// A courier in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Courier {
    /// Unique courier identifier (e.g. "swift").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Inactive couriers are never priced.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Courier catalog file structure (`couriers.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct CourierCatalog {
    /// All known couriers.
    pub couriers: Vec<Courier>,
}

/// A zone multiplier keyed by origin and destination postal prefixes.
///
/// An empty prefix matches any postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRate {
    /// Optional zone label shown in breakdowns (e.g. "interstate").
    #[serde(default)]
    pub name: Option<String>,
    /// Prefix the origin postal code must start with.
    #[serde(default)]
    pub origin_prefix: String,
    /// Prefix the destination postal code must start with.
    #[serde(default)]
    pub destination_prefix: String,
    /// Factor applied to the subtotal.
    pub multiplier: Decimal,
}

/// How much a surcharge adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurchargeCharge {
    /// A fixed amount in the rule currency.
    Fixed {
        /// The amount added.
        amount: Decimal,
    },
    /// A percentage of the shipment subtotal.
    Percentage {
        /// Percent of subtotal (e.g. 12.5 for 12.5%).
        percent: Decimal,
    },
}

/// When a surcharge applies to a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurchargeCondition {
    /// Applies to every shipment (e.g. fuel levy).
    Always,
    /// Applies when the destination postal code starts with one of the prefixes.
    RemoteArea {
        /// Remote destination postal prefixes.
        destination_prefixes: Vec<String>,
    },
    /// Applies when the caller raised the named surcharge flag.
    Flag {
        /// The flag name (case-insensitive).
        flag: String,
    },
    /// Applies when the chargeable weight exceeds the threshold.
    WeightAbove {
        /// Threshold in kilograms (exclusive).
        kg: Decimal,
    },
    /// Applies when the distance exceeds the threshold.
    DistanceAbove {
        /// Threshold in kilometres (exclusive).
        km: Decimal,
    },
}

/// A named surcharge with its charge and applicability predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeRule {
    /// Name recorded on the quote (e.g. "fuel").
    pub name: String,
    /// How much the surcharge adds.
    pub charge: SurchargeCharge,
    /// When the surcharge applies.
    #[serde(default = "SurchargeRule::default_condition")]
    pub applies_when: SurchargeCondition,
}

impl SurchargeRule {
    fn default_condition() -> SurchargeCondition {
        SurchargeCondition::Always
    }
}

/// Pricing rule for one courier and service type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierPricingRule {
    /// The courier this rule prices.
    pub courier_id: String,
    /// The service level this rule prices.
    pub service_type: ServiceType,
    /// Flat fee per shipment.
    pub base_fee: Decimal,
    /// Rate per chargeable kilogram.
    pub per_kg_rate: Decimal,
    /// Rate per kilometre.
    #[serde(default)]
    pub per_km_rate: Decimal,
    /// Cubic centimetres per volumetric kilogram.
    #[serde(default = "default_volumetric_divisor")]
    pub volumetric_divisor: Decimal,
    /// ISO currency code of every amount.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Zone multiplier table.
    #[serde(default)]
    pub zones: Vec<ZoneRate>,
    /// Surcharge rules.
    #[serde(default)]
    pub surcharges: Vec<SurchargeRule>,
    /// Only active rules are used for pricing.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Rules file structure (`rules/*.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PricingRulesFile {
    /// The rules defined in the file.
    pub rules: Vec<CourierPricingRule>,
}

/// A merchant's markup policy.
///
/// `courier_id` and `service_type` narrow the policy; when absent it applies
/// to all couriers or all service types respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantMarkupPolicy {
    /// The owning merchant.
    pub merchant_id: String,
    /// Courier the policy is limited to, if any.
    #[serde(default)]
    pub courier_id: Option<String>,
    /// Service type the policy is limited to, if any.
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    /// How the margin is expressed.
    #[serde(default)]
    pub margin_type: MarginType,
    /// Percent or amount, per `margin_type`.
    #[serde(default)]
    pub margin_value: Decimal,
    /// Increment the final price is snapped to (defaults to 0.01).
    #[serde(default)]
    pub rounding_increment: Option<Decimal>,
    /// Lower bound on the final price.
    #[serde(default)]
    pub min_price: Option<Decimal>,
    /// Upper bound on the final price.
    #[serde(default)]
    pub max_price: Option<Decimal>,
    /// Inactive policies are ignored.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl MerchantMarkupPolicy {
    /// How specific the policy is: 3 for courier+service, 2 for courier-only,
    /// 1 for service-only, 0 for the merchant default.
    pub fn specificity(&self) -> u8 {
        match (&self.courier_id, &self.service_type) {
            (Some(_), Some(_)) => 3,
            (Some(_), None) => 2,
            (None, Some(_)) => 1,
            (None, None) => 0,
        }
    }

    /// Returns true if the policy covers the courier and service type.
    pub fn matches(&self, merchant_id: &str, courier_id: &str, service_type: ServiceType) -> bool {
        self.is_active
            && self.merchant_id == merchant_id
            && self.courier_id.as_deref().is_none_or(|c| c == courier_id)
            && self.service_type.is_none_or(|s| s == service_type)
    }
}

/// Markup policies file structure (`markup_policies.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkupPoliciesFile {
    /// All merchant markup policies.
    #[serde(default)]
    pub policies: Vec<MerchantMarkupPolicy>,
}

/// The couriers a merchant chose to offer at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantCourierSelection {
    /// The merchant.
    pub merchant_id: String,
    /// Selected courier ids.
    pub courier_ids: Vec<String>,
}

/// Selections file structure (`selections.yaml`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionsFile {
    /// All merchant selections.
    #[serde(default)]
    pub selections: Vec<MerchantCourierSelection>,
}

/// Engine tuning settings (`engine.yaml`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Time budget for each courier's pricing computation.
    #[serde(default = "EngineSettings::default_timeout_ms")]
    pub per_courier_timeout_ms: u64,
    /// How long a comparison result stays valid for callers.
    #[serde(default = "EngineSettings::default_validity_hours")]
    pub quote_validity_hours: i64,
}

impl EngineSettings {
    fn default_timeout_ms() -> u64 {
        2000
    }

    fn default_validity_hours() -> i64 {
        24
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            per_courier_timeout_ms: Self::default_timeout_ms(),
            quote_validity_hours: Self::default_validity_hours(),
        }
    }
}

/// The complete pricing configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a pricing configuration directory.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Courier catalog keyed by courier id.
    couriers: HashMap<String, Courier>,
    /// Pricing rules (active and inactive).
    rules: Vec<CourierPricingRule>,
    /// Merchant markup policies.
    policies: Vec<MerchantMarkupPolicy>,
    /// Merchant courier selections keyed by merchant id.
    selections: HashMap<String, Vec<String>>,
    /// Engine settings.
    settings: EngineSettings,
}

impl PricingConfig {
    /// Creates a new PricingConfig from its component parts.
    pub fn new(
        couriers: Vec<Courier>,
        rules: Vec<CourierPricingRule>,
        policies: Vec<MerchantMarkupPolicy>,
        selections: Vec<MerchantCourierSelection>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            couriers: couriers.into_iter().map(|c| (c.id.clone(), c)).collect(),
            rules,
            policies,
            selections: selections
                .into_iter()
                .map(|s| (s.merchant_id, s.courier_ids))
                .collect(),
            settings,
        }
    }

    /// Returns the courier catalog.
    pub fn couriers(&self) -> &HashMap<String, Courier> {
        &self.couriers
    }

    /// Returns all pricing rules.
    pub fn rules(&self) -> &[CourierPricingRule] {
        &self.rules
    }

    /// Returns all merchant markup policies.
    pub fn policies(&self) -> &[MerchantMarkupPolicy] {
        &self.policies
    }

    /// Returns the selection list of a merchant, if any.
    pub fn selection(&self, merchant_id: &str) -> Option<&[String]> {
        self.selections.get(merchant_id).map(Vec::as_slice)
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Returns the active rule for a courier and service type.
    pub fn active_rule(
        &self,
        courier_id: &str,
        service_type: ServiceType,
    ) -> Option<&CourierPricingRule> {
        self.rules
            .iter()
            .find(|r| r.is_active && r.courier_id == courier_id && r.service_type == service_type)
    }
}
