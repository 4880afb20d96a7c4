//! Price quote models.
//!
//! This module contains the [`PriceQuote`] type and the breakdown structures
//! that capture how a courier's customer-facing price was derived: weight
//! normalization, base cost composition, surcharges and merchant markup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServiceType;

/// How a merchant margin is expressed.
///
/// # Example
///
/// ```
/// use delivery_pricing::models::MarginType;
///
/// let margin: MarginType = serde_json::from_str("\"percentage\"").unwrap();
/// assert_eq!(margin, MarginType::Percentage);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginType {
    /// No margin is applied.
    #[default]
    None,
    /// The margin is a percentage of the base price.
    Percentage,
    /// The margin is a fixed amount added to the base price.
    Fixed,
}

/// A single step in the calculation breakdown recording a pricing decision.
///
/// Each step captures the input, output, and reasoning for a rule application
/// so that every term of a final price can be audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Actual, volumetric and chargeable weight for a shipment, in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightDetails {
    /// The weight reported by the caller.
    pub actual_weight: Decimal,
    /// Size-derived weight (volume / divisor), zero without full dimensions.
    pub volumetric_weight: Decimal,
    /// `max(actual_weight, volumetric_weight)`.
    pub chargeable_weight: Decimal,
}

/// A surcharge that was applied to a base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedSurcharge {
    /// The surcharge name (e.g. "fuel").
    pub name: String,
    /// The amount added to the base price.
    pub amount: Decimal,
}

/// A courier's base cost breakdown before merchant markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePricing {
    /// The flat base fee from the pricing rule.
    pub base_price: Decimal,
    /// `chargeable_weight * per_kg_rate`.
    pub weight_cost: Decimal,
    /// `distance_km * per_km_rate`.
    pub distance_cost: Decimal,
    /// The zone multiplier applied to the subtotal.
    pub zone_multiplier: Decimal,
    /// The name of the matched zone, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    /// Surcharges that applied to this shipment.
    pub surcharges: Vec<AppliedSurcharge>,
    /// Sum of all applied surcharges.
    pub total_surcharges: Decimal,
    /// `(base_price + weight_cost + distance_cost) * zone_multiplier`.
    pub subtotal: Decimal,
    /// `subtotal + total_surcharges`, rounded to two decimals.
    pub total_base_price: Decimal,
}

/// The merchant markup applied on top of a base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupDetails {
    /// How the margin is expressed.
    pub margin_type: MarginType,
    /// The configured margin value (percent or amount).
    pub margin_value: Decimal,
    /// The effective margin after clamping; may be negative when a minimum
    /// price lies below the base price.
    pub margin_amount: Decimal,
    /// True when a markup policy with a margin was applied.
    pub has_markup: bool,
}

impl MarkupDetails {
    /// Markup details for a quote priced without any merchant policy.
    pub fn none() -> Self {
        Self {
            margin_type: MarginType::None,
            margin_value: Decimal::ZERO,
            margin_amount: Decimal::ZERO,
            has_markup: false,
        }
    }
}

/// The customer-facing price derived from a base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalPricing {
    /// The courier's total base price.
    pub before_markup: Decimal,
    /// The effective markup amount (`after_markup - before_markup`).
    pub markup_amount: Decimal,
    /// The price after markup and min/max clamping.
    pub after_markup: Decimal,
    /// `after_markup` snapped to the policy's rounding increment.
    pub rounded_price: Decimal,
}

/// A single courier's base price for a shipment, without merchant markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePriceQuote {
    /// The courier identifier.
    pub courier_id: String,
    /// The courier display name.
    pub courier_name: String,
    /// The priced service level.
    pub service_type: ServiceType,
    /// Weight normalization details.
    pub weight_details: WeightDetails,
    /// Base cost breakdown.
    pub base_pricing: BasePricing,
    /// The currency of every amount in the quote.
    pub currency: String,
    /// Ordered trace of each pricing term.
    pub calculation_breakdown: Vec<CalculationStep>,
}

/// A courier's complete, customer-facing price quote.
///
/// Quotes are created per request, never persisted, and immutable once
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// The courier identifier.
    pub courier_id: String,
    /// The courier display name.
    pub courier_name: String,
    /// The priced service level.
    pub service_type: ServiceType,
    /// Base cost breakdown.
    pub base_pricing: BasePricing,
    /// Weight normalization details.
    pub weight_details: WeightDetails,
    /// Merchant markup details.
    pub markup: MarkupDetails,
    /// Final pricing summary.
    pub final_pricing: FinalPricing,
    /// The currency of every amount in the quote.
    pub currency: String,
    /// Ordered trace of each pricing term.
    pub calculation_breakdown: Vec<CalculationStep>,
}

impl PriceQuote {
    /// The price a customer sees: the rounded final price.
    pub fn final_price(&self) -> Decimal {
        self.final_pricing.rounded_price
    }
}
