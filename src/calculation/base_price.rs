//! Base price calculation.
//!
//! This module composes a courier's base cost for a shipment from its pricing
//! rule: base fee, weight cost, distance cost, zone multiplier and surcharges.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::CourierPricingRule;
use crate::error::{EngineError, EngineResult};
use crate::models::{BasePricing, CalculationStep, ShipmentRequest, WeightDetails};

use super::surcharge::evaluate_surcharges;
use super::weight::normalize_weight;
use super::zone::lookup_zone_multiplier;

/// Decimal places of a money amount.
pub const MONEY_DP: u32 = 2;

/// Rounds a money amount half-up to two decimals.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// The result of a base price calculation.
#[derive(Debug, Clone)]
pub struct BasePriceCalculation {
    /// Weight normalization details.
    pub weight_details: WeightDetails,
    /// The base cost breakdown.
    pub pricing: BasePricing,
    /// Audit steps: weight normalization, zone lookup, cost composition, surcharges.
    pub audit_steps: Vec<CalculationStep>,
}

/// Calculates a courier's base price for a shipment.
///
/// ```text
/// weight_cost      = chargeable_weight * per_kg_rate
/// distance_cost    = distance_km * per_km_rate
/// subtotal         = (base_fee + weight_cost + distance_cost) * zone_multiplier
/// total_base_price = round2(subtotal + total_surcharges)
/// ```
///
/// # Arguments
///
/// * `shipment` - The shipment to price
/// * `rule` - The courier's active pricing rule for the shipment's service type
/// * `first_step` - The step number of the first audit step produced
///
/// # Errors
///
/// Returns `InvalidWeight` for a non-positive actual weight and
/// `CalculationError` for a rule that cannot be evaluated (non-positive
/// divisor, arithmetic overflow, or a service type mismatch).
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::calculate_base_price;
/// use delivery_pricing::config::CourierPricingRule;
/// use delivery_pricing::models::{ServiceType, ShipmentRequest};
/// use rust_decimal::Decimal;
///
/// let rule = CourierPricingRule {
///     courier_id: "swift".to_string(),
///     service_type: ServiceType::Standard,
///     base_fee: Decimal::from(20),
///     per_kg_rate: Decimal::from(10),
///     per_km_rate: Decimal::ZERO,
///     volumetric_divisor: Decimal::from(5000),
///     currency: "AUD".to_string(),
///     zones: vec![],
///     surcharges: vec![],
///     is_active: true,
/// };
/// let shipment = ShipmentRequest::new(Decimal::from(5), ServiceType::Standard);
///
/// let result = calculate_base_price(&shipment, &rule, 1).unwrap();
/// assert_eq!(result.pricing.weight_cost, Decimal::from(50));
/// assert_eq!(result.pricing.total_base_price, Decimal::from(70));
/// ```
pub fn calculate_base_price(
    shipment: &ShipmentRequest,
    rule: &CourierPricingRule,
    first_step: u32,
) -> EngineResult<BasePriceCalculation> {
    if rule.service_type != shipment.service_type {
        return Err(EngineError::CalculationError {
            message: format!(
                "rule for {}/{} cannot price a {} shipment",
                rule.courier_id, rule.service_type, shipment.service_type
            ),
        });
    }

    let mut step_number = first_step;
    let mut audit_steps = Vec::with_capacity(4);

    let weight = normalize_weight(
        shipment.actual_weight_kg,
        shipment.dimensions.as_ref(),
        rule.volumetric_divisor,
        step_number,
    )?;
    audit_steps.push(weight.audit_step);
    step_number += 1;
    let weight_details = weight.weight;

    let zone = lookup_zone_multiplier(
        &rule.zones,
        &shipment.origin_postal_code,
        &shipment.destination_postal_code,
        step_number,
    );
    audit_steps.push(zone.audit_step);
    step_number += 1;

    let overflow = |term: &str| EngineError::CalculationError {
        message: format!("{} overflowed for courier {}", term, rule.courier_id),
    };

    // Intermediate terms stay exact; only the total is rounded to cents
    let weight_cost = weight_details
        .chargeable_weight
        .checked_mul(rule.per_kg_rate)
        .ok_or_else(|| overflow("weight cost"))?;
    let distance_cost = shipment
        .distance_km
        .checked_mul(rule.per_km_rate)
        .ok_or_else(|| overflow("distance cost"))?;
    let subtotal = rule
        .base_fee
        .checked_add(weight_cost)
        .and_then(|s| s.checked_add(distance_cost))
        .and_then(|s| s.checked_mul(zone.multiplier))
        .ok_or_else(|| overflow("subtotal"))?;

    audit_steps.push(CalculationStep {
        step_number,
        rule_id: "base_cost".to_string(),
        rule_name: "Base Cost Composition".to_string(),
        input: serde_json::json!({
            "base_fee": rule.base_fee.to_string(),
            "chargeable_weight": weight_details.chargeable_weight.normalize().to_string(),
            "per_kg_rate": rule.per_kg_rate.to_string(),
            "distance_km": shipment.distance_km.normalize().to_string(),
            "per_km_rate": rule.per_km_rate.to_string(),
            "zone_multiplier": zone.multiplier.normalize().to_string()
        }),
        output: serde_json::json!({
            "weight_cost": weight_cost.to_string(),
            "distance_cost": distance_cost.to_string(),
            "subtotal": subtotal.to_string()
        }),
        reasoning: format!(
            "(${} + {}kg x ${} + {}km x ${}) x {} = ${}",
            rule.base_fee.normalize(),
            weight_details.chargeable_weight.normalize(),
            rule.per_kg_rate.normalize(),
            shipment.distance_km.normalize(),
            rule.per_km_rate.normalize(),
            zone.multiplier.normalize(),
            subtotal
        ),
    });
    step_number += 1;

    let surcharges = evaluate_surcharges(
        &rule.surcharges,
        shipment,
        weight_details.chargeable_weight,
        subtotal,
        step_number,
    )?;
    audit_steps.push(surcharges.audit_step);

    let total_base_price = subtotal
        .checked_add(surcharges.total)
        .map(round_money)
        .ok_or_else(|| overflow("total base price"))?;

    Ok(BasePriceCalculation {
        weight_details,
        pricing: BasePricing {
            base_price: rule.base_fee,
            weight_cost,
            distance_cost,
            zone_multiplier: zone.multiplier,
            zone_name: zone.zone_name,
            surcharges: surcharges.applied,
            total_surcharges: surcharges.total,
            subtotal,
            total_base_price,
        },
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SurchargeCharge, SurchargeCondition, SurchargeRule, ZoneRate};
    use crate::models::{Dimensions, ServiceType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn standard_rule() -> CourierPricingRule {
        CourierPricingRule {
            courier_id: "swift".to_string(),
            service_type: ServiceType::Standard,
            base_fee: dec("20"),
            per_kg_rate: dec("10"),
            per_km_rate: Decimal::ZERO,
            volumetric_divisor: dec("5000"),
            currency: "AUD".to_string(),
            zones: vec![],
            surcharges: vec![],
            is_active: true,
        }
    }

    fn express_rule() -> CourierPricingRule {
        CourierPricingRule {
            courier_id: "swift".to_string(),
            service_type: ServiceType::Express,
            base_fee: dec("30"),
            per_kg_rate: dec("12"),
            per_km_rate: dec("0.5"),
            volumetric_divisor: dec("5000"),
            currency: "AUD".to_string(),
            zones: vec![ZoneRate {
                name: Some("interstate".to_string()),
                origin_prefix: "2".to_string(),
                destination_prefix: "3".to_string(),
                multiplier: dec("1.2"),
            }],
            surcharges: vec![
                SurchargeRule {
                    name: "fuel".to_string(),
                    charge: SurchargeCharge::Percentage { percent: dec("10") },
                    applies_when: SurchargeCondition::Always,
                },
                SurchargeRule {
                    name: "fragile".to_string(),
                    charge: SurchargeCharge::Fixed { amount: dec("4.50") },
                    applies_when: SurchargeCondition::Flag {
                        flag: "fragile".to_string(),
                    },
                },
            ],
            is_active: true,
        }
    }

    #[test]
    fn test_weight_only_pricing() {
        // 5kg, base 20, 10/kg: 20 + 50 = 70
        let shipment = ShipmentRequest::new(dec("5"), ServiceType::Standard);
        let result = calculate_base_price(&shipment, &standard_rule(), 1).unwrap();

        assert_eq!(result.weight_details.chargeable_weight, dec("5"));
        assert_eq!(result.pricing.base_price, dec("20"));
        assert_eq!(result.pricing.weight_cost, dec("50"));
        assert_eq!(result.pricing.distance_cost, Decimal::ZERO);
        assert_eq!(result.pricing.zone_multiplier, Decimal::ONE);
        assert!(result.pricing.surcharges.is_empty());
        assert_eq!(result.pricing.subtotal, dec("70"));
        assert_eq!(result.pricing.total_base_price, dec("70"));
    }

    #[test]
    fn test_dimensions_below_actual_weight_do_not_change_price() {
        let shipment = ShipmentRequest::new(dec("5"), ServiceType::Standard)
            .with_dimensions(Dimensions::new(dec("40"), dec("30"), dec("20")));
        let result = calculate_base_price(&shipment, &standard_rule(), 1).unwrap();

        assert_eq!(result.weight_details.volumetric_weight, dec("4.8"));
        assert_eq!(result.weight_details.chargeable_weight, dec("5"));
        assert_eq!(result.pricing.total_base_price, dec("70"));
    }

    #[test]
    fn test_volumetric_weight_drives_weight_cost() {
        // 60 x 50 x 40 / 5000 = 24kg -> 20 + 240 = 260
        let shipment = ShipmentRequest::new(dec("3"), ServiceType::Standard)
            .with_dimensions(Dimensions::new(dec("60"), dec("50"), dec("40")));
        let result = calculate_base_price(&shipment, &standard_rule(), 1).unwrap();

        assert_eq!(result.pricing.weight_cost, dec("240"));
        assert_eq!(result.pricing.total_base_price, dec("260"));
    }

    #[test]
    fn test_zone_distance_and_surcharges_compose() {
        // (30 + 5 x 12 + 100 x 0.5) x 1.2 = 168; fuel 10% = 16.80; total 184.80
        let shipment = ShipmentRequest::new(dec("5"), ServiceType::Express)
            .with_route(dec("100"), "2000", "3000");
        let result = calculate_base_price(&shipment, &express_rule(), 1).unwrap();

        assert_eq!(result.pricing.distance_cost, dec("50"));
        assert_eq!(result.pricing.zone_multiplier, dec("1.2"));
        assert_eq!(result.pricing.zone_name.as_deref(), Some("interstate"));
        assert_eq!(result.pricing.subtotal, dec("168"));
        assert_eq!(result.pricing.total_surcharges, dec("16.80"));
        assert_eq!(result.pricing.total_base_price, dec("184.80"));
    }

    #[test]
    fn test_flagged_surcharge_is_added() {
        let shipment = ShipmentRequest::new(dec("5"), ServiceType::Express)
            .with_route(dec("100"), "2000", "3000")
            .with_flag("fragile");
        let result = calculate_base_price(&shipment, &express_rule(), 1).unwrap();

        assert_eq!(result.pricing.surcharges.len(), 2);
        assert_eq!(result.pricing.total_surcharges, dec("21.30"));
        assert_eq!(result.pricing.total_base_price, dec("189.30"));
    }

    #[test]
    fn test_audit_steps_are_sequenced() {
        let shipment = ShipmentRequest::new(dec("5"), ServiceType::Standard);
        let result = calculate_base_price(&shipment, &standard_rule(), 3).unwrap();

        let ids: Vec<&str> = result.audit_steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["weight_normalization", "zone_multiplier", "base_cost", "surcharges"]);

        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_total_rounds_to_two_decimals() {
        let mut rule = standard_rule();
        rule.per_kg_rate = dec("3.333");
        // 20 + 1.5 x 3.333 = 24.9995 -> 25.00
        let shipment = ShipmentRequest::new(dec("1.5"), ServiceType::Standard);
        let result = calculate_base_price(&shipment, &rule, 1).unwrap();

        assert_eq!(result.pricing.weight_cost, dec("4.9995"));
        assert_eq!(result.pricing.subtotal, dec("24.9995"));
        assert_eq!(result.pricing.total_base_price, dec("25.00"));
    }

    #[test]
    fn test_only_total_is_rounded() {
        let mut rule = standard_rule();
        rule.base_fee = Decimal::ZERO;
        rule.per_kg_rate = dec("2.5");
        rule.per_km_rate = dec("2.5");
        // 2.5025 + 2.5025 = 5.005 -> 5.01; rounding each term first would give 5.00
        let shipment = ShipmentRequest::new(dec("1.001"), ServiceType::Standard)
            .with_route(dec("1.001"), "2000", "3000");
        let result = calculate_base_price(&shipment, &rule, 1).unwrap();

        assert_eq!(result.pricing.weight_cost, dec("2.5025"));
        assert_eq!(result.pricing.distance_cost, dec("2.5025"));
        assert_eq!(result.pricing.total_base_price, dec("5.01"));
    }

    #[test]
    fn test_overflow_is_a_calculation_error() {
        // Weight cost and subtotal fit; adding the 10% fuel surcharge does not
        let shipment = ShipmentRequest::new(dec("5400000000000000000000000000"), ServiceType::Express)
            .with_route(Decimal::ZERO, "2000", "3000");
        let result = calculate_base_price(&shipment, &express_rule(), 1);

        match result {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("overflowed"), "unexpected message: {message}");
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_percentage_surcharge_overflow_is_a_calculation_error() {
        let mut rule = express_rule();
        rule.surcharges[0].charge = SurchargeCharge::Percentage {
            percent: dec("1000000"),
        };
        let shipment = ShipmentRequest::new(dec("1000000000000000000000000"), ServiceType::Express);
        let result = calculate_base_price(&shipment, &rule, 1);

        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_service_type_mismatch_is_a_calculation_error() {
        let shipment = ShipmentRequest::new(dec("5"), ServiceType::Express);
        let result = calculate_base_price(&shipment, &standard_rule(), 1);
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_invalid_weight_propagates() {
        let shipment = ShipmentRequest::new(Decimal::ZERO, ServiceType::Standard);
        let result = calculate_base_price(&shipment, &standard_rule(), 1);
        assert!(matches!(result, Err(EngineError::InvalidWeight { .. })));
    }
}
