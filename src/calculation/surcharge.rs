//! Surcharge evaluation.
//!
//! Each surcharge rule pairs a charge (fixed amount or percentage of the
//! subtotal) with an applicability predicate evaluated against the shipment.
//! Applied surcharges are recorded by name and amount.

use rust_decimal::Decimal;

use crate::config::{SurchargeCharge, SurchargeCondition, SurchargeRule};
use crate::error::{EngineError, EngineResult};
use crate::models::{AppliedSurcharge, CalculationStep, ShipmentRequest};

/// The outcome of evaluating a rule's surcharges.
#[derive(Debug, Clone)]
pub struct SurchargeResult {
    /// Surcharges that applied, in rule order.
    pub applied: Vec<AppliedSurcharge>,
    /// Sum of all applied amounts.
    pub total: Decimal,
    /// The audit step recording this evaluation.
    pub audit_step: CalculationStep,
}

/// Returns true if the condition holds for the shipment.
///
/// # Arguments
///
/// * `condition` - The applicability predicate
/// * `shipment` - The shipment being priced
/// * `chargeable_weight` - The normalized weight used for weight thresholds
pub fn surcharge_applies(
    condition: &SurchargeCondition,
    shipment: &ShipmentRequest,
    chargeable_weight: Decimal,
) -> bool {
    match condition {
        SurchargeCondition::Always => true,
        SurchargeCondition::RemoteArea {
            destination_prefixes,
        } => {
            let destination = shipment.destination_postal_code.trim();
            !destination.is_empty()
                && destination_prefixes
                    .iter()
                    .any(|p| !p.is_empty() && destination.starts_with(p.as_str()))
        }
        SurchargeCondition::Flag { flag } => shipment.has_flag(flag),
        SurchargeCondition::WeightAbove { kg } => chargeable_weight > *kg,
        SurchargeCondition::DistanceAbove { km } => shipment.distance_km > *km,
    }
}

/// Computes the amount a surcharge adds. The amount is kept exact; rounding
/// happens once on the total base price.
///
/// # Errors
///
/// Returns `CalculationError` if a percentage charge overflows.
pub fn surcharge_amount(charge: &SurchargeCharge, subtotal: Decimal) -> EngineResult<Decimal> {
    match charge {
        SurchargeCharge::Fixed { amount } => Ok(*amount),
        SurchargeCharge::Percentage { percent } => percent
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|rate| subtotal.checked_mul(rate))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("{}% surcharge on {} overflowed", percent, subtotal),
            }),
    }
}

/// Evaluates every surcharge rule against a shipment.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::evaluate_surcharges;
/// use delivery_pricing::config::{SurchargeCharge, SurchargeCondition, SurchargeRule};
/// use delivery_pricing::models::{ServiceType, ShipmentRequest};
/// use rust_decimal::Decimal;
///
/// let rules = vec![SurchargeRule {
///     name: "fuel".to_string(),
///     charge: SurchargeCharge::Percentage { percent: Decimal::from(10) },
///     applies_when: SurchargeCondition::Always,
/// }];
/// let shipment = ShipmentRequest::new(Decimal::from(1), ServiceType::Standard);
///
/// let result = evaluate_surcharges(&rules, &shipment, Decimal::from(1), Decimal::from(150), 1).unwrap();
/// assert_eq!(result.total, Decimal::from(15));
/// ```
pub fn evaluate_surcharges(
    rules: &[SurchargeRule],
    shipment: &ShipmentRequest,
    chargeable_weight: Decimal,
    subtotal: Decimal,
    step_number: u32,
) -> EngineResult<SurchargeResult> {
    let applied = rules
        .iter()
        .filter(|rule| surcharge_applies(&rule.applies_when, shipment, chargeable_weight))
        .map(|rule| {
            Ok(AppliedSurcharge {
                name: rule.name.clone(),
                amount: surcharge_amount(&rule.charge, subtotal)?,
            })
        })
        .collect::<EngineResult<Vec<AppliedSurcharge>>>()?;

    let total = applied
        .iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.amount))
        .ok_or_else(|| EngineError::CalculationError {
            message: "surcharge total overflowed".to_string(),
        })?;

    let reasoning = if applied.is_empty() {
        format!("None of {} surcharge rules applied", rules.len())
    } else {
        let terms: Vec<String> = applied
            .iter()
            .map(|s| format!("{} ${}", s.name, s.amount))
            .collect();
        format!("{} = ${}", terms.join(" + "), total)
    };

    let audit_step = CalculationStep {
        step_number,
        rule_id: "surcharges".to_string(),
        rule_name: "Surcharges".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.to_string(),
            "rules_evaluated": rules.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            "surcharge_flags": shipment.surcharge_flags
        }),
        output: serde_json::json!({
            "applied": applied
                .iter()
                .map(|s| serde_json::json!({ "name": s.name, "amount": s.amount.to_string() }))
                .collect::<Vec<_>>(),
            "total_surcharges": total.to_string()
        }),
        reasoning,
    };

    Ok(SurchargeResult {
        applied,
        total,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rule(name: &str, charge: SurchargeCharge, applies_when: SurchargeCondition) -> SurchargeRule {
        SurchargeRule {
            name: name.to_string(),
            charge,
            applies_when,
        }
    }

    fn shipment_to(destination: &str) -> ShipmentRequest {
        ShipmentRequest::new(dec("5"), ServiceType::Standard).with_route(dec("120"), "2000", destination)
    }

    #[test]
    fn test_always_on_fixed_surcharge() {
        let rules = vec![rule(
            "fuel",
            SurchargeCharge::Fixed { amount: dec("2.50") },
            SurchargeCondition::Always,
        )];
        let result = evaluate_surcharges(&rules, &shipment_to("3000"), dec("5"), dec("70"), 4).unwrap();

        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].name, "fuel");
        assert_eq!(result.total, dec("2.50"));
        assert_eq!(result.audit_step.step_number, 4);
    }

    #[test]
    fn test_percentage_surcharge_uses_subtotal() {
        let rules = vec![rule(
            "fuel",
            SurchargeCharge::Percentage { percent: dec("12.5") },
            SurchargeCondition::Always,
        )];
        let result = evaluate_surcharges(&rules, &shipment_to("3000"), dec("5"), dec("70"), 1).unwrap();

        // 70 * 12.5% = 8.75
        assert_eq!(result.total, dec("8.75"));
    }

    #[test]
    fn test_percentage_surcharge_is_not_rounded() {
        let charge = SurchargeCharge::Percentage { percent: dec("5") };
        assert_eq!(surcharge_amount(&charge, dec("10.05")).unwrap(), dec("0.5025"));
        assert_eq!(surcharge_amount(&charge, dec("10.10")).unwrap(), dec("0.505"));
    }

    #[test]
    fn test_percentage_surcharge_overflow() {
        let charge = SurchargeCharge::Percentage { percent: dec("1000") };
        let result = surcharge_amount(&charge, Decimal::MAX);
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_surcharge_total_overflow() {
        let rules = vec![
            rule(
                "first",
                SurchargeCharge::Fixed { amount: Decimal::MAX },
                SurchargeCondition::Always,
            ),
            rule(
                "second",
                SurchargeCharge::Fixed { amount: Decimal::MAX },
                SurchargeCondition::Always,
            ),
        ];
        let result = evaluate_surcharges(&rules, &shipment_to("3000"), dec("5"), dec("70"), 1);
        assert!(matches!(result, Err(EngineError::CalculationError { .. })));
    }

    #[test]
    fn test_remote_area_matches_destination_prefix() {
        let condition = SurchargeCondition::RemoteArea {
            destination_prefixes: vec!["08".to_string(), "6".to_string()],
        };
        assert!(surcharge_applies(&condition, &shipment_to("0870"), dec("5")));
        assert!(surcharge_applies(&condition, &shipment_to("6000"), dec("5")));
        assert!(!surcharge_applies(&condition, &shipment_to("3000"), dec("5")));
        assert!(!surcharge_applies(&condition, &shipment_to(""), dec("5")));
    }

    #[test]
    fn test_flag_surcharge_requires_caller_flag() {
        let condition = SurchargeCondition::Flag {
            flag: "fragile".to_string(),
        };
        let plain = shipment_to("3000");
        let fragile = shipment_to("3000").with_flag("FRAGILE");

        assert!(!surcharge_applies(&condition, &plain, dec("5")));
        assert!(surcharge_applies(&condition, &fragile, dec("5")));
    }

    #[test]
    fn test_weight_threshold_is_exclusive() {
        let condition = SurchargeCondition::WeightAbove { kg: dec("20") };
        let shipment = shipment_to("3000");
        assert!(!surcharge_applies(&condition, &shipment, dec("20")));
        assert!(surcharge_applies(&condition, &shipment, dec("20.001")));
    }

    #[test]
    fn test_distance_threshold() {
        let condition = SurchargeCondition::DistanceAbove { km: dec("100") };
        assert!(surcharge_applies(&condition, &shipment_to("3000"), dec("5")));

        let short = ShipmentRequest::new(dec("5"), ServiceType::Standard).with_route(dec("100"), "2000", "2001");
        assert!(!surcharge_applies(&condition, &short, dec("5")));
    }

    #[test]
    fn test_mixed_surcharges_sum() {
        let rules = vec![
            rule(
                "fuel",
                SurchargeCharge::Percentage { percent: dec("10") },
                SurchargeCondition::Always,
            ),
            rule(
                "remote_area",
                SurchargeCharge::Fixed { amount: dec("15") },
                SurchargeCondition::RemoteArea {
                    destination_prefixes: vec!["08".to_string()],
                },
            ),
            rule(
                "heavy",
                SurchargeCharge::Fixed { amount: dec("10") },
                SurchargeCondition::WeightAbove { kg: dec("30") },
            ),
        ];
        let result = evaluate_surcharges(&rules, &shipment_to("0870"), dec("5"), dec("168"), 1).unwrap();

        assert_eq!(result.applied.len(), 2);
        assert_eq!(result.applied[0].amount, dec("16.80"));
        assert_eq!(result.applied[1].amount, dec("15"));
        assert_eq!(result.total, dec("31.80"));
        assert!(result.audit_step.reasoning.contains("remote_area"));
    }

    #[test]
    fn test_no_rules_applied() {
        let result = evaluate_surcharges(&[], &shipment_to("3000"), dec("5"), dec("70"), 1).unwrap();
        assert!(result.applied.is_empty());
        assert_eq!(result.total, Decimal::ZERO);
    }
}
