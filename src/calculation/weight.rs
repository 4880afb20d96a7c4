//! Weight normalization.
//!
//! Couriers charge by the greater of a parcel's actual weight and its
//! volumetric (dimensional) weight. This module derives both and records the
//! decision as a calculation step.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationStep, Dimensions, WeightDetails};

/// Decimal places kept for volumetric weight (gram precision).
pub const VOLUMETRIC_WEIGHT_DP: u32 = 3;

/// The result of weight normalization, including the weights and audit step.
#[derive(Debug, Clone)]
pub struct WeightNormalizationResult {
    /// Actual, volumetric and chargeable weight.
    pub weight: WeightDetails,
    /// The audit step recording this calculation.
    pub audit_step: CalculationStep,
}

/// Computes volumetric weight as `volume_cm3 / divisor`.
///
/// Returns zero when any dimension is missing or not positive.
///
/// # Errors
///
/// Returns `CalculationError` when the divisor is not positive.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::volumetric_weight;
/// use delivery_pricing::models::Dimensions;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dims = Dimensions::new(Decimal::from(40), Decimal::from(30), Decimal::from(20));
/// let weight = volumetric_weight(Some(&dims), Decimal::from(5000)).unwrap();
/// assert_eq!(weight, Decimal::from_str("4.8").unwrap());
/// ```
pub fn volumetric_weight(dimensions: Option<&Dimensions>, divisor: Decimal) -> EngineResult<Decimal> {
    if divisor <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("volumetric divisor must be positive, got {}", divisor),
        });
    }

    let Some(volume) = dimensions.and_then(Dimensions::volume_cm3) else {
        return Ok(Decimal::ZERO);
    };

    let weight = volume
        .checked_div(divisor)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("volumetric weight overflow for volume {}", volume),
        })?;

    Ok(weight
        .round_dp_with_strategy(VOLUMETRIC_WEIGHT_DP, RoundingStrategy::MidpointAwayFromZero)
        .normalize())
}

/// Normalizes a shipment's weight into a chargeable weight.
///
/// `chargeable_weight = max(actual_weight, volumetric_weight)`.
///
/// # Arguments
///
/// * `actual_weight` - The weight reported by the caller in kilograms
/// * `dimensions` - Optional parcel dimensions; partial dimensions are ignored
/// * `divisor` - Cubic centimetres per volumetric kilogram
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidWeight` when `actual_weight` is not positive, and
/// `CalculationError` when the divisor is not positive.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::normalize_weight;
/// use rust_decimal::Decimal;
///
/// let result = normalize_weight(Decimal::from(5), None, Decimal::from(5000), 1).unwrap();
/// assert_eq!(result.weight.chargeable_weight, Decimal::from(5));
/// assert_eq!(result.weight.volumetric_weight, Decimal::ZERO);
/// ```
pub fn normalize_weight(
    actual_weight: Decimal,
    dimensions: Option<&Dimensions>,
    divisor: Decimal,
    step_number: u32,
) -> EngineResult<WeightNormalizationResult> {
    if actual_weight <= Decimal::ZERO {
        return Err(EngineError::InvalidWeight {
            weight: actual_weight,
        });
    }

    let volumetric = volumetric_weight(dimensions, divisor)?;
    let chargeable = actual_weight.max(volumetric);
    let uses_volumetric = volumetric > actual_weight;

    let reasoning = if volumetric.is_zero() {
        format!(
            "No complete dimensions - chargeable weight is actual weight {}kg",
            actual_weight.normalize()
        )
    } else if uses_volumetric {
        format!(
            "Volumetric weight {}kg exceeds actual weight {}kg - charging volumetric",
            volumetric,
            actual_weight.normalize()
        )
    } else {
        format!(
            "Actual weight {}kg is not below volumetric weight {}kg - charging actual",
            actual_weight.normalize(),
            volumetric
        )
    };

    let audit_step = CalculationStep {
        step_number,
        rule_id: "weight_normalization".to_string(),
        rule_name: "Weight Normalization".to_string(),
        input: serde_json::json!({
            "actual_weight": actual_weight.normalize().to_string(),
            "dimensions": dimensions,
            "volumetric_divisor": divisor.normalize().to_string()
        }),
        output: serde_json::json!({
            "volumetric_weight": volumetric.to_string(),
            "chargeable_weight": chargeable.normalize().to_string(),
            "uses_volumetric": uses_volumetric
        }),
        reasoning,
    };

    Ok(WeightNormalizationResult {
        weight: WeightDetails {
            actual_weight,
            volumetric_weight: volumetric,
            chargeable_weight: chargeable,
        },
        audit_step,
    })
}
