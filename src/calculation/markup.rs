//! Merchant markup application.
//!
//! This module converts a courier's base price into a merchant-specific
//! final price using a [`MerchantMarkupPolicy`]: margin (percentage or
//! fixed), min/max clamping, then rounding to the policy's increment.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::MerchantMarkupPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationStep, FinalPricing, MarginType, MarkupDetails};

/// Returns the rounding increment used when a policy does not set a valid one.
///
/// The increment is 0.01 (one cent).
pub fn default_rounding_increment() -> Decimal {
    Decimal::new(1, 2)
}

/// The result of applying a markup policy, including the audit step.
#[derive(Debug, Clone)]
pub struct MarkupResult {
    /// The margin that was applied.
    pub markup: MarkupDetails,
    /// The final pricing summary.
    pub final_pricing: FinalPricing,
    /// The audit step recording this calculation.
    pub audit_step: CalculationStep,
}

/// Snaps a price to the nearest multiple of `increment`, rounding half-up.
///
/// Midpoints always round toward positive infinity, so `-80.5` becomes `-80`.
/// A zero or negative increment is treated as 0.01.
///
/// # Errors
///
/// Returns `CalculationError` if the value is too large to divide into steps.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::round_to_increment;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// assert_eq!(round_to_increment(dec("80.5"), dec("1.00")).unwrap(), dec("81"));
/// assert_eq!(round_to_increment(dec("80.24"), dec("0.50")).unwrap(), dec("80.00"));
/// assert_eq!(round_to_increment(dec("80.256"), Decimal::ZERO).unwrap(), dec("80.26"));
/// ```
pub fn round_to_increment(value: Decimal, increment: Decimal) -> EngineResult<Decimal> {
    let increment = effective_increment(Some(increment));
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value
        .checked_div(increment)
        .map(|steps| steps.round_dp_with_strategy(0, strategy))
        .and_then(|steps| steps.checked_mul(increment))
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("rounding {} to {} overflowed", value, increment),
        })
}

fn effective_increment(increment: Option<Decimal>) -> Decimal {
    match increment {
        Some(inc) if inc > Decimal::ZERO => inc,
        _ => default_rounding_increment(),
    }
}

/// Applies a merchant markup policy to a base price.
///
/// - Without a policy, or with `margin_type = none`, the price passes through
///   unchanged and `has_markup` is false.
/// - `percentage`: `margin = base_price * margin_value / 100`.
/// - `fixed`: `margin = margin_value`.
/// - The marked-up price is raised to `min_price` and capped at `max_price`;
///   the reported margin reflects the clamped price and may be negative.
/// - A price still below zero is floored at zero.
/// - The result is rounded half-up to `rounding_increment` (default 0.01).
///
/// # Errors
///
/// Returns `CalculationError` only when the decimal arithmetic overflows. A
/// missing policy is never an error.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::apply_markup;
/// use delivery_pricing::config::MerchantMarkupPolicy;
/// use delivery_pricing::models::MarginType;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let policy = MerchantMarkupPolicy {
///     merchant_id: "shop_1".to_string(),
///     courier_id: None,
///     service_type: None,
///     margin_type: MarginType::Percentage,
///     margin_value: Decimal::from(15),
///     rounding_increment: Some(Decimal::from_str("1.00").unwrap()),
///     min_price: None,
///     max_price: None,
///     is_active: true,
/// };
///
/// let result = apply_markup(Decimal::from(70), Some(&policy), 1).unwrap();
/// assert_eq!(result.markup.margin_amount, Decimal::from_str("10.5").unwrap());
/// assert_eq!(result.final_pricing.after_markup, Decimal::from_str("80.5").unwrap());
/// assert_eq!(result.final_pricing.rounded_price, Decimal::from(81));
/// ```
pub fn apply_markup(
    base_price: Decimal,
    policy: Option<&MerchantMarkupPolicy>,
    step_number: u32,
) -> EngineResult<MarkupResult> {
    let Some(policy) = policy.filter(|p| p.margin_type != MarginType::None) else {
        return Ok(no_markup(base_price, policy, step_number));
    };
    let overflow = |term: &str| EngineError::CalculationError {
        message: format!("{} overflowed for merchant {}", term, policy.merchant_id),
    };

    let raw_margin = match policy.margin_type {
        MarginType::Percentage => policy
            .margin_value
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|rate| base_price.checked_mul(rate))
            .ok_or_else(|| overflow("margin"))?,
        MarginType::Fixed => policy.margin_value,
        MarginType::None => Decimal::ZERO,
    };
    let marked_up = base_price
        .checked_add(raw_margin)
        .ok_or_else(|| overflow("marked-up price"))?;

    let mut after_markup = marked_up;
    let mut clamp = None;
    if let Some(min) = policy.min_price {
        if after_markup < min {
            after_markup = min;
            clamp = Some("min_price");
        }
    }
    if let Some(max) = policy.max_price {
        if after_markup > max {
            after_markup = max;
            clamp = Some("max_price");
        }
    }
    if after_markup.is_sign_negative() {
        after_markup = Decimal::ZERO;
        clamp = Some("zero");
    }
    let margin_amount = after_markup
        .checked_sub(base_price)
        .ok_or_else(|| overflow("margin amount"))?;

    let increment = effective_increment(policy.rounding_increment);
    let rounded_price = round_to_increment(after_markup, increment)?;

    let margin_term = match policy.margin_type {
        MarginType::Percentage => format!(
            "${} x {}% = ${}",
            base_price,
            policy.margin_value.normalize(),
            raw_margin.normalize()
        ),
        _ => format!("fixed ${}", raw_margin.normalize()),
    };
    let clamp_term = match clamp {
        Some(bound) => format!(", clamped to {} ${}", bound, after_markup.normalize()),
        None => String::new(),
    };
    let reasoning = format!(
        "Margin {}; ${} + ${} = ${}{}; rounded to {} = ${}",
        margin_term,
        base_price,
        raw_margin.normalize(),
        marked_up.normalize(),
        clamp_term,
        increment.normalize(),
        rounded_price
    );

    let audit_step = CalculationStep {
        step_number,
        rule_id: "merchant_markup".to_string(),
        rule_name: "Merchant Markup".to_string(),
        input: serde_json::json!({
            "base_price": base_price.to_string(),
            "margin_type": policy.margin_type,
            "margin_value": policy.margin_value.to_string(),
            "rounding_increment": increment.to_string(),
            "min_price": policy.min_price.map(|p| p.to_string()),
            "max_price": policy.max_price.map(|p| p.to_string())
        }),
        output: serde_json::json!({
            "margin_amount": margin_amount.to_string(),
            "after_markup": after_markup.to_string(),
            "rounded_price": rounded_price.to_string(),
            "clamped_to": clamp
        }),
        reasoning,
    };

    Ok(MarkupResult {
        markup: MarkupDetails {
            margin_type: policy.margin_type,
            margin_value: policy.margin_value,
            margin_amount,
            has_markup: true,
        },
        final_pricing: FinalPricing {
            before_markup: base_price,
            markup_amount: margin_amount,
            after_markup,
            rounded_price,
        },
        audit_step,
    })
}

fn no_markup(
    base_price: Decimal,
    policy: Option<&MerchantMarkupPolicy>,
    step_number: u32,
) -> MarkupResult {
    let reasoning = match policy {
        Some(p) => format!(
            "Merchant {} policy has no margin - final price is base price ${}",
            p.merchant_id, base_price
        ),
        None => format!("No markup policy - final price is base price ${}", base_price),
    };

    MarkupResult {
        markup: MarkupDetails::none(),
        final_pricing: FinalPricing {
            before_markup: base_price,
            markup_amount: Decimal::ZERO,
            after_markup: base_price,
            rounded_price: base_price,
        },
        audit_step: CalculationStep {
            step_number,
            rule_id: "merchant_markup".to_string(),
            rule_name: "Merchant Markup".to_string(),
            input: serde_json::json!({
                "base_price": base_price.to_string(),
                "policy": policy.map(|p| p.merchant_id.as_str())
            }),
            output: serde_json::json!({
                "rounded_price": base_price.to_string(),
                "has_markup": false
            }),
            reasoning,
        },
    }
}
