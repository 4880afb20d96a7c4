//! Prices a shipment for a single courier.
//!
//! Every failure is mapped to an [`ExclusionReason`] so that the comparison
//! can drop the courier and carry on with the others.

use crate::calculation::{apply_markup, calculate_base_price};
use crate::config::{Courier, PricingConfigProvider};
use crate::models::{ExclusionReason, PriceQuote, ShipmentRequest};

/// Runs the base price and markup pipeline for one courier.
pub(crate) async fn price_courier(
    provider: &dyn PricingConfigProvider,
    courier: &Courier,
    shipment: &ShipmentRequest,
    merchant_id: Option<&str>,
) -> Result<PriceQuote, ExclusionReason> {
    let rule = provider
        .get_pricing_rule(&courier.id, shipment.service_type)
        .await
        .map_err(|e| ExclusionReason::ConfigurationUnavailable {
            message: e.to_string(),
        })?
        .ok_or(ExclusionReason::NoPricingRule)?;

    let base = calculate_base_price(shipment, &rule, 1).map_err(|e| {
        ExclusionReason::CalculationFault {
            message: e.to_string(),
        }
    })?;

    let policy = match merchant_id {
        Some(merchant_id) => provider
            .get_markup_policy(merchant_id, &courier.id, shipment.service_type)
            .await
            .map_err(|e| ExclusionReason::ConfigurationUnavailable {
                message: e.to_string(),
            })?,
        None => None,
    };

    let mut calculation_breakdown = base.audit_steps;
    let markup_step = calculation_breakdown.len() as u32 + 1;
    let markup = apply_markup(base.pricing.total_base_price, policy.as_ref(), markup_step)
        .map_err(|e| ExclusionReason::CalculationFault {
            message: e.to_string(),
        })?;
    calculation_breakdown.push(markup.audit_step);

    Ok(PriceQuote {
        courier_id: courier.id.clone(),
        courier_name: courier.name.clone(),
        service_type: shipment.service_type,
        base_pricing: base.pricing,
        weight_details: base.weight_details,
        markup: markup.markup,
        final_pricing: markup.final_pricing,
        currency: rule.currency,
        calculation_breakdown,
    })
}
