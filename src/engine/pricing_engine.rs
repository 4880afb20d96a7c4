//! The comparison orchestrator.
//!
//! [`PricingEngine`] resolves the candidate couriers for a shipment, prices
//! each of them concurrently and ranks the results. A courier that cannot be
//! priced is excluded with a reason; only a comparison with no priced courier
//! at all fails.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_base_price, rank_quotes};
use crate::config::{Courier, EngineSettings, PricingConfigProvider};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BasePriceQuote, ComparisonResult, ExcludedCourier, ExclusionReason, PriceQuote,
    ShipmentRequest,
};

use super::courier_pricing::price_courier;

/// Version stamped on every comparison result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prices shipments against the configuration exposed by a provider.
#[derive(Clone)]
pub struct PricingEngine {
    provider: Arc<dyn PricingConfigProvider>,
    settings: EngineSettings,
}

impl std::fmt::Debug for PricingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingEngine")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PricingEngine {
    /// Creates an engine over the given provider.
    pub fn new(provider: Arc<dyn PricingConfigProvider>, settings: EngineSettings) -> Self {
        Self { provider, settings }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Computes one courier's base price, without merchant markup.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`] for a non-positive weight or negative distance
    /// - [`EngineError::CourierNotFound`] if the courier is unknown or inactive
    /// - [`EngineError::PricingRuleNotFound`] if the courier has no active rule
    ///   for the service type
    /// - any error raised by the provider
    pub async fn get_base_price(
        &self,
        courier_id: &str,
        shipment: &ShipmentRequest,
    ) -> EngineResult<BasePriceQuote> {
        shipment.validate()?;

        let courier = self
            .provider
            .get_courier(courier_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| EngineError::CourierNotFound {
                courier_id: courier_id.to_string(),
            })?;

        let rule = self
            .provider
            .get_pricing_rule(courier_id, shipment.service_type)
            .await?
            .ok_or_else(|| EngineError::PricingRuleNotFound {
                courier_id: courier_id.to_string(),
                service_type: shipment.service_type,
            })?;

        let base = calculate_base_price(shipment, &rule, 1)?;

        debug!(
            courier_id = %courier.id,
            service_type = %shipment.service_type,
            total_base_price = %base.pricing.total_base_price,
            "Base price calculated"
        );

        Ok(BasePriceQuote {
            courier_id: courier.id,
            courier_name: courier.name,
            service_type: shipment.service_type,
            weight_details: base.weight_details,
            base_pricing: base.pricing,
            currency: rule.currency,
            calculation_breakdown: base.audit_steps,
        })
    }

    /// Prices the shipment across the candidate couriers and ranks the quotes.
    ///
    /// `now` stamps `calculated_at`; `valid_until` is `now` plus the
    /// configured validity window.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidInput`] for invalid shipment fields
    /// - [`EngineError::ConfigurationUnavailable`] if active couriers cannot be listed
    /// - [`EngineError::NoPricingAvailable`] if every candidate was excluded
    pub async fn compare(
        &self,
        shipment: &ShipmentRequest,
        merchant_id: Option<&str>,
        now: DateTime<Utc>,
    ) -> EngineResult<ComparisonResult> {
        shipment.validate_for_comparison()?;

        let start_time = Instant::now();
        let comparison_id = Uuid::new_v4();

        let (candidates, mut excluded) = self.resolve_candidates(merchant_id).await?;
        let couriers_considered = candidates.len() + excluded.len();

        let (quotes, failed) = self
            .price_candidates(candidates, shipment, merchant_id)
            .await;
        excluded.extend(failed);
        excluded.sort_by(|a, b| a.courier_id.cmp(&b.courier_id));

        for exclusion in &excluded {
            warn!(
                comparison_id = %comparison_id,
                courier_id = %exclusion.courier_id,
                reason = ?exclusion.reason,
                "Courier excluded from comparison"
            );
        }

        let couriers_priced = quotes.len();
        let Some(ranking) = rank_quotes(quotes) else {
            warn!(
                comparison_id = %comparison_id,
                service_type = %shipment.service_type,
                excluded = excluded.len(),
                "No courier could be priced"
            );
            return Err(EngineError::NoPricingAvailable {
                service_type: shipment.service_type,
                excluded: excluded.len(),
            });
        };

        let valid_until = TimeDelta::try_hours(self.settings.quote_validity_hours)
            .and_then(|validity| now.checked_add_signed(validity))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!(
                    "quote validity of {} hours is out of range",
                    self.settings.quote_validity_hours
                ),
            })?;

        // rank_quotes returned Some, so there is a rank 1 quote
        let cheapest_courier_id = ranking
            .quotes
            .first()
            .map(|q| q.quote.courier_id.clone())
            .unwrap_or_default();

        info!(
            comparison_id = %comparison_id,
            service_type = %shipment.service_type,
            couriers_priced,
            couriers_excluded = excluded.len(),
            cheapest_courier = %cheapest_courier_id,
            cheapest_price = %ranking.price_range.min,
            duration_us = start_time.elapsed().as_micros(),
            "Comparison completed"
        );

        Ok(ComparisonResult {
            comparison_id,
            engine_version: ENGINE_VERSION.to_string(),
            service_type: shipment.service_type,
            merchant_id: merchant_id.map(str::to_string),
            quotes: ranking.quotes,
            cheapest_courier_id,
            price_range: ranking.price_range,
            excluded,
            couriers_considered,
            couriers_priced,
            calculated_at: now,
            valid_until,
        })
    }

    /// Returns the couriers to price and the ones excluded up front.
    ///
    /// A merchant with a non-empty selection narrows the candidates to the
    /// selected ids. Otherwise every active courier is a candidate.
    async fn resolve_candidates(
        &self,
        merchant_id: Option<&str>,
    ) -> EngineResult<(Vec<Courier>, Vec<ExcludedCourier>)> {
        if let Some(merchant_id) = merchant_id {
            match self.provider.merchant_selection(merchant_id).await {
                Ok(selection) if !selection.is_empty() => {
                    return Ok(self.resolve_selection(selection).await);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(
                        merchant_id = %merchant_id,
                        error = %err,
                        "Merchant courier selection unavailable, using all active couriers"
                    );
                }
            }
        }

        let couriers = self.provider.active_couriers().await.map_err(|err| match err {
            EngineError::ConfigurationUnavailable { .. } => err,
            other => EngineError::ConfigurationUnavailable {
                message: other.to_string(),
            },
        })?;
        Ok((couriers, Vec::new()))
    }

    async fn resolve_selection(
        &self,
        selection: Vec<String>,
    ) -> (Vec<Courier>, Vec<ExcludedCourier>) {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut excluded = Vec::new();

        for courier_id in selection {
            if !seen.insert(courier_id.clone()) {
                continue;
            }
            let reason = match self.provider.get_courier(&courier_id).await {
                Ok(Some(courier)) if courier.is_active => {
                    candidates.push(courier);
                    continue;
                }
                Ok(Some(_)) => ExclusionReason::CourierInactive,
                Ok(None) => ExclusionReason::UnknownCourier,
                Err(err) => ExclusionReason::ConfigurationUnavailable {
                    message: err.to_string(),
                },
            };
            excluded.push(ExcludedCourier { courier_id, reason });
        }

        (candidates, excluded)
    }

    /// Prices every candidate on its own task with a per-courier timeout.
    async fn price_candidates(
        &self,
        candidates: Vec<Courier>,
        shipment: &ShipmentRequest,
        merchant_id: Option<&str>,
    ) -> (Vec<PriceQuote>, Vec<ExcludedCourier>) {
        let shipment = Arc::new(shipment.clone());
        let merchant_id: Option<Arc<str>> = merchant_id.map(Arc::from);
        let timeout_ms = self.settings.per_courier_timeout_ms;
        let per_courier_timeout = Duration::from_millis(timeout_ms);

        let mut handles = Vec::with_capacity(candidates.len());
        for courier in candidates {
            let provider = Arc::clone(&self.provider);
            let shipment = Arc::clone(&shipment);
            let merchant_id = merchant_id.clone();
            let courier_id = courier.id.clone();

            let handle = tokio::spawn(async move {
                let pricing = price_courier(
                    provider.as_ref(),
                    &courier,
                    &shipment,
                    merchant_id.as_deref(),
                );
                match timeout(per_courier_timeout, pricing).await {
                    Ok(result) => result,
                    Err(_) => Err(ExclusionReason::TimedOut { timeout_ms }),
                }
            });
            handles.push((courier_id, handle));
        }

        let mut quotes = Vec::new();
        let mut excluded = Vec::new();

        for (courier_id, handle) in handles {
            match handle.await {
                Ok(Ok(quote)) => {
                    debug!(
                        courier_id = %quote.courier_id,
                        total_base_price = %quote.base_pricing.total_base_price,
                        final_price = %quote.final_price(),
                        "Courier priced"
                    );
                    quotes.push(quote);
                }
                Ok(Err(reason)) => excluded.push(ExcludedCourier { courier_id, reason }),
                Err(err) => excluded.push(ExcludedCourier {
                    courier_id,
                    reason: ExclusionReason::TaskFailed {
                        message: err.to_string(),
                    },
                }),
            }
        }

        (quotes, excluded)
    }
}
