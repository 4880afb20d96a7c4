//! Read-only access to courier pricing rules and merchant markup settings.
//!
//! The engine never reads configuration directly; it goes through the
//! [`PricingConfigProvider`] trait so that the backing store can be a YAML
//! directory, a database or a remote service. Reads are side-effect free and
//! possibly stale; an `Err` means the source could not answer.

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::ServiceType;

use super::loader::ConfigLoader;
use super::types::{Courier, CourierPricingRule, MerchantMarkupPolicy};

/// Query interface over pricing configuration.
#[async_trait]
pub trait PricingConfigProvider: Send + Sync {
    /// Returns the active pricing rule for a courier and service type.
    async fn get_pricing_rule(
        &self,
        courier_id: &str,
        service_type: ServiceType,
    ) -> EngineResult<Option<CourierPricingRule>>;

    /// Returns the merchant's markup policy that best matches the courier and
    /// service type, resolved with [`resolve_markup_policy`].
    async fn get_markup_policy(
        &self,
        merchant_id: &str,
        courier_id: &str,
        service_type: ServiceType,
    ) -> EngineResult<Option<MerchantMarkupPolicy>>;

    /// Returns a courier from the catalog, active or not.
    async fn get_courier(&self, courier_id: &str) -> EngineResult<Option<Courier>>;

    /// Returns every active courier, ordered by id.
    async fn active_couriers(&self) -> EngineResult<Vec<Courier>>;

    /// Returns the courier ids a merchant selected, empty when the merchant
    /// made no selection.
    async fn merchant_selection(&self, merchant_id: &str) -> EngineResult<Vec<String>>;
}

/// Picks the policy that applies to a merchant, courier and service type.
///
/// Precedence, most specific first: courier and service, courier only,
/// service only, merchant default. Inactive policies and policies of other
/// merchants are ignored. Among equally specific policies the first listed
/// wins.
///
/// # Example
///
/// ```
/// use delivery_pricing::config::{resolve_markup_policy, MerchantMarkupPolicy};
/// use delivery_pricing::models::{MarginType, ServiceType};
/// use rust_decimal::Decimal;
///
/// let default_policy = MerchantMarkupPolicy {
///     merchant_id: "shop_1".to_string(),
///     courier_id: None,
///     service_type: None,
///     margin_type: MarginType::Fixed,
///     margin_value: Decimal::from(2),
///     rounding_increment: None,
///     min_price: None,
///     max_price: None,
///     is_active: true,
/// };
/// let courier_policy = MerchantMarkupPolicy {
///     courier_id: Some("swift".to_string()),
///     margin_value: Decimal::from(5),
///     ..default_policy.clone()
/// };
/// let policies = vec![default_policy, courier_policy];
///
/// let resolved = resolve_markup_policy(&policies, "shop_1", "swift", ServiceType::Express);
/// assert_eq!(resolved.unwrap().margin_value, Decimal::from(5));
///
/// let resolved = resolve_markup_policy(&policies, "shop_1", "parcelco", ServiceType::Express);
/// assert_eq!(resolved.unwrap().margin_value, Decimal::from(2));
/// ```
pub fn resolve_markup_policy<'a>(
    policies: &'a [MerchantMarkupPolicy],
    merchant_id: &str,
    courier_id: &str,
    service_type: ServiceType,
) -> Option<&'a MerchantMarkupPolicy> {
    policies
        .iter()
        .filter(|p| p.matches(merchant_id, courier_id, service_type))
        // max_by_key keeps the last maximum, so iterate in reverse to keep the first
        .rev()
        .max_by_key(|p| p.specificity())
}

#[async_trait]
impl PricingConfigProvider for ConfigLoader {
    async fn get_pricing_rule(
        &self,
        courier_id: &str,
        service_type: ServiceType,
    ) -> EngineResult<Option<CourierPricingRule>> {
        Ok(self.config().active_rule(courier_id, service_type).cloned())
    }

    async fn get_markup_policy(
        &self,
        merchant_id: &str,
        courier_id: &str,
        service_type: ServiceType,
    ) -> EngineResult<Option<MerchantMarkupPolicy>> {
        Ok(resolve_markup_policy(
            self.config().policies(),
            merchant_id,
            courier_id,
            service_type,
        )
        .cloned())
    }

    async fn get_courier(&self, courier_id: &str) -> EngineResult<Option<Courier>> {
        Ok(self.config().couriers().get(courier_id).cloned())
    }

    async fn active_couriers(&self) -> EngineResult<Vec<Courier>> {
        let mut couriers: Vec<Courier> = self
            .config()
            .couriers()
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        couriers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(couriers)
    }

    async fn merchant_selection(&self, merchant_id: &str) -> EngineResult<Vec<String>> {
        Ok(self
            .config()
            .selection(merchant_id)
            .map(<[String]>::to_vec)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarginType;
    use rust_decimal::Decimal;

    fn policy(
        merchant: &str,
        courier: Option<&str>,
        service: Option<ServiceType>,
        value: i64,
    ) -> MerchantMarkupPolicy {
        MerchantMarkupPolicy {
            merchant_id: merchant.to_string(),
            courier_id: courier.map(str::to_string),
            service_type: service,
            margin_type: MarginType::Fixed,
            margin_value: Decimal::from(value),
            rounding_increment: None,
            min_price: None,
            max_price: None,
            is_active: true,
        }
    }

    fn all_levels() -> Vec<MerchantMarkupPolicy> {
        vec![
            policy("shop_1", None, None, 1),
            policy("shop_1", None, Some(ServiceType::Express), 2),
            policy("shop_1", Some("swift"), None, 3),
            policy("shop_1", Some("swift"), Some(ServiceType::Express), 4),
        ]
    }

    fn resolved_value(
        policies: &[MerchantMarkupPolicy],
        courier: &str,
        service: ServiceType,
    ) -> Option<Decimal> {
        resolve_markup_policy(policies, "shop_1", courier, service).map(|p| p.margin_value)
    }

    #[test]
    fn test_courier_and_service_policy_wins() {
        let policies = all_levels();
        assert_eq!(
            resolved_value(&policies, "swift", ServiceType::Express),
            Some(Decimal::from(4))
        );
    }

    #[test]
    fn test_courier_only_beats_service_only() {
        let policies = all_levels();
        assert_eq!(
            resolved_value(&policies, "swift", ServiceType::Economy),
            Some(Decimal::from(3))
        );
    }

    #[test]
    fn test_service_only_beats_merchant_default() {
        let policies = all_levels();
        assert_eq!(
            resolved_value(&policies, "parcelco", ServiceType::Express),
            Some(Decimal::from(2))
        );
    }

    #[test]
    fn test_merchant_default_applies_last() {
        let policies = all_levels();
        assert_eq!(
            resolved_value(&policies, "parcelco", ServiceType::Economy),
            Some(Decimal::from(1))
        );
    }

    #[test]
    fn test_no_policy_for_other_merchant() {
        let policies = vec![policy("shop_2", None, None, 9)];
        assert_eq!(resolved_value(&policies, "swift", ServiceType::Express), None);
    }

    #[test]
    fn test_inactive_policy_is_skipped() {
        let mut specific = policy("shop_1", Some("swift"), None, 7);
        specific.is_active = false;
        let policies = vec![policy("shop_1", None, None, 1), specific];

        assert_eq!(
            resolved_value(&policies, "swift", ServiceType::Express),
            Some(Decimal::from(1))
        );
    }

    #[test]
    fn test_first_listed_wins_among_equals() {
        let policies = vec![
            policy("shop_1", Some("swift"), None, 5),
            policy("shop_1", Some("swift"), None, 6),
        ];
        assert_eq!(
            resolved_value(&policies, "swift", ServiceType::Express),
            Some(Decimal::from(5))
        );
    }

    #[tokio::test]
    async fn test_loader_provider_queries() {
        let loader = ConfigLoader::load("./config/pricing").unwrap();

        let rule = loader
            .get_pricing_rule("swift", ServiceType::Standard)
            .await
            .unwrap();
        assert!(rule.is_some());

        let missing = loader
            .get_pricing_rule("budgetpost", ServiceType::SameDay)
            .await
            .unwrap();
        assert!(missing.is_none());

        let active = loader.active_couriers().await.unwrap();
        let ids: Vec<&str> = active.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["budgetpost", "parcelco", "swift"]);

        let inactive = loader.get_courier("oldfreight").await.unwrap().unwrap();
        assert!(!inactive.is_active);

        let selection = loader.merchant_selection("shop_selective").await.unwrap();
        assert_eq!(selection, vec!["swift".to_string(), "oldfreight".to_string()]);

        assert!(loader.merchant_selection("nobody").await.unwrap().is_empty());
    }
}
