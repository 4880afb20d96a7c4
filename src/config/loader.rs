//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading pricing
//! configurations from YAML files.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::types::{
    CourierCatalog, CourierPricingRule, EngineSettings, MarkupPoliciesFile, PricingConfig,
    PricingRulesFile, SelectionsFile, SurchargeCharge,
};

/// Loads and provides access to pricing configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory and
/// validates them before any shipment is priced.
///
/// # Directory Structure
///
/// ```text
/// config/pricing/
/// ├── couriers.yaml          # Courier catalog
/// ├── markup_policies.yaml   # Merchant markup policies (optional)
/// ├── selections.yaml        # Merchant courier selections (optional)
/// ├── engine.yaml            # Engine settings (optional)
/// └── rules/
///     └── swift.yaml         # Pricing rules, any number of files
/// ```
///
/// # Example
///
/// ```no_run
/// use delivery_pricing::config::ConfigLoader;
/// use delivery_pricing::models::ServiceType;
///
/// let loader = ConfigLoader::load("./config/pricing").unwrap();
/// let rule = loader.config().active_rule("swift", ServiceType::Standard);
/// println!("Swift standard rule present: {}", rule.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PricingConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `couriers.yaml` or the `rules` directory is missing
    /// - Any file contains invalid YAML
    /// - The loaded data fails validation (see [`ConfigLoader::from_config`])
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let catalog = Self::load_yaml::<CourierCatalog>(&path.join("couriers.yaml"))?;
        let rules = Self::load_rules(&path.join("rules"))?;
        let policies =
            Self::load_optional_yaml::<MarkupPoliciesFile>(&path.join("markup_policies.yaml"))?;
        let selections = Self::load_optional_yaml::<SelectionsFile>(&path.join("selections.yaml"))?;
        let settings = Self::load_optional_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        let config = PricingConfig::new(
            catalog.couriers,
            rules,
            policies.policies,
            selections.selections,
            settings,
        );

        Self::from_config(config, &path.display().to_string())
    }

    /// Wraps an already-built configuration after validating it.
    ///
    /// Validation rejects:
    /// - more than one active rule per courier and service type
    /// - rules for couriers missing from the catalog
    /// - negative fees, rates or fixed surcharges
    /// - non-positive volumetric divisors and zone multipliers
    /// - policies whose `min_price` exceeds `max_price`
    pub fn from_config(config: PricingConfig, origin: &str) -> EngineResult<Self> {
        Self::validate(&config).map_err(|message| EngineError::ConfigParseError {
            path: origin.to_string(),
            message,
        })?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads a YAML file, falling back to the type's default when absent.
    fn load_optional_yaml<T: serde::de::DeserializeOwned + Default>(
        path: &Path,
    ) -> EngineResult<T> {
        if path.exists() {
            Self::load_yaml(path)
        } else {
            Ok(T::default())
        }
    }

    /// Loads all rule files from the rules directory.
    fn load_rules(rules_dir: &Path) -> EngineResult<Vec<CourierPricingRule>> {
        let rules_dir_str = rules_dir.display().to_string();

        if !rules_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rules_dir_str,
            });
        }

        let entries = fs::read_dir(rules_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rules_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rules_dir_str.clone(),
            })?;
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                paths.push(path);
            }
        }
        // read_dir order is platform dependent
        paths.sort();

        let mut rules = Vec::new();
        for path in &paths {
            rules.extend(Self::load_yaml::<PricingRulesFile>(path)?.rules);
        }

        if rules.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rule files found)", rules_dir_str),
            });
        }

        Ok(rules)
    }

    fn validate(config: &PricingConfig) -> Result<(), String> {
        let mut active_keys = HashSet::new();

        for rule in config.rules() {
            let key = format!("{}/{}", rule.courier_id, rule.service_type);

            if !config.couriers().contains_key(&rule.courier_id) {
                return Err(format!("rule {} references an unknown courier", key));
            }
            if rule.is_active && !active_keys.insert(key.clone()) {
                return Err(format!("more than one active rule for {}", key));
            }
            if rule.base_fee < Decimal::ZERO
                || rule.per_kg_rate < Decimal::ZERO
                || rule.per_km_rate < Decimal::ZERO
            {
                return Err(format!("rule {} has a negative fee or rate", key));
            }
            if rule.volumetric_divisor <= Decimal::ZERO {
                return Err(format!("rule {} has a non-positive volumetric divisor", key));
            }
            if let Some(zone) = rule.zones.iter().find(|z| z.multiplier <= Decimal::ZERO) {
                return Err(format!(
                    "rule {} has a non-positive multiplier for zone {}->{}",
                    key, zone.origin_prefix, zone.destination_prefix
                ));
            }
            for surcharge in &rule.surcharges {
                let negative = match &surcharge.charge {
                    SurchargeCharge::Fixed { amount } => *amount < Decimal::ZERO,
                    SurchargeCharge::Percentage { percent } => *percent < Decimal::ZERO,
                };
                if negative {
                    return Err(format!(
                        "rule {} has a negative surcharge '{}'",
                        key, surcharge.name
                    ));
                }
            }
        }

        for policy in config.policies() {
            if let (Some(min), Some(max)) = (policy.min_price, policy.max_price) {
                if min > max {
                    return Err(format!(
                        "markup policy for merchant {} has min_price {} above max_price {}",
                        policy.merchant_id, min, max
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns the underlying pricing configuration.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> EngineSettings {
        self.config.settings()
    }
}
