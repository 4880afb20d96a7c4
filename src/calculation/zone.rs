//! Zone multiplier lookup.
//!
//! A pricing rule carries a table of zone multipliers keyed by origin and
//! destination postal prefixes. The most specific matching entry wins; when
//! nothing matches the multiplier is 1.0. Lookup never fails.

use rust_decimal::Decimal;

use crate::config::ZoneRate;
use crate::models::CalculationStep;

/// The outcome of a zone lookup.
#[derive(Debug, Clone)]
pub struct ZoneLookupResult {
    /// The multiplier to apply to the subtotal.
    pub multiplier: Decimal,
    /// The matched zone's name, if the entry had one.
    pub zone_name: Option<String>,
    /// The audit step recording this lookup.
    pub audit_step: CalculationStep,
}

/// Finds the best zone entry for an origin and destination.
///
/// An entry matches when the origin postal code starts with its
/// `origin_prefix` and the destination starts with its `destination_prefix`
/// (an empty prefix matches anything). The entry with the longest combined
/// prefix wins; ties go to the entry listed first.
pub fn find_zone<'a>(zones: &'a [ZoneRate], origin: &str, destination: &str) -> Option<&'a ZoneRate> {
    let origin = origin.trim();
    let destination = destination.trim();

    zones
        .iter()
        .filter(|z| origin.starts_with(&z.origin_prefix) && destination.starts_with(&z.destination_prefix))
        .rev()
        .max_by_key(|z| z.origin_prefix.len() + z.destination_prefix.len())
}

/// Looks up the zone multiplier for a route.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::lookup_zone_multiplier;
/// use delivery_pricing::config::ZoneRate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let zones = vec![ZoneRate {
///     name: Some("interstate".to_string()),
///     origin_prefix: "2".to_string(),
///     destination_prefix: "3".to_string(),
///     multiplier: Decimal::from_str("1.2").unwrap(),
/// }];
///
/// let hit = lookup_zone_multiplier(&zones, "2000", "3000", 1);
/// assert_eq!(hit.multiplier, Decimal::from_str("1.2").unwrap());
///
/// let miss = lookup_zone_multiplier(&zones, "4000", "3000", 1);
/// assert_eq!(miss.multiplier, Decimal::ONE);
/// ```
pub fn lookup_zone_multiplier(
    zones: &[ZoneRate],
    origin: &str,
    destination: &str,
    step_number: u32,
) -> ZoneLookupResult {
    let matched = find_zone(zones, origin, destination);

    let (multiplier, zone_name, reasoning) = match matched {
        Some(zone) => (
            zone.multiplier,
            zone.name.clone(),
            format!(
                "Route {} -> {} matched zone {}->{} with multiplier {}",
                origin,
                destination,
                display_prefix(&zone.origin_prefix),
                display_prefix(&zone.destination_prefix),
                zone.multiplier.normalize()
            ),
        ),
        None => (
            Decimal::ONE,
            None,
            format!(
                "No zone entry for route {} -> {} - using multiplier 1",
                origin, destination
            ),
        ),
    };

    let audit_step = CalculationStep {
        step_number,
        rule_id: "zone_multiplier".to_string(),
        rule_name: "Zone Multiplier".to_string(),
        input: serde_json::json!({
            "origin": origin,
            "destination": destination,
            "zone_entries": zones.len()
        }),
        output: serde_json::json!({
            "multiplier": multiplier.normalize().to_string(),
            "zone_name": zone_name,
            "matched": matched.is_some()
        }),
        reasoning,
    };

    ZoneLookupResult {
        multiplier,
        zone_name,
        audit_step,
    }
}

fn display_prefix(prefix: &str) -> &str {
    if prefix.is_empty() { "*" } else { prefix }
}
