//! Shipment request model and related types.
//!
//! This module defines the [`ShipmentRequest`] a caller submits for pricing,
//! together with the [`ServiceType`] enum and optional parcel [`Dimensions`].

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The delivery service level requested for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Expedited delivery, typically next business day.
    Express,
    /// Regular delivery.
    Standard,
    /// Cheapest, slowest delivery.
    Economy,
    /// Delivered on the day of pickup.
    SameDay,
    /// Delivered within a caller-chosen time slot.
    Scheduled,
    /// Delivered overnight.
    Overnight,
}

impl ServiceType {
    /// All service types, in declaration order.
    pub const ALL: [ServiceType; 6] = [
        ServiceType::Express,
        ServiceType::Standard,
        ServiceType::Economy,
        ServiceType::SameDay,
        ServiceType::Scheduled,
        ServiceType::Overnight,
    ];

    /// Returns the wire name of the service type (e.g. `"same_day"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Express => "express",
            ServiceType::Standard => "standard",
            ServiceType::Economy => "economy",
            ServiceType::SameDay => "same_day",
            ServiceType::Scheduled => "scheduled",
            ServiceType::Overnight => "overnight",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ServiceType::ALL
            .into_iter()
            .find(|st| st.as_str() == normalized)
            .ok_or_else(|| {
                EngineError::invalid_input("service_type", format!("unknown service type '{}'", s))
            })
    }
}

/// Parcel dimensions in centimetres.
///
/// Each dimension is optional. Volumetric weight is only derived when all
/// three are present and positive; partial dimensions are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in centimetres.
    #[serde(default)]
    pub length_cm: Option<Decimal>,
    /// Width in centimetres.
    #[serde(default)]
    pub width_cm: Option<Decimal>,
    /// Height in centimetres.
    #[serde(default)]
    pub height_cm: Option<Decimal>,
}

impl Dimensions {
    /// Creates a fully specified set of dimensions.
    pub fn new(length_cm: Decimal, width_cm: Decimal, height_cm: Decimal) -> Self {
        Self {
            length_cm: Some(length_cm),
            width_cm: Some(width_cm),
            height_cm: Some(height_cm),
        }
    }

    /// Returns the parcel volume in cubic centimetres when all three
    /// dimensions are present and greater than zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use delivery_pricing::models::Dimensions;
    /// use rust_decimal::Decimal;
    ///
    /// let dims = Dimensions::new(Decimal::from(40), Decimal::from(30), Decimal::from(20));
    /// assert_eq!(dims.volume_cm3(), Some(Decimal::from(24000)));
    ///
    /// let partial = Dimensions { length_cm: Some(Decimal::from(40)), ..Default::default() };
    /// assert_eq!(partial.volume_cm3(), None);
    /// ```
    pub fn volume_cm3(&self) -> Option<Decimal> {
        let (l, w, h) = (self.length_cm?, self.width_cm?, self.height_cm?);
        if l <= Decimal::ZERO || w <= Decimal::ZERO || h <= Decimal::ZERO {
            return None;
        }
        l.checked_mul(w)?.checked_mul(h)
    }
}

/// A shipment to be priced.
///
/// Requests are ephemeral: they are supplied by the caller, validated, priced
/// and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    /// Actual weight in kilograms. Must be greater than zero.
    pub actual_weight_kg: Decimal,
    /// Optional parcel dimensions.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Delivery distance in kilometres. Must not be negative.
    #[serde(default)]
    pub distance_km: Decimal,
    /// Origin postal code.
    #[serde(default)]
    pub origin_postal_code: String,
    /// Destination postal code.
    #[serde(default)]
    pub destination_postal_code: String,
    /// The requested service level.
    pub service_type: ServiceType,
    /// Caller-supplied surcharge flags (e.g. `"fragile"`), which activate
    /// flag-conditioned surcharge rules.
    #[serde(default)]
    pub surcharge_flags: Vec<String>,
}

impl ShipmentRequest {
    /// Creates a request with no dimensions, no route and no surcharge flags.
    pub fn new(actual_weight_kg: Decimal, service_type: ServiceType) -> Self {
        Self {
            actual_weight_kg,
            dimensions: None,
            distance_km: Decimal::ZERO,
            origin_postal_code: String::new(),
            destination_postal_code: String::new(),
            service_type,
            surcharge_flags: Vec::new(),
        }
    }

    /// Sets the route (distance, origin and destination postal codes).
    pub fn with_route(
        mut self,
        distance_km: Decimal,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        self.distance_km = distance_km;
        self.origin_postal_code = origin.into();
        self.destination_postal_code = destination.into();
        self
    }

    /// Sets the parcel dimensions.
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Adds a surcharge flag.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.surcharge_flags.push(flag.into());
        self
    }

    /// Returns true if the caller raised the given surcharge flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.surcharge_flags
            .iter()
            .any(|f| f.eq_ignore_ascii_case(flag))
    }

    /// Validates the fields required for a single-courier base price.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the actual weight is not positive or the
    /// distance is negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.actual_weight_kg <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "actual_weight",
                "must be greater than zero",
            ));
        }
        if self.distance_km < Decimal::ZERO {
            return Err(EngineError::invalid_input("distance", "must not be negative"));
        }
        Ok(())
    }

    /// Validates the fields required for a multi-courier comparison.
    ///
    /// In addition to [`ShipmentRequest::validate`], origin and destination
    /// postal codes must be non-empty.
    pub fn validate_for_comparison(&self) -> EngineResult<()> {
        self.validate()?;
        if self.origin_postal_code.trim().is_empty() {
            return Err(EngineError::invalid_input("origin", "must not be empty"));
        }
        if self.destination_postal_code.trim().is_empty() {
            return Err(EngineError::invalid_input("destination", "must not be empty"));
        }
        Ok(())
    }
}
