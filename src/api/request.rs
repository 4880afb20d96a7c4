//! Request types for the pricing API.
//!
//! This module defines the JSON request structures for the `/pricing/base`
//! and `/pricing/compare` endpoints and their conversion into
//! [`ShipmentRequest`]s.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Dimensions, ServiceType, ShipmentRequest};

/// Parcel dimensions in centimetres.
///
/// Every dimension is optional; partial dimensions are accepted and ignored
/// by the weight normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DimensionsRequest {
    /// Length in centimetres.
    #[serde(default)]
    pub length: Option<Decimal>,
    /// Width in centimetres.
    #[serde(default)]
    pub width: Option<Decimal>,
    /// Height in centimetres.
    #[serde(default)]
    pub height: Option<Decimal>,
}

impl From<DimensionsRequest> for Dimensions {
    fn from(req: DimensionsRequest) -> Self {
        Dimensions {
            length_cm: req.length,
            width_cm: req.width,
            height_cm: req.height,
        }
    }
}

/// Request body for the `/pricing/base` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasePriceRequest {
    /// The courier to price.
    pub courier_id: String,
    /// The requested service level.
    pub service_type: ServiceType,
    /// Actual weight in kilograms.
    pub actual_weight: Decimal,
    /// Optional parcel dimensions.
    #[serde(default)]
    pub dimensions: Option<DimensionsRequest>,
    /// Delivery distance in kilometres, zero when omitted.
    #[serde(default)]
    pub distance: Option<Decimal>,
    /// Origin postal code.
    #[serde(default)]
    pub origin: Option<String>,
    /// Destination postal code.
    #[serde(default)]
    pub destination: Option<String>,
    /// Surcharge flags such as `"fragile"`.
    #[serde(default)]
    pub surcharges: Vec<String>,
}

impl BasePriceRequest {
    /// Splits the request into the courier id and the shipment to price.
    pub fn into_parts(self) -> (String, ShipmentRequest) {
        let shipment = ShipmentRequest {
            actual_weight_kg: self.actual_weight,
            dimensions: self.dimensions.map(Into::into),
            distance_km: self.distance.unwrap_or_default(),
            origin_postal_code: self.origin.unwrap_or_default(),
            destination_postal_code: self.destination.unwrap_or_default(),
            service_type: self.service_type,
            surcharge_flags: self.surcharges,
        };
        (self.courier_id, shipment)
    }
}

/// Request body for the `/pricing/compare` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The requested service level.
    pub service_type: ServiceType,
    /// Actual weight in kilograms.
    pub actual_weight: Decimal,
    /// Optional parcel dimensions.
    #[serde(default)]
    pub dimensions: Option<DimensionsRequest>,
    /// Delivery distance in kilometres.
    pub distance: Decimal,
    /// Origin postal code.
    pub origin: String,
    /// Destination postal code.
    pub destination: String,
    /// Surcharge flags such as `"fragile"`.
    #[serde(default)]
    pub surcharges: Vec<String>,
    /// The merchant whose selection and markup policies apply.
    #[serde(default)]
    pub merchant_id: Option<String>,
}

impl CompareRequest {
    /// Splits the request into the shipment and the optional merchant id.
    pub fn into_parts(self) -> (ShipmentRequest, Option<String>) {
        let shipment = ShipmentRequest {
            actual_weight_kg: self.actual_weight,
            dimensions: self.dimensions.map(Into::into),
            distance_km: self.distance,
            origin_postal_code: self.origin,
            destination_postal_code: self.destination,
            service_type: self.service_type,
            surcharge_flags: self.surcharges,
        };
        let merchant_id = self.merchant_id.filter(|m| !m.trim().is_empty());
        (shipment, merchant_id)
    }
}
