//! Calculation logic for the pricing engine.
//!
//! This module contains the pure pricing functions: weight normalization,
//! zone multiplier lookup, surcharge evaluation, base price composition,
//! merchant markup application and quote ranking. None of them perform I/O.

mod base_price;
mod markup;
mod ranking;
mod surcharge;
mod weight;
mod zone;

pub use base_price::{BasePriceCalculation, MONEY_DP, calculate_base_price, round_money};
pub use markup::{MarkupResult, apply_markup, default_rounding_increment, round_to_increment};
pub use ranking::{RankingResult, rank_quotes};
pub use surcharge::{SurchargeResult, evaluate_surcharges, surcharge_amount, surcharge_applies};
pub use weight::{
    VOLUMETRIC_WEIGHT_DP, WeightNormalizationResult, normalize_weight, volumetric_weight,
};
pub use zone::{ZoneLookupResult, find_zone, lookup_zone_multiplier};
