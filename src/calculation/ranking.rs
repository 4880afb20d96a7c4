//! Quote ranking.
//!
//! Orders priced quotes cheapest first with a deterministic tie-break on
//! courier id, assigns ranks and computes spread statistics.

use crate::models::{PriceQuote, PriceRange, RankedQuote};

/// Ranked quotes with their price range.
#[derive(Debug, Clone)]
pub struct RankingResult {
    /// Quotes ascending by final price, ties broken by courier id.
    pub quotes: Vec<RankedQuote>,
    /// Spread over the quotes.
    pub price_range: PriceRange,
}

/// Ranks priced quotes.
///
/// Returns `None` when there are no quotes.
///
/// # Examples
///
/// ```
/// use delivery_pricing::calculation::rank_quotes;
///
/// assert!(rank_quotes(Vec::new()).is_none());
/// ```
pub fn rank_quotes(mut quotes: Vec<PriceQuote>) -> Option<RankingResult> {
    quotes.sort_by(|a, b| {
        a.final_price()
            .cmp(&b.final_price())
            .then_with(|| a.courier_id.cmp(&b.courier_id))
    });

    let min = quotes.first()?.final_price();
    let max = quotes.last()?.final_price();

    let quotes = quotes
        .into_iter()
        .enumerate()
        .map(|(index, quote)| RankedQuote {
            rank: index as u32 + 1,
            is_cheapest: index == 0,
            price_difference_from_cheapest: quote.final_price() - min,
            quote,
        })
        .collect();

    Some(RankingResult {
        quotes,
        price_range: PriceRange {
            min,
            max,
            difference: max - min,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BasePricing, FinalPricing, MarkupDetails, ServiceType, WeightDetails};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn quote(courier_id: &str, price: &str) -> PriceQuote {
        let price = dec(price);
        PriceQuote {
            courier_id: courier_id.to_string(),
            courier_name: courier_id.to_uppercase(),
            service_type: ServiceType::Standard,
            base_pricing: BasePricing {
                base_price: price,
                weight_cost: Decimal::ZERO,
                distance_cost: Decimal::ZERO,
                zone_multiplier: Decimal::ONE,
                zone_name: None,
                surcharges: vec![],
                total_surcharges: Decimal::ZERO,
                subtotal: price,
                total_base_price: price,
            },
            weight_details: WeightDetails {
                actual_weight: Decimal::ONE,
                volumetric_weight: Decimal::ZERO,
                chargeable_weight: Decimal::ONE,
            },
            markup: MarkupDetails::none(),
            final_pricing: FinalPricing {
                before_markup: price,
                markup_amount: Decimal::ZERO,
                after_markup: price,
                rounded_price: price,
            },
            currency: "AUD".to_string(),
            calculation_breakdown: vec![],
        }
    }

    #[test]
    fn test_three_couriers_ranked_cheapest_first() {
        let result = rank_quotes(vec![
            quote("alpha", "120"),
            quote("bravo", "95"),
            quote("charlie", "110"),
        ])
        .unwrap();

        let order: Vec<(&str, u32, bool)> = result
            .quotes
            .iter()
            .map(|q| (q.quote.courier_id.as_str(), q.rank, q.is_cheapest))
            .collect();
        assert_eq!(
            order,
            vec![("bravo", 1, true), ("charlie", 2, false), ("alpha", 3, false)]
        );

        assert_eq!(result.quotes[0].price_difference_from_cheapest, Decimal::ZERO);
        assert_eq!(result.quotes[1].price_difference_from_cheapest, dec("15"));
        assert_eq!(result.quotes[2].price_difference_from_cheapest, dec("25"));

        assert_eq!(result.price_range.min, dec("95"));
        assert_eq!(result.price_range.max, dec("120"));
        assert_eq!(result.price_range.difference, dec("25"));
    }

    #[test]
    fn test_ties_broken_by_courier_id() {
        let result = rank_quotes(vec![
            quote("zulu", "50"),
            quote("alpha", "50"),
            quote("mike", "50"),
        ])
        .unwrap();

        let ids: Vec<&str> = result.quotes.iter().map(|q| q.quote.courier_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mike", "zulu"]);
        assert_eq!(result.quotes.iter().filter(|q| q.is_cheapest).count(), 1);
        assert_eq!(result.price_range.difference, Decimal::ZERO);
    }

    #[test]
    fn test_single_quote() {
        let result = rank_quotes(vec![quote("solo", "42.50")]).unwrap();
        assert_eq!(result.quotes.len(), 1);
        assert!(result.quotes[0].is_cheapest);
        assert_eq!(result.price_range.min, result.price_range.max);
    }

    #[test]
    fn test_empty_returns_none() {
        assert!(rank_quotes(vec![]).is_none());
    }

    #[test]
    fn test_ranking_uses_rounded_price() {
        let mut marked_up = quote("alpha", "60");
        marked_up.final_pricing.rounded_price = dec("90");
        let result = rank_quotes(vec![marked_up, quote("bravo", "80")]).unwrap();

        assert_eq!(result.quotes[0].quote.courier_id, "bravo");
    }
}
