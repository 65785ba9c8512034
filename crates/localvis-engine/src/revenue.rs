//! Lost-revenue ("lucro cesante") estimate from the visibility gap.

use localvis_core::{
    ConfigurationGap, EngineConfig, MarketProfile, RevenueLossEstimate, TOTAL_POINTS,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Estimates customers and revenue lost to the gap between `total_score`
/// and a perfect score in `market`.
///
/// Lost customers are rounded to whole people before pricing, so
/// `monthly_loss` is always `lost_customers_per_month * average_ticket`.
#[must_use]
pub fn estimate(
    total_score: u32,
    market: &MarketProfile,
    conversion_rate: Decimal,
) -> RevenueLossEstimate {
    let total = Decimal::from(TOTAL_POINTS);
    let gap = (total - Decimal::from(total_score.min(TOTAL_POINTS))) / total;

    let searches = Decimal::from(market.monthly_search_volume);
    let customers = (searches * gap * conversion_rate.max(Decimal::ZERO))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let lost_customers_per_month = customers.to_u32().unwrap_or(u32::MAX);

    let ticket = market.average_ticket.max(Decimal::ZERO);
    let monthly_loss = (Decimal::from(lost_customers_per_month) * ticket)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    RevenueLossEstimate {
        lost_customers_per_month,
        monthly_loss,
        annual_loss: monthly_loss * Decimal::from(12),
        currency: market.currency.clone(),
    }
}

/// Same as [`estimate`], resolving the market from `country_code`.
///
/// Unknown countries use the default market and return the gap alongside.
#[must_use]
pub fn estimate_for_country(
    total_score: u32,
    config: &EngineConfig,
    country_code: &str,
) -> (RevenueLossEstimate, Option<ConfigurationGap>) {
    let (market, gap) = config.market_for(country_code);
    (
        estimate(total_score, market.profile, config.conversion_rate),
        gap,
    )
}
