//! Weighted per-dimension scoring of normalized listing signals.
//!
//! Each dimension first computes a credit fraction in `[0, 1]`, which is then
//! scaled by the dimension's weight in the active table and rounded to whole
//! points.

use localvis_core::{
    BusinessSignals, DimensionKind, DimensionScore, DimensionWeightTable, PhotoRecency,
    ScoringParams, Thresholds,
};

/// Share of category credit earned by having a primary category at all.
const PRIMARY_CATEGORY_SHARE: f64 = 0.6;

/// Scores `signals` against every dimension in `table`, in table order.
#[must_use]
pub fn score(
    signals: &BusinessSignals,
    table: &DimensionWeightTable,
    params: &ScoringParams,
    thresholds: &Thresholds,
) -> Vec<DimensionScore> {
    table
        .entries()
        .iter()
        .map(|entry| DimensionScore {
            name: entry.dimension,
            points: points(fraction(entry.dimension, signals, params, thresholds), entry.weight),
            max_points: entry.weight,
        })
        .collect()
}

/// Sum of all dimension points.
#[must_use]
pub fn total_score(dimensions: &[DimensionScore]) -> u32 {
    dimensions.iter().map(|d| d.points).sum()
}

/// Credit earned on one dimension, in `[0, 1]`.
#[must_use]
pub fn fraction(
    dimension: DimensionKind,
    signals: &BusinessSignals,
    params: &ScoringParams,
    thresholds: &Thresholds,
) -> f64 {
    let raw = match dimension {
        DimensionKind::Ownership => {
            if signals.is_claimed {
                1.0
            } else {
                0.0
            }
        }
        DimensionKind::Reputation => reputation(signals, params),
        DimensionKind::Visual => visual(signals, params, thresholds),
        DimensionKind::Categories => categories(signals, params),
        DimensionKind::Consistency => consistency(signals),
        DimensionKind::Presence => (categories(signals, params) + consistency(signals)) / 2.0,
    };
    raw.clamp(0.0, 1.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn points(fraction: f64, weight: u32) -> u32 {
    let scaled = (fraction * f64::from(weight)).round();
    (scaled.max(0.0) as u32).min(weight)
}

/// Diminishing-returns curve reaching 1.0 at `saturation`.
fn log_curve(value: u32, saturation: u32) -> f64 {
    if saturation == 0 {
        return 1.0;
    }
    let curve = f64::from(value).ln_1p() / f64::from(saturation).ln_1p();
    curve.min(1.0)
}

fn reputation(signals: &BusinessSignals, params: &ScoringParams) -> f64 {
    let rating = (signals.rating / localvis_core::limits::MAX_RATING).clamp(0.0, 1.0);
    let volume = log_curve(signals.review_count, params.review_saturation);
    params.rating_share * rating + (1.0 - params.rating_share) * volume
}

fn visual(signals: &BusinessSignals, params: &ScoringParams, thresholds: &Thresholds) -> f64 {
    let volume = log_curve(signals.photo_count, params.photo_saturation);
    let recency = recency_credit(signals.days_since_last_photo, thresholds);
    params.photo_count_share * volume + (1.0 - params.photo_count_share) * recency
}

/// Full credit up to the freshness threshold, linear decay to zero at the
/// staleness threshold. Unknown recency earns nothing.
fn recency_credit(recency: PhotoRecency, thresholds: &Thresholds) -> f64 {
    let Some(days) = recency.days() else {
        return 0.0;
    };
    let fresh = thresholds.photo_fresh_days;
    let stale = thresholds.photo_stale_days;
    if days <= fresh {
        1.0
    } else if days >= stale {
        0.0
    } else {
        f64::from(stale - days) / f64::from(stale - fresh)
    }
}

fn categories(signals: &BusinessSignals, params: &ScoringParams) -> f64 {
    let primary = if signals.primary_category.is_some() {
        PRIMARY_CATEGORY_SHARE
    } else {
        0.0
    };
    let secondary = if params.category_cap == 0 {
        0.0
    } else {
        f64::from(signals.additional_category_count.min(params.category_cap))
            / f64::from(params.category_cap)
    };
    primary + (1.0 - PRIMARY_CATEGORY_SHARE) * secondary
}

fn consistency(signals: &BusinessSignals) -> f64 {
    let website = if signals.has_website { 0.5 } else { 0.0 };
    let nap = if signals.nap_consistent { 0.5 } else { 0.0 };
    website + nap
}
