//! Scoring configuration loaded from `config/engine.yaml`.
//!
//! Weight tables, thresholds, market assumptions and the ranking step table
//! all live here so deployments can retune the engine without code changes.
//! The config is validated once at load and shared read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigurationGap, DimensionKind};

/// Total points available across one weight table.
pub const TOTAL_POINTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightEntry {
    pub dimension: DimensionKind,
    pub weight: u32,
}

/// Ordered dimension weights summing to exactly [`TOTAL_POINTS`].
///
/// Construction is the only place the invariant is checked; a value of this
/// type is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeightEntry>", into = "Vec<WeightEntry>")]
pub struct DimensionWeightTable {
    entries: Vec<WeightEntry>,
}

impl DimensionWeightTable {
    /// Build a table, checking the sum, duplicates and overlapping dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first violated rule.
    pub fn new(entries: Vec<WeightEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::Validation(
                "weight table must contain at least one dimension".to_string(),
            ));
        }

        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if a.dimension.overlaps(b.dimension) {
                    return Err(ConfigError::Validation(format!(
                        "dimensions '{}' and '{}' score the same signals",
                        a.dimension, b.dimension
                    )));
                }
            }
        }

        if let Some(e) = entries.iter().find(|e| e.weight > TOTAL_POINTS) {
            return Err(ConfigError::Validation(format!(
                "dimension '{}' weight {} exceeds {TOTAL_POINTS}",
                e.dimension, e.weight
            )));
        }

        let sum: u64 = entries.iter().map(|e| u64::from(e.weight)).sum();
        if sum != u64::from(TOTAL_POINTS) {
            return Err(ConfigError::Validation(format!(
                "weights must sum to exactly {TOTAL_POINTS}, got {sum}"
            )));
        }

        Ok(Self { entries })
    }

    /// 40/25/20/15 split across reputation, ownership, visual and presence.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            entries: vec![
                WeightEntry {
                    dimension: DimensionKind::Reputation,
                    weight: 40,
                },
                WeightEntry {
                    dimension: DimensionKind::Ownership,
                    weight: 25,
                },
                WeightEntry {
                    dimension: DimensionKind::Visual,
                    weight: 20,
                },
                WeightEntry {
                    dimension: DimensionKind::Presence,
                    weight: 15,
                },
            ],
        }
    }

    /// Five equal dimensions of 20 points each.
    #[must_use]
    pub fn balanced() -> Self {
        Self {
            entries: [
                DimensionKind::Ownership,
                DimensionKind::Reputation,
                DimensionKind::Visual,
                DimensionKind::Categories,
                DimensionKind::Consistency,
            ]
            .into_iter()
            .map(|dimension| WeightEntry {
                dimension,
                weight: 20,
            })
            .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    /// Weight of `dimension`, or `None` if the table does not score it.
    #[must_use]
    pub fn weight_of(&self, dimension: DimensionKind) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.dimension == dimension)
            .map(|e| e.weight)
    }
}

impl TryFrom<Vec<WeightEntry>> for DimensionWeightTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<WeightEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<DimensionWeightTable> for Vec<WeightEntry> {
    fn from(table: DimensionWeightTable) -> Self {
        table.entries
    }
}

/// Curve parameters for the per-dimension fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringParams {
    /// Share of the reputation dimension driven by star rating; the rest is review volume.
    pub rating_share: f64,
    /// Review count at which review volume earns full credit.
    pub review_saturation: u32,
    /// Share of the visual dimension driven by photo count; the rest is recency.
    pub photo_count_share: f64,
    /// Photo count at which photo volume earns full credit.
    pub photo_saturation: u32,
    /// Secondary categories counted toward full category credit.
    pub category_cap: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Thresholds {
    /// Photos newer than this earn full recency credit.
    pub photo_fresh_days: u32,
    /// Photos this old or older earn no recency credit and raise an issue.
    pub photo_stale_days: u32,
    /// Fewer reviews than this raises the social-proof issue.
    pub min_reviews: u32,
}

/// Market assumptions for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketProfile {
    pub name: String,
    /// Local searches per month for a typical business category.
    pub monthly_search_volume: u32,
    pub average_ticket: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankStep {
    pub min_score: u32,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankingConfig {
    /// Score considered "good"; improvement potential is measured against it.
    pub good_threshold: u32,
    /// Ordered by descending `min_score`, the last step must start at 0.
    pub steps: Vec<RankStep>,
}

/// Key reported for results that used the default market profile.
pub const DEFAULT_MARKET_KEY: &str = "DEFAULT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub default_weight_table: String,
    pub weight_tables: BTreeMap<String, DimensionWeightTable>,
    pub scoring: ScoringParams,
    pub thresholds: Thresholds,
    /// Fraction of lost searches that would have become customers.
    pub conversion_rate: Decimal,
    pub default_market: MarketProfile,
    #[serde(default)]
    pub markets: BTreeMap<String, MarketProfile>,
    pub ranking: RankingConfig,
}

/// Market profile chosen for one analysis.
#[derive(Debug, Clone, Copy)]
pub struct MarketSelection<'a> {
    pub key: &'a str,
    pub profile: &'a MarketProfile,
}

impl EngineConfig {
    /// Parse and validate an engine config from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a weight table by name.
    #[must_use]
    pub fn weight_table(&self, name: &str) -> Option<&DimensionWeightTable> {
        self.weight_tables.get(name)
    }

    /// Select the market profile for `country_code`, falling back to the default.
    ///
    /// The fallback is reported as a [`ConfigurationGap`], never as an error.
    #[must_use]
    pub fn market_for(&self, country_code: &str) -> (MarketSelection<'_>, Option<ConfigurationGap>) {
        let code = country_code.trim().to_ascii_uppercase();
        if let Some((key, profile)) = self.markets.get_key_value(code.as_str()) {
            return (
                MarketSelection {
                    key: key.as_str(),
                    profile,
                },
                None,
            );
        }

        let gap = ConfigurationGap {
            requested_country: code,
            fallback_market: DEFAULT_MARKET_KEY.to_string(),
        };
        (
            MarketSelection {
                key: DEFAULT_MARKET_KEY,
                profile: &self.default_market,
            },
            Some(gap),
        )
    }

    /// Check cross-field rules that serde cannot express.
    ///
    /// Collects every problem so a bad config can be fixed in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] listing all violations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = collect_violations(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}

fn collect_violations(config: &EngineConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if !config
        .weight_tables
        .contains_key(&config.default_weight_table)
    {
        errors.push(format!(
            "default_weight_table '{}' is not defined in weight_tables",
            config.default_weight_table
        ));
    }

    let scoring = &config.scoring;
    if !(0.0..=1.0).contains(&scoring.rating_share) {
        errors.push("scoring.rating_share: must be within [0, 1]".to_string());
    }
    if !(0.0..=1.0).contains(&scoring.photo_count_share) {
        errors.push("scoring.photo_count_share: must be within [0, 1]".to_string());
    }
    if scoring.review_saturation == 0 {
        errors.push("scoring.review_saturation: must be positive".to_string());
    }
    if scoring.photo_saturation == 0 {
        errors.push("scoring.photo_saturation: must be positive".to_string());
    }
    if scoring.category_cap == 0 {
        errors.push("scoring.category_cap: must be positive".to_string());
    }

    let thresholds = &config.thresholds;
    if thresholds.photo_fresh_days >= thresholds.photo_stale_days {
        errors.push(format!(
            "thresholds: photo_fresh_days ({}) must be below photo_stale_days ({})",
            thresholds.photo_fresh_days, thresholds.photo_stale_days
        ));
    }

    if config.conversion_rate <= Decimal::ZERO || config.conversion_rate > Decimal::ONE {
        errors.push(format!(
            "conversion_rate: must be within (0, 1], got {}",
            config.conversion_rate
        ));
    }

    validate_market("default_market", &config.default_market, &mut errors);
    for (code, profile) in &config.markets {
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            errors.push(format!(
                "markets.{code}: key must be an upper-case ISO 3166-1 alpha-2 code"
            ));
        }
        validate_market(&format!("markets.{code}"), profile, &mut errors);
    }

    validate_ranking(&config.ranking, &mut errors);

    errors
}

fn validate_market(path: &str, profile: &MarketProfile, errors: &mut Vec<String>) {
    if profile.monthly_search_volume == 0 {
        errors.push(format!("{path}.monthly_search_volume: must be positive"));
    }
    if profile.average_ticket < Decimal::ZERO {
        errors.push(format!("{path}.average_ticket: must be non-negative"));
    }
    if profile.currency.trim().is_empty() {
        errors.push(format!("{path}.currency: must be non-empty"));
    }
}

fn validate_ranking(ranking: &RankingConfig, errors: &mut Vec<String>) {
    if ranking.good_threshold > TOTAL_POINTS {
        errors.push(format!(
            "ranking.good_threshold: must be at most {TOTAL_POINTS}"
        ));
    }

    let Some(last) = ranking.steps.last() else {
        errors.push("ranking.steps: must not be empty".to_string());
        return;
    };
    if last.min_score != 0 {
        errors.push("ranking.steps: last step must start at min_score 0".to_string());
    }

    for (i, pair) in ranking.steps.windows(2).enumerate() {
        let (hi, lo) = (pair[0], pair[1]);
        if hi.min_score <= lo.min_score {
            errors.push(format!(
                "ranking.steps[{}]: min_score must be strictly descending",
                i + 1
            ));
        }
        if hi.rank >= lo.rank {
            errors.push(format!(
                "ranking.steps[{}]: rank must be strictly ascending",
                i + 1
            ));
        }
    }
    for (i, step) in ranking.steps.iter().enumerate() {
        if step.min_score > TOTAL_POINTS {
            errors.push(format!(
                "ranking.steps[{i}].min_score: must be at most {TOTAL_POINTS}"
            ));
        }
        if step.rank == 0 {
            errors.push(format!("ranking.steps[{i}].rank: must be at least 1"));
        }
    }
}

/// Load and validate the engine configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_engine_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::EngineConfigIo {
        path: path.display().to_string(),
        source: e,
    })?;

    EngineConfig::from_yaml_str(&content)
}

#[cfg(test)]
#[path = "engine_config_test.rs"]
mod tests;
