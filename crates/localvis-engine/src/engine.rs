//! The composed analysis pipeline.

use std::sync::Arc;

use localvis_core::{
    BusinessSignals, DimensionWeightTable, EngineConfig, ScoreResult, ValidationError,
};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::normalize::{normalize, RawFields};
use crate::{classify, issues, ranking, revenue, scorer, EngineError};

/// Runs normalization, scoring, issue detection, revenue and rank estimation
/// over one listing.
///
/// Holds only read-only configuration, so one instance can be shared across
/// threads and every call is independent of every other.
#[derive(Debug, Clone)]
pub struct Engine<C = SystemClock> {
    config: Arc<EngineConfig>,
    default_table_name: String,
    default_table: DimensionWeightTable,
    clock: C,
}

impl Engine<SystemClock> {
    /// Creates an engine using the config's default weight table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownWeightTable`] if the config names a
    /// default table it does not define.
    pub fn new(config: Arc<EngineConfig>) -> Result<Self, EngineError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Engine<C> {
    /// Creates an engine that stamps results with `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownWeightTable`] if the config names a
    /// default table it does not define.
    pub fn with_clock(config: Arc<EngineConfig>, clock: C) -> Result<Self, EngineError> {
        let name = config.default_weight_table.clone();
        let table = config
            .weight_table(&name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownWeightTable(name.clone()))?;
        Ok(Self {
            config,
            default_table_name: name,
            default_table: table,
            clock,
        })
    }

    /// Replaces the table used when a call does not name one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownWeightTable`] if `name` is not configured.
    pub fn with_default_table(mut self, name: &str) -> Result<Self, EngineError> {
        let table = self
            .config
            .weight_table(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownWeightTable(name.to_string()))?;
        self.default_table_name = name.to_string();
        self.default_table = table;
        Ok(self)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn default_table_name(&self) -> &str {
        &self.default_table_name
    }

    /// Analyzes raw listing fields with the default weight table.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first unreadable field. No
    /// partial result is produced.
    pub fn analyze(
        &self,
        raw: &RawFields,
        country_code: &str,
    ) -> Result<ScoreResult, ValidationError> {
        let signals = normalize(raw, country_code)?;
        Ok(self.score_with(&signals, &self.default_table_name, &self.default_table))
    }

    /// Analyzes raw listing fields with a named weight table, or the default
    /// when `table` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownWeightTable`] before looking at the input
    /// if `table` is not configured, otherwise any [`ValidationError`].
    pub fn analyze_with_table(
        &self,
        raw: &RawFields,
        country_code: &str,
        table: Option<&str>,
    ) -> Result<ScoreResult, EngineError> {
        let (name, weights) = self.resolve_table(table)?;
        let signals = normalize(raw, country_code)?;
        Ok(self.score_with(&signals, name, weights))
    }

    /// Scores signals that were already normalized.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownWeightTable`] if `table` is not configured.
    pub fn score_signals(
        &self,
        signals: &BusinessSignals,
        table: Option<&str>,
    ) -> Result<ScoreResult, EngineError> {
        let (name, weights) = self.resolve_table(table)?;
        Ok(self.score_with(signals, name, weights))
    }

    fn resolve_table<'a>(
        &'a self,
        table: Option<&'a str>,
    ) -> Result<(&'a str, &'a DimensionWeightTable), EngineError> {
        match table {
            None => Ok((self.default_table_name.as_str(), &self.default_table)),
            Some(name) => self
                .config
                .weight_table(name)
                .map(|weights| (name, weights))
                .ok_or_else(|| EngineError::UnknownWeightTable(name.to_string())),
        }
    }

    fn score_with(
        &self,
        signals: &BusinessSignals,
        table_name: &str,
        table: &DimensionWeightTable,
    ) -> ScoreResult {
        let config = &self.config;
        let dimension_scores = scorer::score(signals, table, &config.scoring, &config.thresholds);
        let total_score = scorer::total_score(&dimension_scores);

        let (revenue_loss, configuration_gap) =
            revenue::estimate_for_country(total_score, config, &signals.country_code);
        if let Some(gap) = &configuration_gap {
            warn!(
                requested_country = %gap.requested_country,
                fallback_market = %gap.fallback_market,
                "no market profile for country; using default market"
            );
        }

        let critical_issues =
            issues::detect(signals, &dimension_scores, &config.thresholds, &revenue_loss);
        let rank = ranking::estimate_rank(total_score, &config.ranking);
        let label = classify::classify(total_score);

        debug!(
            country = %signals.country_code,
            weight_table = table_name,
            total_score,
            label = %label,
            issues = critical_issues.len(),
            "listing analyzed"
        );

        ScoreResult {
            total_score,
            label,
            severity: label.severity(),
            dimension_scores,
            critical_issues,
            revenue_loss,
            rank,
            analyzed_at: self.clock.now(),
            country: signals.country_code.clone(),
            weight_table: table_name.to_string(),
            configuration_gap,
        }
    }
}
