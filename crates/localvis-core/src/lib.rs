//! Domain types and configuration for the local visibility scoring engine.

mod app_config;
mod config;
mod engine_config;
mod error;
mod result;
mod signals;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use engine_config::{
    load_engine_config, DimensionWeightTable, EngineConfig, MarketProfile, MarketSelection,
    RankStep, RankingConfig, ScoringParams, Thresholds, WeightEntry, DEFAULT_MARKET_KEY,
    TOTAL_POINTS,
};
pub use error::{ConfigError, ConfigurationGap, ValidationError};
pub use result::{
    CriticalIssue, DimensionKind, DimensionScore, IssueKind, RankEstimate, RevenueLossEstimate,
    ScoreLabel, ScoreResult, Severity,
};
pub use signals::{limits, BusinessSignals, PhotoRecency};
