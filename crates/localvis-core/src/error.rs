use serde::Serialize;
use thiserror::Error;

/// Raw listing input that could not be interpreted.
///
/// Every variant names the offending input field so a form can highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid rating \"{value}\": expected a number between 0 and 5")]
    InvalidRating { value: String },

    #[error("invalid review count \"{value}\": no digits found")]
    InvalidReviewCount { value: String },

    #[error("invalid photo count \"{value}\": no digits found")]
    InvalidPhotoCount { value: String },

    #[error("field `{field}` has the wrong type: expected {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),
}

impl ValidationError {
    /// Name of the raw input field that failed.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidRating { .. } => "rating",
            ValidationError::InvalidReviewCount { .. } => "review_count",
            ValidationError::InvalidPhotoCount { .. } => "photo_count",
            ValidationError::InvalidFieldType { field, .. }
            | ValidationError::MissingRequiredField(field) => *field,
        }
    }

    /// Stable machine-readable code for API consumers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidRating { .. } => "invalid_rating",
            ValidationError::InvalidReviewCount { .. } => "invalid_review_count",
            ValidationError::InvalidPhotoCount { .. } => "invalid_photo_count",
            ValidationError::InvalidFieldType { .. } => "invalid_field_type",
            ValidationError::MissingRequiredField(_) => "missing_required_field",
        }
    }
}

/// The requested country has no market profile; the default profile was used.
///
/// Carried on the result rather than raised, so callers can track market
/// coverage without failing the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationGap {
    pub requested_country: String,
    pub fallback_market: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read engine config at {path}: {source}")]
    EngineConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse engine config: {0}")]
    EngineConfigParse(#[from] serde_yaml::Error),

    #[error("engine config validation failed: {0}")]
    Validation(String),
}
