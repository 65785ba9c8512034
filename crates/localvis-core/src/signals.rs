use serde::{Deserialize, Serialize};

/// How long ago the most recent listing photo was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "days")]
pub enum PhotoRecency {
    Days(u32),
    /// Missing or unparseable. Treated as stale everywhere downstream.
    Unknown,
}

impl PhotoRecency {
    #[must_use]
    pub fn days(self) -> Option<u32> {
        match self {
            PhotoRecency::Days(d) => Some(d),
            PhotoRecency::Unknown => None,
        }
    }
}

/// Normalized, range-checked listing attributes.
///
/// Only produced by the normalizer; every downstream component reads these
/// values and never the raw copy-pasted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct BusinessSignals {
    pub business_name: Option<String>,
    /// Star rating in `[0.0, 5.0]`.
    pub rating: f64,
    pub review_count: u32,
    /// Review count was absent from the input and defaulted to zero.
    pub review_count_missing: bool,
    pub is_claimed: bool,
    pub photo_count: u32,
    pub days_since_last_photo: PhotoRecency,
    pub primary_category: Option<String>,
    pub additional_category_count: u32,
    pub has_website: bool,
    pub nap_consistent: bool,
    /// Upper-cased ISO 3166-1 alpha-2 code as supplied by the caller.
    pub country_code: String,
}

/// Upper bounds applied when clamping normalized counts.
pub mod limits {
    pub const MAX_RATING: f64 = 5.0;
    pub const MAX_REVIEW_COUNT: u32 = 10_000_000;
    pub const MAX_PHOTO_COUNT: u32 = 1_000_000;
    pub const MAX_DAYS_SINCE_PHOTO: u32 = 36_500;
    pub const MAX_ADDITIONAL_CATEGORIES: u32 = 50;
}
