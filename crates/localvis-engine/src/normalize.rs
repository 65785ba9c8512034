//! Conversion from a raw field map to validated [`BusinessSignals`].
//!
//! Text parsing is delegated to [`crate::parse`]; this module decides which
//! raw shapes each field accepts, clamps numbers into range, and turns
//! genuinely unreadable input into a [`ValidationError`].

use localvis_core::{limits, BusinessSignals, PhotoRecency, ValidationError};
use serde_json::{Map, Value};

use crate::parse::{
    detect_claim, looks_like_url, means_no_reviews, parse_count, parse_decimal,
    parse_relative_days, parse_yes_no, secondary_categories,
};

/// Raw listing attributes keyed by field name, as posted by the audit form.
pub type RawFields = Map<String, Value>;

/// Normalizes raw listing attributes into [`BusinessSignals`].
///
/// Only `rating` is required. Counts are clamped into their valid ranges;
/// clamping never fails.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the first field whose text cannot be
/// interpreted, or [`ValidationError::MissingRequiredField`] when `rating`
/// is absent.
pub fn normalize(raw: &RawFields, country_code: &str) -> Result<BusinessSignals, ValidationError> {
    let rating = normalize_rating(present(raw, "rating"))?;
    let (review_count, review_count_missing) = normalize_review_count(present(raw, "review_count"))?;
    let is_claimed = normalize_claim(present(raw, "is_claimed"), present(raw, "claim_text"))?;
    let photo_count = normalize_photo_count(present(raw, "photo_count"))?;
    let days_since_last_photo = normalize_photo_recency(present(raw, "days_since_last_photo"))?;
    let primary_category = text_field(raw, "primary_category")?;
    let additional_category_count = normalize_additional_categories(
        present(raw, "additional_categories"),
        primary_category.as_deref(),
    )?;
    let has_website = normalize_website(present(raw, "has_website"))?;
    let nap_consistent = normalize_flag("nap_consistent", present(raw, "nap_consistent"))?;
    let business_name = text_field(raw, "business_name")?;

    Ok(BusinessSignals {
        business_name,
        rating,
        review_count,
        review_count_missing,
        is_claimed,
        photo_count,
        days_since_last_photo,
        primary_category,
        additional_category_count,
        has_website,
        nap_consistent,
        country_code: country_code.trim().to_ascii_uppercase(),
    })
}

/// Returns the field value unless it is absent, `null`, or blank text.
fn present<'a>(raw: &'a RawFields, key: &str) -> Option<&'a Value> {
    match raw.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    }
}

fn text_field(raw: &RawFields, key: &'static str) -> Result<Option<String>, ValidationError> {
    match present(raw, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(ValidationError::InvalidFieldType {
            field: key,
            expected: "text",
        }),
    }
}

fn normalize_rating(value: Option<&Value>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingRequiredField("rating"))?;
    let (parsed, raw_text) = match value {
        Value::Number(n) => (n.as_f64(), n.to_string()),
        Value::String(s) => (parse_decimal(s), s.clone()),
        _ => {
            return Err(ValidationError::InvalidFieldType {
                field: "rating",
                expected: "number or text",
            })
        }
    };

    match parsed {
        Some(r) if r.is_finite() && (0.0..=limits::MAX_RATING).contains(&r) => Ok(r),
        _ => Err(ValidationError::InvalidRating { value: raw_text }),
    }
}

fn normalize_review_count(value: Option<&Value>) -> Result<(u32, bool), ValidationError> {
    let Some(value) = value else {
        return Ok((0, true));
    };
    let count = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) if means_no_reviews(s) => 0.0,
        Value::String(s) => parse_count(s).ok_or_else(|| ValidationError::InvalidReviewCount {
            value: s.clone(),
        })?,
        _ => {
            return Err(ValidationError::InvalidFieldType {
                field: "review_count",
                expected: "number or text",
            })
        }
    };
    Ok((clamp_count(count, limits::MAX_REVIEW_COUNT), false))
}

fn normalize_photo_count(value: Option<&Value>) -> Result<u32, ValidationError> {
    let count = match value {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_count(s).ok_or_else(|| ValidationError::InvalidPhotoCount {
            value: s.clone(),
        })?,
        Some(_) => {
            return Err(ValidationError::InvalidFieldType {
                field: "photo_count",
                expected: "number or text",
            })
        }
    };
    Ok(clamp_count(count, limits::MAX_PHOTO_COUNT))
}

fn normalize_photo_recency(value: Option<&Value>) -> Result<PhotoRecency, ValidationError> {
    let days = match value {
        None => return Ok(PhotoRecency::Unknown),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            parse_relative_days(s).map(|d| f64::from(u32::try_from(d).unwrap_or(u32::MAX)))
        }
        Some(_) => {
            return Err(ValidationError::InvalidFieldType {
                field: "days_since_last_photo",
                expected: "number or text",
            })
        }
    };
    Ok(days.map_or(PhotoRecency::Unknown, |d| {
        PhotoRecency::Days(clamp_count(d, limits::MAX_DAYS_SINCE_PHOTO))
    }))
}

/// An explicit `is_claimed` flag wins over `claim_text`.
fn normalize_claim(flag: Option<&Value>, text: Option<&Value>) -> Result<bool, ValidationError> {
    match flag {
        Some(Value::Bool(b)) => return Ok(*b),
        Some(Value::String(s)) => return Ok(parse_yes_no(s).unwrap_or_else(|| detect_claim(s))),
        Some(_) => {
            return Err(ValidationError::InvalidFieldType {
                field: "is_claimed",
                expected: "boolean or text",
            })
        }
        None => {}
    }

    match text {
        None => Ok(false),
        Some(Value::String(s)) => Ok(detect_claim(s)),
        Some(_) => Err(ValidationError::InvalidFieldType {
            field: "claim_text",
            expected: "text",
        }),
    }
}

fn normalize_additional_categories(
    value: Option<&Value>,
    primary: Option<&str>,
) -> Result<u32, ValidationError> {
    let count = match value {
        None => 0,
        Some(Value::String(s)) => secondary_categories(s, primary).len(),
        Some(Value::Array(items)) => {
            let joined = items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(",");
            secondary_categories(&joined, primary).len()
        }
        Some(Value::Number(n)) => {
            return Ok(clamp_count(
                n.as_f64().unwrap_or(0.0),
                limits::MAX_ADDITIONAL_CATEGORIES,
            ))
        }
        Some(_) => {
            return Err(ValidationError::InvalidFieldType {
                field: "additional_categories",
                expected: "text, list or number",
            })
        }
    };
    Ok(u32::try_from(count)
        .unwrap_or(u32::MAX)
        .min(limits::MAX_ADDITIONAL_CATEGORIES))
}

/// Accepts a boolean, a yes/no word, or the website address itself.
/// Anything else counts as no website.
fn normalize_website(value: Option<&Value>) -> Result<bool, ValidationError> {
    match value {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => Ok(parse_yes_no(s).unwrap_or_else(|| looks_like_url(s))),
        Some(_) => Err(ValidationError::InvalidFieldType {
            field: "has_website",
            expected: "boolean or text",
        }),
    }
}

fn normalize_flag(field: &'static str, value: Option<&Value>) -> Result<bool, ValidationError> {
    match value {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) => Ok(parse_yes_no(s).unwrap_or(false)),
        Some(_) => Err(ValidationError::InvalidFieldType {
            field,
            expected: "boolean or text",
        }),
    }
}

/// Floors `value` into `0..=max`. Negative and non-finite input becomes zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_count(value: f64, max: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.floor().min(f64::from(max)) as u32
}
