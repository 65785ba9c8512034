use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigurationGap;

/// A scoring dimension. Which ones take part in an analysis, and with what
/// weight, is decided by the active [`crate::DimensionWeightTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    /// Claim status of the listing.
    Ownership,
    /// Star rating blended with review volume.
    Reputation,
    /// Photo volume blended with photo freshness.
    Visual,
    /// Categories, website and NAP consistency together.
    Presence,
    /// Primary and secondary categories only.
    Categories,
    /// Website and NAP consistency only.
    Consistency,
}

impl DimensionKind {
    pub const ALL: [DimensionKind; 6] = [
        DimensionKind::Ownership,
        DimensionKind::Reputation,
        DimensionKind::Visual,
        DimensionKind::Presence,
        DimensionKind::Categories,
        DimensionKind::Consistency,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DimensionKind::Ownership => "ownership",
            DimensionKind::Reputation => "reputation",
            DimensionKind::Visual => "visual",
            DimensionKind::Presence => "presence",
            DimensionKind::Categories => "categories",
            DimensionKind::Consistency => "consistency",
        }
    }

    /// Whether two dimensions score any of the same signals.
    #[must_use]
    pub fn overlaps(self, other: DimensionKind) -> bool {
        use DimensionKind::{Categories, Consistency, Presence};
        self == other
            || matches!(
                (self, other),
                (Presence, Categories | Consistency) | (Categories | Consistency, Presence)
            )
    }
}

impl std::fmt::Display for DimensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub name: DimensionKind,
    /// Always within `0..=max_points`.
    pub points: u32,
    #[serde(rename = "max")]
    pub max_points: u32,
}

impl DimensionScore {
    #[must_use]
    pub fn deficit(&self) -> u32 {
        self.max_points.saturating_sub(self.points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    UnclaimedListing,
    NoWebsite,
    StalePhotos,
    InsufficientSocialProof,
    MissingPrimaryCategory,
}

impl IssueKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::UnclaimedListing => "unclaimed_listing",
            IssueKind::NoWebsite => "no_website",
            IssueKind::StalePhotos => "stale_photos",
            IssueKind::InsufficientSocialProof => "insufficient_social_proof",
            IssueKind::MissingPrimaryCategory => "missing_primary_category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalIssue {
    pub kind: IssueKind,
    pub title: String,
    pub description: String,
    /// Share of the monthly revenue loss attributed to this issue.
    #[serde(with = "rust_decimal::serde::float")]
    pub estimated_monthly_impact: Decimal,
}

/// Wire names follow the audit report fields (`lucro cesante` = lost revenue).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueLossEstimate {
    #[serde(rename = "clientes_perdidos_mes")]
    pub lost_customers_per_month: u32,
    #[serde(rename = "lucro_cesante_mensual", with = "rust_decimal::serde::float")]
    pub monthly_loss: Decimal,
    /// Exactly `monthly_loss * 12`.
    #[serde(rename = "lucro_cesante_anual", with = "rust_decimal::serde::float")]
    pub annual_loss: Decimal,
    pub currency: String,
}

/// Score bands, closed below and open above: `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    Critical,
    Improvable,
    Good,
    Excellent,
}

impl ScoreLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::Critical => "Critical",
            ScoreLabel::Improvable => "Improvable",
            ScoreLabel::Good => "Good",
            ScoreLabel::Excellent => "Excellent",
        }
    }

    /// Spanish label shown in audit reports.
    #[must_use]
    pub fn display_es(self) -> &'static str {
        match self {
            ScoreLabel::Critical => "Crítico",
            ScoreLabel::Improvable => "Mejorable",
            ScoreLabel::Good => "Bueno",
            ScoreLabel::Excellent => "Excelente",
        }
    }

    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            ScoreLabel::Critical => Severity::Critical,
            ScoreLabel::Improvable => Severity::High,
            ScoreLabel::Good => Severity::Medium,
            ScoreLabel::Excellent => Severity::Low,
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Alert tier consumed by notification and upsell flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEstimate {
    #[serde(rename = "ranking_position_estimated")]
    pub estimated_rank: u32,
    #[serde(rename = "ranking_improvement_potential")]
    pub improvement_potential: u32,
}

/// Full output of one analysis. Built once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub total_score: u32,
    #[serde(rename = "score_label")]
    pub label: ScoreLabel,
    pub severity: Severity,
    pub dimension_scores: Vec<DimensionScore>,
    pub critical_issues: Vec<CriticalIssue>,
    #[serde(flatten)]
    pub revenue_loss: RevenueLossEstimate,
    #[serde(flatten)]
    pub rank: RankEstimate,
    pub analyzed_at: DateTime<Utc>,
    pub country: String,
    pub weight_table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_gap: Option<ConfigurationGap>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_result() -> ScoreResult {
        ScoreResult {
            total_score: 62,
            label: ScoreLabel::Improvable,
            severity: Severity::High,
            dimension_scores: vec![DimensionScore {
                name: DimensionKind::Ownership,
                points: 0,
                max_points: 25,
            }],
            critical_issues: vec![],
            revenue_loss: RevenueLossEstimate {
                lost_customers_per_month: 38,
                monthly_loss: Decimal::new(57_000_000, 2),
                annual_loss: Decimal::new(684_000_000, 2),
                currency: "ARS".to_string(),
            },
            rank: RankEstimate {
                estimated_rank: 5,
                improvement_potential: 4,
            },
            analyzed_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            country: "AR".to_string(),
            weight_table: "standard".to_string(),
            configuration_gap: None,
        }
    }

    #[test]
    fn score_result_serializes_report_field_names() {
        let json = serde_json::to_value(sample_result()).expect("serialize");
        assert_eq!(json["total_score"], 62);
        assert_eq!(json["score_label"], "Improvable");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["clientes_perdidos_mes"], 38);
        assert_eq!(json["lucro_cesante_mensual"].as_f64(), Some(570_000.0));
        assert_eq!(json["lucro_cesante_anual"].as_f64(), Some(6_840_000.0));
        assert_eq!(json["ranking_position_estimated"], 5);
        assert_eq!(json["ranking_improvement_potential"], 4);
        assert_eq!(json["dimension_scores"][0]["name"], "ownership");
        assert_eq!(json["dimension_scores"][0]["max"], 25);
        assert_eq!(json["country"], "AR");
        assert!(json.get("configuration_gap").is_none());
    }

    #[test]
    fn configuration_gap_is_serialized_when_present() {
        let mut result = sample_result();
        result.configuration_gap = Some(ConfigurationGap {
            requested_country: "ZZ".to_string(),
            fallback_market: "DEFAULT".to_string(),
        });
        let json = serde_json::to_value(result).expect("serialize");
        assert_eq!(json["configuration_gap"]["requested_country"], "ZZ");
    }

    #[test]
    fn presence_overlaps_its_halves() {
        assert!(DimensionKind::Presence.overlaps(DimensionKind::Categories));
        assert!(DimensionKind::Consistency.overlaps(DimensionKind::Presence));
        assert!(!DimensionKind::Categories.overlaps(DimensionKind::Consistency));
        assert!(DimensionKind::Visual.overlaps(DimensionKind::Visual));
        assert!(!DimensionKind::Visual.overlaps(DimensionKind::Ownership));
    }

    #[test]
    fn every_label_has_a_severity() {
        assert_eq!(ScoreLabel::Critical.severity(), Severity::Critical);
        assert_eq!(ScoreLabel::Excellent.severity(), Severity::Low);
        assert_eq!(ScoreLabel::Improvable.display_es(), "Mejorable");
    }
}
