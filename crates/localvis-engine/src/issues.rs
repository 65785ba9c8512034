//! Threshold rules that turn weak signals into reportable issues.

use localvis_core::{
    BusinessSignals, CriticalIssue, DimensionKind, DimensionScore, IssueKind, PhotoRecency,
    RevenueLossEstimate, Thresholds,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Dimensions that consume the signal behind each issue, in lookup order.
fn owning_dimensions(kind: IssueKind) -> &'static [DimensionKind] {
    match kind {
        IssueKind::UnclaimedListing => &[DimensionKind::Ownership],
        IssueKind::NoWebsite => &[DimensionKind::Presence, DimensionKind::Consistency],
        IssueKind::StalePhotos => &[DimensionKind::Visual],
        IssueKind::InsufficientSocialProof => &[DimensionKind::Reputation],
        IssueKind::MissingPrimaryCategory => &[DimensionKind::Presence, DimensionKind::Categories],
    }
}

/// Runs every rule against `signals` and returns the issues that fired.
///
/// Each dimension's share of `loss.monthly_loss` is proportional to its point
/// deficit and is split evenly between the issues that fired on it, so the
/// impacts never add up to more than the whole loss. Issues are ordered by
/// dimension deficit, largest first; ties keep rule order.
#[must_use]
pub fn detect(
    signals: &BusinessSignals,
    dimensions: &[DimensionScore],
    thresholds: &Thresholds,
    loss: &RevenueLossEstimate,
) -> Vec<CriticalIssue> {
    let total_deficit: u32 = dimensions.iter().map(DimensionScore::deficit).sum();

    let fired: Vec<(Option<&DimensionScore>, (IssueKind, String, String))> =
        rules(signals, thresholds)
            .into_iter()
            .map(|rule| (owning_dimension(rule.0, dimensions), rule))
            .collect();

    let mut priced: Vec<(u32, CriticalIssue)> = fired
        .iter()
        .map(|(owner, (kind, title, description))| {
            let deficit = owner.map_or(0, DimensionScore::deficit);
            let sharing = fired
                .iter()
                .filter(|(other, _)| same_dimension(*owner, *other))
                .count();
            let issue = CriticalIssue {
                kind: *kind,
                title: title.clone(),
                description: description.clone(),
                estimated_monthly_impact: impact_share(
                    loss.monthly_loss,
                    deficit,
                    total_deficit,
                    sharing,
                ),
            };
            (deficit, issue)
        })
        .collect();

    priced.sort_by(|a, b| b.0.cmp(&a.0));
    priced.into_iter().map(|(_, issue)| issue).collect()
}

fn rules(signals: &BusinessSignals, thresholds: &Thresholds) -> Vec<(IssueKind, String, String)> {
    let mut out = Vec::new();

    if !signals.is_claimed {
        out.push((
            IssueKind::UnclaimedListing,
            "Ficha no reclamada".to_string(),
            "Nadie verificó la propiedad del perfil: cualquiera puede sugerir cambios \
             y el negocio no puede responder reseñas."
                .to_string(),
        ));
    }

    if !signals.has_website {
        out.push((
            IssueKind::NoWebsite,
            "Sin sitio web".to_string(),
            "El perfil no enlaza a un sitio web activo, lo que resta relevancia \
             frente a competidores que sí lo tienen."
                .to_string(),
        ));
    }

    match signals.days_since_last_photo {
        PhotoRecency::Unknown => out.push((
            IssueKind::StalePhotos,
            "Fotos desactualizadas".to_string(),
            "No se pudo determinar la fecha de la última foto publicada.".to_string(),
        )),
        PhotoRecency::Days(days) if days >= thresholds.photo_stale_days => out.push((
            IssueKind::StalePhotos,
            "Fotos desactualizadas".to_string(),
            format!("La última foto se publicó hace {days} días."),
        )),
        PhotoRecency::Days(_) => {}
    }

    if signals.review_count < thresholds.min_reviews {
        let description = if signals.review_count_missing {
            format!(
                "No se indicó la cantidad de reseñas; se asumió cero. Se recomiendan \
                 al menos {} reseñas.",
                thresholds.min_reviews
            )
        } else {
            format!(
                "El perfil tiene {} reseñas; se recomiendan al menos {}.",
                signals.review_count, thresholds.min_reviews
            )
        };
        out.push((
            IssueKind::InsufficientSocialProof,
            "Pocas reseñas".to_string(),
            description,
        ));
    }

    if signals.primary_category.is_none() {
        out.push((
            IssueKind::MissingPrimaryCategory,
            "Sin categoría principal".to_string(),
            "Sin categoría principal el perfil no aparece en búsquedas por rubro.".to_string(),
        ));
    }

    out
}

/// First dimension in the table that owns `kind`, or `None` when the table
/// does not score that signal at all.
fn owning_dimension(kind: IssueKind, dimensions: &[DimensionScore]) -> Option<&DimensionScore> {
    owning_dimensions(kind)
        .iter()
        .find_map(|owner| dimensions.iter().find(|d| d.name == *owner))
}

fn same_dimension(a: Option<&DimensionScore>, b: Option<&DimensionScore>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.name == b.name,
        _ => false,
    }
}

/// Truncated to cents so the rounded shares stay within `monthly_loss`.
fn impact_share(monthly_loss: Decimal, deficit: u32, total_deficit: u32, sharing: usize) -> Decimal {
    if deficit == 0 || total_deficit == 0 || sharing == 0 {
        return Decimal::ZERO;
    }
    (monthly_loss * Decimal::from(deficit) / Decimal::from(total_deficit) / Decimal::from(sharing))
        .round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            photo_fresh_days: 30,
            photo_stale_days: 180,
            min_reviews: 10,
        }
    }

    fn loss(monthly: i64) -> RevenueLossEstimate {
        RevenueLossEstimate {
            lost_customers_per_month: 10,
            monthly_loss: Decimal::from(monthly),
            annual_loss: Decimal::from(monthly * 12),
            currency: "ARS".to_string(),
        }
    }

    fn dim(name: DimensionKind, points: u32, max_points: u32) -> DimensionScore {
        DimensionScore {
            name,
            points,
            max_points,
        }
    }

    fn healthy() -> BusinessSignals {
        BusinessSignals {
            business_name: None,
            rating: 4.8,
            review_count: 120,
            review_count_missing: false,
            is_claimed: true,
            photo_count: 60,
            days_since_last_photo: PhotoRecency::Days(10),
            primary_category: Some("Pizzería".to_string()),
            additional_category_count: 2,
            has_website: true,
            nap_consistent: true,
            country_code: "AR".to_string(),
        }
    }

    fn standard_dims() -> Vec<DimensionScore> {
        vec![
            dim(DimensionKind::Reputation, 30, 40),
            dim(DimensionKind::Ownership, 0, 25),
            dim(DimensionKind::Visual, 18, 20),
            dim(DimensionKind::Presence, 7, 15),
        ]
    }

    fn kinds(issues: &[CriticalIssue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn healthy_listing_has_no_issues() {
        let issues = detect(&healthy(), &standard_dims(), &thresholds(), &loss(1000));
        assert!(issues.is_empty());
    }

    #[test]
    fn every_rule_fires_for_empty_listing() {
        let signals = BusinessSignals {
            rating: 0.0,
            review_count: 0,
            is_claimed: false,
            photo_count: 0,
            days_since_last_photo: PhotoRecency::Unknown,
            primary_category: None,
            additional_category_count: 0,
            has_website: false,
            nap_consistent: false,
            ..healthy()
        };
        let dims = vec![
            dim(DimensionKind::Reputation, 0, 40),
            dim(DimensionKind::Ownership, 0, 25),
            dim(DimensionKind::Visual, 0, 20),
            dim(DimensionKind::Presence, 0, 15),
        ];
        let issues = detect(&signals, &dims, &thresholds(), &loss(1000));
        assert_eq!(
            kinds(&issues),
            vec![
                IssueKind::InsufficientSocialProof,
                IssueKind::UnclaimedListing,
                IssueKind::StalePhotos,
                IssueKind::NoWebsite,
                IssueKind::MissingPrimaryCategory,
            ]
        );
    }

    #[test]
    fn impact_is_proportional_to_dimension_deficit() {
        let signals = BusinessSignals {
            is_claimed: false,
            ..healthy()
        };
        // total deficit = 10 + 25 + 2 + 8 = 45
        let issues = detect(&signals, &standard_dims(), &thresholds(), &loss(900));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].estimated_monthly_impact, Decimal::from(500));
    }

    #[test]
    fn impact_rounds_to_cents() {
        let signals = BusinessSignals {
            has_website: false,
            ..healthy()
        };
        // presence deficit 8 of 45: 100 * 8 / 45 = 17.777...
        let issues = detect(&signals, &standard_dims(), &thresholds(), &loss(100));
        assert_eq!(issues[0].estimated_monthly_impact, Decimal::new(1777, 2));
    }

    #[test]
    fn issues_sorted_by_deficit_with_rule_order_for_ties() {
        let signals = BusinessSignals {
            is_claimed: false,
            has_website: false,
            primary_category: None,
            ..healthy()
        };
        let issues = detect(&signals, &standard_dims(), &thresholds(), &loss(900));
        // ownership deficit 25, then website and category both on presence (8)
        assert_eq!(
            kinds(&issues),
            vec![
                IssueKind::UnclaimedListing,
                IssueKind::NoWebsite,
                IssueKind::MissingPrimaryCategory,
            ]
        );
        // presence share 900 * 8 / 45 = 160, split between both issues
        assert_eq!(issues[0].estimated_monthly_impact, Decimal::from(500));
        assert_eq!(issues[1].estimated_monthly_impact, Decimal::from(80));
        assert_eq!(issues[2].estimated_monthly_impact, Decimal::from(80));
    }

    #[test]
    fn issues_sharing_a_dimension_never_exceed_monthly_loss() {
        let signals = BusinessSignals {
            rating: 0.0,
            review_count: 0,
            is_claimed: false,
            photo_count: 0,
            days_since_last_photo: PhotoRecency::Unknown,
            primary_category: None,
            has_website: false,
            ..healthy()
        };
        let dims = vec![
            dim(DimensionKind::Reputation, 0, 40),
            dim(DimensionKind::Ownership, 0, 25),
            dim(DimensionKind::Visual, 0, 20),
            dim(DimensionKind::Presence, 0, 15),
        ];
        let issues = detect(&signals, &dims, &thresholds(), &loss(1_125_000));
        let impacts: Vec<Decimal> = issues.iter().map(|i| i.estimated_monthly_impact).collect();
        assert_eq!(
            impacts,
            vec![
                Decimal::from(450_000),
                Decimal::from(281_250),
                Decimal::from(225_000),
                Decimal::from(84_375),
                Decimal::from(84_375),
            ]
        );
        assert_eq!(impacts.iter().copied().sum::<Decimal>(), Decimal::from(1_125_000));
    }

    #[test]
    fn uneven_split_truncates_below_monthly_loss() {
        let signals = BusinessSignals {
            has_website: false,
            primary_category: None,
            ..healthy()
        };
        let dims = vec![dim(DimensionKind::Presence, 0, 15)];
        // 0.05 split two ways is 0.025 each, truncated to 0.02
        let mut small = loss(0);
        small.monthly_loss = Decimal::new(5, 2);
        let issues = detect(&signals, &dims, &thresholds(), &small);
        let total: Decimal = issues.iter().map(|i| i.estimated_monthly_impact).sum();
        assert_eq!(total, Decimal::new(4, 2));
        assert!(total <= small.monthly_loss);
    }

    #[test]
    fn issue_maps_to_split_dimensions_in_balanced_table() {
        let signals = BusinessSignals {
            has_website: false,
            primary_category: None,
            ..healthy()
        };
        let dims = vec![
            dim(DimensionKind::Ownership, 20, 20),
            dim(DimensionKind::Reputation, 20, 20),
            dim(DimensionKind::Visual, 20, 20),
            dim(DimensionKind::Categories, 8, 20),
            dim(DimensionKind::Consistency, 10, 20),
        ];
        let issues = detect(&signals, &dims, &thresholds(), &loss(220));
        assert_eq!(
            kinds(&issues),
            vec![IssueKind::MissingPrimaryCategory, IssueKind::NoWebsite]
        );
        assert_eq!(issues[0].estimated_monthly_impact, Decimal::from(120));
        assert_eq!(issues[1].estimated_monthly_impact, Decimal::from(100));
    }

    #[test]
    fn stale_photo_threshold_is_inclusive() {
        let mut signals = healthy();
        signals.days_since_last_photo = PhotoRecency::Days(179);
        assert!(detect(&signals, &standard_dims(), &thresholds(), &loss(0)).is_empty());

        signals.days_since_last_photo = PhotoRecency::Days(180);
        let issues = detect(&signals, &standard_dims(), &thresholds(), &loss(0));
        assert_eq!(kinds(&issues), vec![IssueKind::StalePhotos]);
        assert!(issues[0].description.contains("180"));
    }

    #[test]
    fn missing_review_count_changes_wording() {
        let signals = BusinessSignals {
            review_count: 0,
            review_count_missing: true,
            ..healthy()
        };
        let issues = detect(&signals, &standard_dims(), &thresholds(), &loss(0));
        assert_eq!(kinds(&issues), vec![IssueKind::InsufficientSocialProof]);
        assert!(issues[0].description.contains("No se indicó"));
    }

    #[test]
    fn zero_loss_gives_zero_impact() {
        let signals = BusinessSignals {
            is_claimed: false,
            ..healthy()
        };
        let issues = detect(&signals, &standard_dims(), &thresholds(), &loss(0));
        assert_eq!(issues[0].estimated_monthly_impact, Decimal::ZERO);
    }
}
