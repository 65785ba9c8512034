//! Score to estimated local-pack position.

use localvis_core::{RankEstimate, RankingConfig};

/// Position for `score` under the configured step table.
///
/// Steps are ordered by descending `min_score`; the first step the score
/// reaches wins. A validated table always ends at `min_score: 0`, so every
/// score maps to a rank.
#[must_use]
pub fn rank_at(score: u32, config: &RankingConfig) -> u32 {
    config
        .steps
        .iter()
        .find(|step| score >= step.min_score)
        .or(config.steps.last())
        .map_or(1, |step| step.rank)
}

/// Estimated rank plus the positions recoverable by reaching the good threshold.
#[must_use]
pub fn estimate_rank(total_score: u32, config: &RankingConfig) -> RankEstimate {
    let estimated_rank = rank_at(total_score, config);
    let target = rank_at(config.good_threshold, config);
    RankEstimate {
        estimated_rank,
        improvement_potential: estimated_rank.saturating_sub(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use localvis_core::RankStep;

    fn config() -> RankingConfig {
        RankingConfig {
            good_threshold: 85,
            steps: [(85, 1), (70, 3), (55, 6), (40, 10), (20, 15), (0, 20)]
                .into_iter()
                .map(|(min_score, rank)| RankStep { min_score, rank })
                .collect(),
        }
    }

    #[test]
    fn step_boundaries_are_inclusive() {
        let cfg = config();
        assert_eq!(rank_at(100, &cfg), 1);
        assert_eq!(rank_at(85, &cfg), 1);
        assert_eq!(rank_at(84, &cfg), 3);
        assert_eq!(rank_at(55, &cfg), 6);
        assert_eq!(rank_at(19, &cfg), 20);
        assert_eq!(rank_at(0, &cfg), 20);
    }

    #[test]
    fn rank_never_improves_as_score_drops() {
        let cfg = config();
        let ranks: Vec<u32> = (0..=100).rev().map(|s| rank_at(s, &cfg)).collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn improvement_potential_measured_against_good_threshold() {
        let cfg = config();
        assert_eq!(
            estimate_rank(0, &cfg),
            RankEstimate {
                estimated_rank: 20,
                improvement_potential: 19,
            }
        );
        assert_eq!(estimate_rank(62, &cfg).improvement_potential, 5);
        assert_eq!(estimate_rank(90, &cfg).improvement_potential, 0);
    }
}
