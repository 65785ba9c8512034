use localvis_core::ScoreLabel;

/// Lower bound of each band, highest first. Bands are `[lo, hi)`.
const BANDS: [(u32, ScoreLabel); 4] = [
    (85, ScoreLabel::Excellent),
    (70, ScoreLabel::Good),
    (40, ScoreLabel::Improvable),
    (0, ScoreLabel::Critical),
];

/// Maps a total score to its band label.
#[must_use]
pub fn classify(total_score: u32) -> ScoreLabel {
    BANDS
        .iter()
        .find(|(lo, _)| total_score >= *lo)
        .map_or(ScoreLabel::Critical, |(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(classify(0), ScoreLabel::Critical);
        assert_eq!(classify(39), ScoreLabel::Critical);
        assert_eq!(classify(40), ScoreLabel::Improvable);
        assert_eq!(classify(69), ScoreLabel::Improvable);
        assert_eq!(classify(70), ScoreLabel::Good);
        assert_eq!(classify(84), ScoreLabel::Good);
        assert_eq!(classify(85), ScoreLabel::Excellent);
        assert_eq!(classify(100), ScoreLabel::Excellent);
    }

    #[test]
    fn labels_change_only_at_band_edges() {
        let changes: Vec<u32> = (1..=100)
            .filter(|s| classify(*s) != classify(s - 1))
            .collect();
        assert_eq!(changes, vec![40, 70, 85]);
    }
}
