use super::*;

fn real_config_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("engine.yaml")
}

fn minimal_yaml() -> String {
    r#"
default_weight_table: standard
weight_tables:
  standard:
    - { dimension: reputation, weight: 40 }
    - { dimension: ownership, weight: 25 }
    - { dimension: visual, weight: 20 }
    - { dimension: presence, weight: 15 }
scoring:
  rating_share: 0.6
  review_saturation: 500
  photo_count_share: 0.5
  photo_saturation: 100
  category_cap: 3
thresholds:
  photo_fresh_days: 30
  photo_stale_days: 180
  min_reviews: 10
conversion_rate: "0.03"
default_market:
  name: Default
  monthly_search_volume: 1000
  average_ticket: "20"
  currency: USD
markets:
  AR:
    name: Argentina
    monthly_search_volume: 2500
    average_ticket: "15000"
    currency: ARS
ranking:
  good_threshold: 85
  steps:
    - { min_score: 85, rank: 1 }
    - { min_score: 50, rank: 5 }
    - { min_score: 0, rank: 12 }
"#
    .to_string()
}

fn entry(dimension: DimensionKind, weight: u32) -> WeightEntry {
    WeightEntry { dimension, weight }
}

#[test]
fn load_engine_config_from_real_file() {
    let path = real_config_path();
    assert!(
        path.exists(),
        "engine.yaml missing at {path:?}; required for this test"
    );
    let config = load_engine_config(&path).expect("engine.yaml should validate");
    assert_eq!(config.default_weight_table, "standard");
    assert!(config.weight_table("standard").is_some());
    assert!(config.weight_table("balanced").is_some());
    assert!(config.markets.contains_key("AR"));
}

#[test]
fn real_tables_match_built_in_tables() {
    let config = load_engine_config(&real_config_path()).unwrap();
    assert_eq!(
        config.weight_table("standard"),
        Some(&DimensionWeightTable::standard())
    );
    assert_eq!(
        config.weight_table("balanced"),
        Some(&DimensionWeightTable::balanced())
    );
}

#[test]
fn minimal_config_parses() {
    let config = EngineConfig::from_yaml_str(&minimal_yaml()).unwrap();
    assert_eq!(config.conversion_rate, Decimal::new(3, 2));
    assert_eq!(config.ranking.steps.len(), 3);
}

#[test]
fn built_in_tables_sum_to_100() {
    for table in [DimensionWeightTable::standard(), DimensionWeightTable::balanced()] {
        let sum: u32 = table.entries().iter().map(|e| e.weight).sum();
        assert_eq!(sum, TOTAL_POINTS, "weights must sum to 100, got {sum}");
        assert!(DimensionWeightTable::new(table.entries().to_vec()).is_ok());
    }
}

#[test]
fn table_rejects_bad_sum() {
    let err = DimensionWeightTable::new(vec![
        entry(DimensionKind::Ownership, 50),
        entry(DimensionKind::Reputation, 40),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("sum to exactly 100, got 90"));
}

#[test]
fn table_rejects_weights_that_wrap_to_100() {
    // u32::MAX + 101 wraps to exactly 100 in a plain u32 sum
    let err = DimensionWeightTable::new(vec![
        entry(DimensionKind::Ownership, u32::MAX),
        entry(DimensionKind::Reputation, 101),
    ])
    .unwrap_err();
    assert!(
        err.to_string().contains("'ownership' weight 4294967295 exceeds 100"),
        "got {err}"
    );
}

#[test]
fn table_rejects_single_weight_above_total() {
    let err = DimensionWeightTable::new(vec![entry(DimensionKind::Ownership, 101)]).unwrap_err();
    assert!(err.to_string().contains("exceeds 100"), "got {err}");
}

#[test]
fn yaml_table_with_overflowing_weights_fails_to_parse() {
    let yaml = minimal_yaml()
        .replace("weight: 40", "weight: 4294967295")
        .replace("weight: 25", "weight: 0")
        .replace("weight: 20", "weight: 0")
        .replace("weight: 15", "weight: 101");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::EngineConfigParse(_)), "got {err:?}");
    assert!(err.to_string().contains("exceeds 100"), "got {err}");
}

#[test]
fn table_rejects_duplicate_dimension() {
    let err = DimensionWeightTable::new(vec![
        entry(DimensionKind::Ownership, 50),
        entry(DimensionKind::Ownership, 50),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("score the same signals"));
}

#[test]
fn table_rejects_presence_with_categories() {
    let err = DimensionWeightTable::new(vec![
        entry(DimensionKind::Presence, 50),
        entry(DimensionKind::Categories, 50),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("'presence' and 'categories'"));
}

#[test]
fn table_rejects_empty() {
    assert!(DimensionWeightTable::new(vec![]).is_err());
}

#[test]
fn yaml_table_with_bad_sum_fails_to_parse() {
    let yaml = minimal_yaml().replace("weight: 15", "weight: 16");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::EngineConfigParse(_)), "got {err:?}");
    assert!(err.to_string().contains("got 101"));
}

#[test]
fn unknown_default_table_rejected() {
    let yaml = minimal_yaml().replace("default_weight_table: standard", "default_weight_table: nope");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    assert!(err.to_string().contains("'nope' is not defined"));
}

#[test]
fn conversion_rate_out_of_range_rejected() {
    let yaml = minimal_yaml().replace("conversion_rate: \"0.03\"", "conversion_rate: \"1.5\"");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    assert!(err.to_string().contains("conversion_rate"));
}

#[test]
fn fresh_days_must_precede_stale_days() {
    let yaml = minimal_yaml().replace("photo_fresh_days: 30", "photo_fresh_days: 200");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    assert!(err.to_string().contains("photo_fresh_days"));
}

#[test]
fn lowercase_market_key_rejected() {
    let yaml = minimal_yaml().replace("  AR:\n", "  ar:\n");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    assert!(err.to_string().contains("markets.ar"));
}

#[test]
fn ranking_steps_must_descend_and_end_at_zero() {
    let yaml = minimal_yaml().replace("- { min_score: 0, rank: 12 }", "- { min_score: 60, rank: 12 }");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("last step must start at min_score 0"), "{msg}");
    assert!(msg.contains("strictly descending"), "{msg}");
}

#[test]
fn validation_collects_all_errors() {
    let yaml = minimal_yaml()
        .replace("conversion_rate: \"0.03\"", "conversion_rate: \"0\"")
        .replace("monthly_search_volume: 1000", "monthly_search_volume: 0");
    let err = EngineConfig::from_yaml_str(&yaml).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("conversion_rate"), "{msg}");
    assert!(msg.contains("default_market.monthly_search_volume"), "{msg}");
}

#[test]
fn unknown_fields_rejected() {
    let yaml = format!("{}\nsurprise: true\n", minimal_yaml());
    assert!(EngineConfig::from_yaml_str(&yaml).is_err());
}

#[test]
fn market_for_known_country() {
    let config = EngineConfig::from_yaml_str(&minimal_yaml()).unwrap();
    let (selection, gap) = config.market_for(" ar ");
    assert_eq!(selection.key, "AR");
    assert_eq!(selection.profile.currency, "ARS");
    assert!(gap.is_none());
}

#[test]
fn market_for_unknown_country_falls_back() {
    let config = EngineConfig::from_yaml_str(&minimal_yaml()).unwrap();
    let (selection, gap) = config.market_for("ZZ");
    assert_eq!(selection.key, DEFAULT_MARKET_KEY);
    assert_eq!(selection.profile.currency, "USD");
    let gap = gap.expect("fallback must be reported");
    assert_eq!(gap.requested_country, "ZZ");
    assert_eq!(gap.fallback_market, DEFAULT_MARKET_KEY);
}

#[test]
fn weight_of_reports_absent_dimension() {
    let table = DimensionWeightTable::standard();
    assert_eq!(table.weight_of(DimensionKind::Reputation), Some(40));
    assert_eq!(table.weight_of(DimensionKind::Categories), None);
}
