//! Tests for the evaluation engine.

use proptest::prelude::*;

use super::{BandPolicy, EvaluationPolicy, ServiceLevel, SlaTerms, UnknownServiceLevel};

fn gold_terms() -> SlaTerms {
    SlaTerms {
        service_level: ServiceLevel::Gold,
        target_grass_length: 5.5,
        max_grass_length: 7.0,
        min_grass_length: 3.0,
    }
}

#[test]
fn appraisal_is_deterministic() {
    let policy = BandPolicy;
    let terms = gold_terms();
    assert_eq!(policy.appraise(&terms), policy.appraise(&terms));
}

#[test]
fn gold_terms_score_matches_documented_formula() {
    // weight 3 * 1000 + round(100 * 4.0) + round(10 * 2.5)
    assert_eq!(BandPolicy.appraise(&gold_terms()), 3_000 + 400 + 25);
}

#[test]
fn higher_tier_scores_strictly_higher_for_fixed_band() {
    let policy = BandPolicy;
    let mut terms = gold_terms();

    let mut previous = None;
    for level in [
        ServiceLevel::Bronze,
        ServiceLevel::Silver,
        ServiceLevel::Gold,
        ServiceLevel::Platinum,
    ] {
        terms.service_level = level;
        let score = policy.appraise(&terms);
        if let Some(prior) = previous {
            assert!(score > prior, "{level} must outscore the tier below");
        }
        previous = Some(score);
    }
}

#[test]
fn service_level_labels_round_trip() {
    for level in [
        ServiceLevel::Bronze,
        ServiceLevel::Silver,
        ServiceLevel::Gold,
        ServiceLevel::Platinum,
    ] {
        assert_eq!(level.as_str().parse::<ServiceLevel>().unwrap(), level);
    }

    assert_eq!(
        "Copper".parse::<ServiceLevel>(),
        Err(UnknownServiceLevel {
            label: "Copper".to_owned()
        })
    );
}

#[test]
fn interval_validity() {
    let mut terms = gold_terms();
    assert!(terms.interval_is_valid());

    terms.target_grass_length = 8.0;
    assert!(!terms.interval_is_valid(), "target above max");

    terms.target_grass_length = 2.0;
    assert!(!terms.interval_is_valid(), "target below min");

    // Degenerate band where all three coincide is allowed.
    terms.target_grass_length = 3.0;
    terms.max_grass_length = 3.0;
    assert!(terms.interval_is_valid());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: appraisal is a pure function of the terms.
    #[test]
    fn prop_identical_terms_identical_score(
        target in 0.0f64..50.0,
        spread in 0.0f64..20.0,
    ) {
        let terms = SlaTerms {
            service_level: ServiceLevel::Silver,
            target_grass_length: target,
            max_grass_length: target + spread,
            min_grass_length: target - spread,
        };
        let first = BandPolicy.appraise(&terms);
        let second = BandPolicy.appraise(&terms);
        prop_assert_eq!(first, second);
    }
}
