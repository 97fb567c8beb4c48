//! Scoring policies.

use super::SlaTerms;

/// A pure scoring rule over SLA terms.
///
/// Implementations must be deterministic and side-effect-free: the score
/// is a function of the four term fields and nothing else. Handlers call
/// back into the policy on every term change, so policies must not cache.
pub trait EvaluationPolicy {
    /// Scores `terms`. Pure.
    fn appraise(&self, terms: &SlaTerms) -> i64;
}

/// Default scoring rule.
///
/// The appraised value rewards the service tier first and the tolerance
/// band geometry second:
///
/// ```text
/// appraise = weight(level) * 1000
///          + round(100 * (max - min))        band width
///          + round( 10 * (target - min))     headroom below target
/// ```
///
/// All terms are at wire precision, so the two rounded components are
/// stable across the string round trip. The tier weight dominates:
/// for a fixed band, a higher tier always scores strictly higher.
#[derive(Debug, Clone, Copy, Default)]
pub struct BandPolicy;

impl EvaluationPolicy for BandPolicy {
    #[allow(clippy::cast_possible_truncation)]
    fn appraise(&self, terms: &SlaTerms) -> i64 {
        let band = terms.max_grass_length - terms.min_grass_length;
        let headroom = terms.target_grass_length - terms.min_grass_length;

        terms.service_level.weight() * 1_000
            + (100.0 * band).round() as i64
            + (10.0 * headroom).round() as i64
    }
}
