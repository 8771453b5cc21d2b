//! THERAPEUTIC SCORE
//!
//! Weighted blend of per-effect potency and evidence. Potency carries more
//! weight than evidence so efficacy outranks research maturity.
//!
//! Inputs are expected in [0, 1]; nothing is clamped here. With valid inputs
//! the result is also in [0, 1] because the weights sum to 1.

pub const THERAPEUTIC_POTENCY_WEIGHT: f64 = 0.7;
pub const THERAPEUTIC_EVIDENCE_WEIGHT: f64 = 0.3;

/// `0.7 * potency + 0.3 * evidence`
pub fn therapeutic_score(potency: f64, evidence: f64) -> f64 {
    THERAPEUTIC_POTENCY_WEIGHT * potency + THERAPEUTIC_EVIDENCE_WEIGHT * evidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_one() {
        assert_relative_eq!(
            THERAPEUTIC_POTENCY_WEIGHT + THERAPEUTIC_EVIDENCE_WEIGHT,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_known_values() {
        assert_relative_eq!(therapeutic_score(0.9, 0.5), 0.78, epsilon = 1e-9);
        assert_relative_eq!(therapeutic_score(0.6, 0.9), 0.69, epsilon = 1e-9);
        assert_relative_eq!(therapeutic_score(0.6, 0.5), 0.57, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_over_unit_grid() {
        for i in 0..=10 {
            for j in 0..=10 {
                let (p, e) = (i as f64 / 10.0, j as f64 / 10.0);
                let score = therapeutic_score(p, e);
                assert_relative_eq!(score, 0.7 * p + 0.3 * e, epsilon = 1e-12);
                assert!((0.0..=1.0 + 1e-12).contains(&score));
            }
        }
    }

    #[test]
    fn test_no_clamping_outside_range() {
        // Out-of-range data passes straight through
        assert_relative_eq!(therapeutic_score(2.0, 0.0), 1.4, epsilon = 1e-9);
    }

    #[test]
    fn test_reproducible() {
        assert_eq!(
            therapeutic_score(0.37, 0.81).to_bits(),
            therapeutic_score(0.37, 0.81).to_bits()
        );
    }
}
