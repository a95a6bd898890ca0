/// Confusion counts for one binary classification comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl ConfusionCounts {
    /// Tallies index-aligned actual/predicted flags in one pass.
    pub fn from_flags(actual: &[bool], predicted: &[bool]) -> Self {
        let mut counts = Self::default();
        for (a, p) in actual.iter().zip(predicted.iter()) {
            match (a, p) {
                (true, true) => counts.true_positives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        counts
    }

    /// TP / (TP + FP); NaN when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_positives,
        )
    }

    /// TP / (TP + FN); NaN when nothing was actually positive.
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positives,
            self.true_positives + self.false_negatives,
        )
    }

    /// F-beta from the raw counts: `(1+β²)·TP / ((1+β²)·TP + β²·FN + FP)`.
    /// NaN only when that denominator is zero, i.e. no positives exist on
    /// either side; equal to `(1+β²)·P·R / (β²·P + R)` wherever P and R are
    /// both defined.
    pub fn fbeta(&self, beta: f64) -> f64 {
        let beta_sq = beta * beta;
        let numer = (1.0 + beta_sq) * self.true_positives as f64;
        let denom =
            numer + beta_sq * self.false_negatives as f64 + self.false_positives as f64;
        if denom == 0.0 {
            return f64::NAN;
        }
        numer / denom
    }
}

fn ratio(numer: usize, denom: usize) -> f64 {
    if denom == 0 {
        return f64::NAN;
    }
    numer as f64 / denom as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_flags_tallies_each_quadrant() {
        let counts = ConfusionCounts::from_flags(
            &[true, false, true, false],
            &[true, true, false, false],
        );

        assert_eq!(
            counts,
            ConfusionCounts {
                true_positives: 1,
                false_positives: 1,
                false_negatives: 1,
                true_negatives: 1,
            }
        );
    }

    #[test]
    fn zero_denominators_yield_nan_not_zero() {
        let empty = ConfusionCounts::default();
        assert!(empty.precision().is_nan());
        assert!(empty.recall().is_nan());
        assert!(empty.fbeta(10.0).is_nan());

        // All true negatives: still nothing positive on either side.
        let negatives = ConfusionCounts::from_flags(&[false, false], &[false, false]);
        assert!(negatives.precision().is_nan());
        assert!(negatives.recall().is_nan());
        assert!(negatives.fbeta(10.0).is_nan());
    }

    #[test]
    fn fbeta_counter_form_matches_precision_recall_form() {
        let counts = ConfusionCounts {
            true_positives: 3,
            false_positives: 2,
            false_negatives: 1,
            true_negatives: 4,
        };

        let p = counts.precision();
        let r = counts.recall();
        for beta in [0.5, 1.0, 10.0] {
            let beta_sq = beta * beta;
            let from_rates = (1.0 + beta_sq) * p * r / (beta_sq * p + r);
            assert!(
                (counts.fbeta(beta) - from_rates).abs() < 1e-12,
                "beta={beta}: counter form {} vs rate form {}",
                counts.fbeta(beta),
                from_rates
            );
        }
    }

    #[test]
    fn fbeta10_on_known_counts() {
        // TP=2, FP=1, FN=1: P = R = 2/3, so every F-beta collapses to 2/3.
        let counts = ConfusionCounts {
            true_positives: 2,
            false_positives: 1,
            false_negatives: 1,
            true_negatives: 0,
        };
        assert!((counts.fbeta(10.0) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn beta_ten_weights_recall_far_above_precision() {
        // High recall (0.9), terrible precision (0.09).
        let counts = ConfusionCounts {
            true_positives: 9,
            false_positives: 91,
            false_negatives: 1,
            true_negatives: 0,
        };

        assert!((counts.recall() - 0.9).abs() < 1e-12);
        assert!(counts.precision() < 0.1);
        assert!(counts.fbeta(10.0) > 0.8, "tracks recall");
        assert!(counts.fbeta(1.0) < 0.2, "balanced F1 tracks the poor precision");
    }

    #[test]
    fn recall_zero_when_all_actual_positives_missed() {
        let counts = ConfusionCounts::from_flags(&[true, true], &[false, false]);
        assert_eq!(counts.recall(), 0.0);
        assert!(counts.precision().is_nan());
        assert_eq!(counts.fbeta(10.0), 0.0);
    }
}
