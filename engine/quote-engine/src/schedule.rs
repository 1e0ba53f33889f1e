//! Deposit / progress / final payment split of the gross invoice

use crate::coercion::finite_or_zero;
use serde::{Deserialize, Serialize};

/// Schedule weights after clamping and normalization; sums to 100
/// (or to 0 when every raw weight was zero)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedWeights {
    pub deposit: f64,
    pub progress: f64,
    #[serde(rename = "final")]
    pub final_: f64,
}

/// Dollar amounts for each payment milestone
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub deposit_amount: f64,
    pub progress_amount: f64,
    pub final_amount: f64,
    pub normalized_weights: NormalizedWeights,
}

/// Clamp a raw weight into `[0, 100]`
#[inline]
pub fn clamp_weight(raw: f64) -> f64 {
    finite_or_zero(raw).clamp(0.0, 100.0)
}

/// Clamp each weight and rescale so the three sum to 100
pub fn normalize_weights(deposit: f64, progress: f64, final_: f64) -> NormalizedWeights {
    let d = clamp_weight(deposit);
    let p = clamp_weight(progress);
    let f = clamp_weight(final_);

    let mut sum = d + p + f;
    if sum == 0.0 {
        sum = 1.0;
    }

    NormalizedWeights {
        deposit: d / sum * 100.0,
        progress: p / sum * 100.0,
        final_: f / sum * 100.0,
    }
}

impl NormalizedWeights {
    pub fn total(&self) -> f64 {
        self.deposit + self.progress + self.final_
    }
}

impl PaymentSchedule {
    /// Split `gross` across the three milestones by normalized weight
    pub fn split(gross: f64, deposit: f64, progress: f64, final_: f64) -> Self {
        let weights = normalize_weights(deposit, progress, final_);
        Self {
            deposit_amount: gross * weights.deposit / 100.0,
            progress_amount: gross * weights.progress / 100.0,
            final_amount: gross * weights.final_ / 100.0,
            normalized_weights: weights,
        }
    }

    pub fn total(&self) -> f64 {
        self.deposit_amount + self.progress_amount + self.final_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_clamp_weight() {
        assert_eq!(clamp_weight(-5.0), 0.0);
        assert_eq!(clamp_weight(150.0), 100.0);
        assert_eq!(clamp_weight(42.0), 42.0);
        assert_eq!(clamp_weight(f64::NAN), 0.0);
    }

    #[test]
    fn test_weights_already_summing_to_100_are_unchanged() {
        let schedule = PaymentSchedule::split(1000.0, 30.0, 40.0, 30.0);
        assert!(approx(schedule.normalized_weights.deposit, 30.0));
        assert!(approx(schedule.normalized_weights.progress, 40.0));
        assert!(approx(schedule.normalized_weights.final_, 30.0));
        assert!(approx(schedule.deposit_amount, 300.0));
        assert!(approx(schedule.progress_amount, 400.0));
        assert!(approx(schedule.final_amount, 300.0));
    }

    #[test]
    fn test_weights_are_rescaled() {
        let w = normalize_weights(1.0, 1.0, 2.0);
        assert!(approx(w.deposit, 25.0));
        assert!(approx(w.progress, 25.0));
        assert!(approx(w.final_, 50.0));
        assert!(approx(w.total(), 100.0));
    }

    #[test]
    fn test_out_of_range_weights_are_clamped_before_normalizing() {
        // 250 -> 100, -20 -> 0
        let w = normalize_weights(250.0, -20.0, 100.0);
        assert!(approx(w.deposit, 50.0));
        assert_eq!(w.progress, 0.0);
        assert!(approx(w.final_, 50.0));
    }

    #[test]
    fn test_all_zero_weights_yield_zero_amounts() {
        let schedule = PaymentSchedule::split(1000.0, 0.0, 0.0, 0.0);
        assert_eq!(schedule.normalized_weights, NormalizedWeights::default());
        assert_eq!(schedule.deposit_amount, 0.0);
        assert_eq!(schedule.progress_amount, 0.0);
        assert_eq!(schedule.final_amount, 0.0);
    }

    #[test]
    fn test_serialized_weight_key_is_final() {
        let json = serde_json::to_value(normalize_weights(30.0, 40.0, 30.0)).unwrap();
        assert!(json.get("final").is_some());
    }
}
