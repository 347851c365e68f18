// file: src/pipeline/estimator.rs
// description: time-based progress estimation for phases that expose no progress signal
// reference: linear interpolation within budget, asymptotic approach once over budget

use crate::config::MonitorConfig;

/// Maps elapsed time against a time budget onto a `[floor, ceiling]`
/// sub-range of the 0-100 scale.
///
/// Within budget the value rises linearly from `floor` to the knee at
/// `floor + (ceiling - floor) * linear_share`. Past the budget it follows
/// `knee + (ceiling - knee) * (1 - 1 / (1 + extra / decay))`, which starts
/// at the knee, keeps rising, and never reaches `ceiling`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimator {
    decay_secs: f64,
    linear_share: f64,
}

impl Estimator {
    pub fn new(decay_secs: f64, linear_share: f64) -> Self {
        Self {
            decay_secs: if decay_secs > 0.0 { decay_secs } else { 1.0 },
            linear_share: linear_share.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(config.decay_secs, config.linear_share)
    }

    pub fn estimate(&self, elapsed_secs: f64, budget_secs: f64, floor: f64, ceiling: f64) -> f64 {
        let floor = floor.clamp(0.0, 100.0);
        let ceiling = ceiling.clamp(floor, 100.0);
        let elapsed = if elapsed_secs.is_finite() {
            elapsed_secs.max(0.0)
        } else {
            0.0
        };
        let knee = floor + (ceiling - floor) * self.linear_share;

        let progress = if budget_secs.is_finite() && budget_secs > 0.0 && elapsed < budget_secs {
            floor + (knee - floor) * (elapsed / budget_secs)
        } else {
            let budget = if budget_secs.is_finite() {
                budget_secs.max(0.0)
            } else {
                0.0
            };
            let extra = elapsed - budget;
            knee + (ceiling - knee) * (1.0 - 1.0 / (1.0 + extra / self.decay_secs))
        };

        progress.clamp(0.0, 100.0)
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOOR: f64 = 30.0;
    const CEILING: f64 = 95.0;

    #[test]
    fn test_linear_phase_is_bounded_and_increasing() {
        let estimator = Estimator::default();
        let budget = 20.0;
        let mut previous = f64::MIN;

        for step in 0..200 {
            let elapsed = step as f64 * 0.1;
            let value = estimator.estimate(elapsed, budget, FLOOR, CEILING);
            assert!((FLOOR..=CEILING).contains(&value), "{} out of range", value);
            assert!(value > previous, "not increasing at {}s", elapsed);
            previous = value;
        }
    }

    #[test]
    fn test_starts_at_floor() {
        let estimator = Estimator::default();
        assert_eq!(estimator.estimate(0.0, 20.0, FLOOR, CEILING), FLOOR);
    }

    #[test]
    fn test_overrun_is_increasing_and_never_reaches_ceiling() {
        let estimator = Estimator::default();
        let budget = 10.0;
        let mut previous = estimator.estimate(budget, budget, FLOOR, CEILING);

        for extra in [0.5, 1.0, 5.0, 30.0, 120.0, 600.0, 3600.0] {
            let value = estimator.estimate(budget + extra, budget, FLOOR, CEILING);
            assert!(value > previous, "not increasing at +{}s", extra);
            assert!(value < CEILING, "reached ceiling at +{}s", extra);
            previous = value;
        }
    }

    #[test]
    fn test_continuous_at_budget_boundary() {
        let estimator = Estimator::new(5.0, 0.9);
        let budget = 12.0;
        let before = estimator.estimate(budget - 1e-9, budget, FLOOR, CEILING);
        let at = estimator.estimate(budget, budget, FLOOR, CEILING);

        let knee = FLOOR + (CEILING - FLOOR) * 0.9;
        assert!((at - knee).abs() < 1e-9);
        assert!(at >= before);
        assert!((at - before) < 1e-6);
    }

    #[test]
    fn test_degenerate_inputs_stay_in_range() {
        let estimator = Estimator::default();

        let zero_budget = estimator.estimate(3.0, 0.0, FLOOR, CEILING);
        assert!((FLOOR..CEILING).contains(&zero_budget));

        let nan_elapsed = estimator.estimate(f64::NAN, 10.0, FLOOR, CEILING);
        assert_eq!(nan_elapsed, FLOOR);

        let wide = estimator.estimate(50.0, 1.0, -20.0, 180.0);
        assert!((0.0..=100.0).contains(&wide));
    }
}
