//! Illustrative survival curves reconstructed from two median times.
//!
//! The statistics service estimates survival non-parametrically and returns
//! only the median time-to-event of each group. From a single median the only
//! curve that can be rebuilt is a one-parameter model, so each group is drawn
//! as an exponential distribution with that median:
//!
//! ```text
//! λ = ln 2 / median
//! S(t) = 100 · exp(-λ t)
//! ```
//!
//! The result conveys how much faster one group reaches its events than the
//! other. It approximates the service's estimate and does not reproduce its
//! steps.
//!
//! # Examples
//!
//! ```
//! use expviz_geometry::survival::approximate;
//!
//! let points = approximate(30.0, 24.0).unwrap();
//! assert_eq!(points.len(), 51);
//! assert_eq!(points[0].control, 100.0);
//! assert_eq!(points[0].treatment, 100.0);
//! ```

use std::f64::consts::LN_2;

use serde::{Deserialize, Serialize};

use crate::curve::linspace;

/// Number of samples per curve.
pub const POINT_COUNT: usize = 51;

/// The sampled time axis ends at this multiple of the larger median.
pub const HORIZON_MEDIANS: f64 = 2.0;

/// Exponential time-to-event model fully determined by its median.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialSurvival {
    median: f64,
}

impl ExponentialSurvival {
    /// Returns `None` unless `median` is positive and finite and gives a
    /// finite rate.
    #[must_use]
    pub fn from_median(median: f64) -> Option<Self> {
        (median.is_finite() && median > 0.0 && (LN_2 / median).is_finite())
            .then_some(Self { median })
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.median
    }

    /// Event rate `λ = ln 2 / median`.
    #[must_use]
    pub fn rate(&self) -> f64 {
        LN_2 / self.median
    }

    /// Percentage of subjects without an event at time `t`, in `[0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::survival::ExponentialSurvival;
    /// let model = ExponentialSurvival::from_median(10.0).unwrap();
    /// assert!((model.survival_at(10.0) - 50.0).abs() < 1e-9);
    /// assert_eq!(model.survival_at(0.0), 100.0);
    /// ```
    #[must_use]
    pub fn survival_at(&self, t: f64) -> f64 {
        (100.0 * (-self.rate() * t).exp()).clamp(0.0, 100.0)
    }
}

/// One time step of the two-group survival chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivalPoint {
    pub t: f64,
    /// Control survival, in percent.
    pub control: f64,
    /// Treatment survival, in percent.
    pub treatment: f64,
}

/// Samples both survival curves over `[0, 2 · max(median)]`.
///
/// Returns `None` if either median is missing, zero, or negative, or if the
/// time horizon overflows.
#[must_use]
pub fn approximate(control_median: f64, treatment_median: f64) -> Option<Vec<SurvivalPoint>> {
    let (Some(control), Some(treatment)) = (
        ExponentialSurvival::from_median(control_median),
        ExponentialSurvival::from_median(treatment_median),
    ) else {
        tracing::debug!(
            control_median,
            treatment_median,
            "median times unavailable, no survival curves"
        );
        return None;
    };

    let horizon = HORIZON_MEDIANS * control.median().max(treatment.median());
    if !horizon.is_finite() {
        tracing::debug!(horizon, "survival horizon overflows, no survival curves");
        return None;
    }
    let points = linspace(0.0, horizon, POINT_COUNT)
        .map(|t| SurvivalPoint {
            t,
            control: control.survival_at(t),
            treatment: treatment.survival_at(t),
        })
        .collect();
    Some(points)
}

/// Like [`approximate`], for optional service fields.
///
/// A median the service reports as "not reached" arrives as `None`.
#[must_use]
pub fn approximate_optional(
    control_median: Option<f64>,
    treatment_median: Option<f64>,
) -> Option<Vec<SurvivalPoint>> {
    approximate(control_median?, treatment_median?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_scenario() {
        let points = approximate(30.0, 24.0).unwrap();
        assert_eq!(points.len(), POINT_COUNT);
        assert_eq!(points.first().unwrap().t, 0.0);
        assert_eq!(points.last().unwrap().t, 60.0);

        for p in &points[1..] {
            assert!(p.treatment < p.control, "at t={}", p.t);
        }

        let control = ExponentialSurvival::from_median(30.0).unwrap();
        let treatment = ExponentialSurvival::from_median(24.0).unwrap();
        assert!((control.survival_at(30.0) - 50.0).abs() < 1e-9);
        assert!((treatment.survival_at(24.0) - 50.0).abs() < 1e-9);
        assert!(control.survival_at(30.0 + 1e-6) < 50.0);
        assert!(treatment.survival_at(24.0 + 1e-6) < 50.0);
    }

    #[test]
    fn test_grid_hits_median() {
        // Grid step is 60 / 50 = 1.2, so t = 30 is sample 25
        let points = approximate(30.0, 24.0).unwrap();
        let at_median = points[25];
        assert!((at_median.t - 30.0).abs() < 1e-9);
        assert!((at_median.control - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_curves_are_non_increasing_and_bounded() {
        let points = approximate(3.5, 120.0).unwrap();
        for pair in points.windows(2) {
            assert!(pair[1].control <= pair[0].control);
            assert!(pair[1].treatment <= pair[0].treatment);
        }
        for p in &points {
            assert!((0.0..=100.0).contains(&p.control));
            assert!((0.0..=100.0).contains(&p.treatment));
        }
    }

    #[test]
    fn test_invalid_medians() {
        assert!(approximate(0.0, 24.0).is_none());
        assert!(approximate(30.0, -1.0).is_none());
        assert!(approximate(f64::NAN, 24.0).is_none());
        assert!(approximate_optional(None, Some(24.0)).is_none());
        assert!(approximate_optional(Some(30.0), Some(24.0)).is_some());
    }

    #[test]
    fn test_extreme_medians() {
        assert!(ExponentialSurvival::from_median(1e-310).is_none());
        assert!(approximate(1e-310, 24.0).is_none());
        assert!(approximate(1e308, 24.0).is_none());

        let points = approximate(1e300, 1e-300).unwrap();
        for p in &points {
            assert!(p.t.is_finite());
            assert!((0.0..=100.0).contains(&p.control));
            assert!((0.0..=100.0).contains(&p.treatment));
        }
    }

    #[test]
    fn test_rate() {
        let model = ExponentialSurvival::from_median(LN_2).unwrap();
        assert!((model.rate() - 1.0).abs() < 1e-12);
    }
}
