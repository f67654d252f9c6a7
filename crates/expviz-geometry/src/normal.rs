//! Overlaid bell curves for comparing two group means.
//!
//! Each group's mean is drawn as a normal density whose width is the group's
//! standard error. Real standard errors at realistic sample sizes are far too
//! narrow to see, so the width is widened by [`DISPLAY_SCALE`]. The result is
//! an illustration of relative uncertainty and carries no statistical meaning
//! on its own.
//!
//! # Examples
//!
//! ```
//! use expviz_geometry::{normal::DistributionInput, summary::MetricKind};
//!
//! let input = DistributionInput::new(0.05, 0.06, 10_000, 10_000, MetricKind::Proportion);
//! let curves = input.synthesize().unwrap();
//! assert_eq!(curves.control.len(), 101);
//! assert_eq!(curves.variant.len(), 101);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::{
    curve::{CurvePoint, linspace},
    range::DisplayWindow,
    summary::{MetricKind, SummaryStat},
};

/// Display-only widening applied to every standard error.
pub const DISPLAY_SCALE: f64 = 10.0;

/// Smallest display standard deviation, keeping zero-variance groups drawable.
pub const MIN_DISPLAY_STD: f64 = 0.001;

/// Half-width of the x-domain, in display standard deviations.
pub const DOMAIN_HALF_WIDTH: f64 = 4.0;

/// Number of samples per series.
pub const POINT_COUNT: usize = 101;

/// Standard deviation used for a continuous group when neither group has one.
const DEFAULT_STD: f64 = 1.0;

/// Density of the normal distribution `N(mean, std²)` at `x`.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::normal::normal_pdf;
/// let peak = normal_pdf(0.0, 0.0, 1.0);
/// assert!((peak - 0.398_942_280_401_432_7).abs() < 1e-12);
/// ```
#[must_use]
pub fn normal_pdf(x: f64, mean: f64, std: f64) -> f64 {
    let coefficient = 1.0 / (std * (2.0 * PI).sqrt());
    let z = (x - mean) / std;
    coefficient * (-0.5 * z * z).exp()
}

/// Inputs for the distribution comparison chart.
///
/// A zero mean or a zero sample size means "not entered yet"; see
/// [`synthesize`](Self::synthesize).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionInput {
    pub control_mean: f64,
    pub variant_mean: f64,
    pub control_n: u64,
    pub variant_n: u64,
    pub control_std: Option<f64>,
    pub variant_std: Option<f64>,
    pub kind: MetricKind,
}

/// Two density series sampled on a shared x-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalCurves {
    pub control: Vec<CurvePoint>,
    pub variant: Vec<CurvePoint>,
    /// The x-domain both series span.
    pub domain: DisplayWindow,
    pub control_display_std: f64,
    pub variant_display_std: f64,
}

impl DistributionInput {
    #[must_use]
    pub fn new(
        control_mean: f64,
        variant_mean: f64,
        control_n: u64,
        variant_n: u64,
        kind: MetricKind,
    ) -> Self {
        Self {
            control_mean,
            variant_mean,
            control_n,
            variant_n,
            control_std: None,
            variant_std: None,
            kind,
        }
    }

    #[must_use]
    pub fn with_std(mut self, control_std: Option<f64>, variant_std: Option<f64>) -> Self {
        self.control_std = control_std;
        self.variant_std = variant_std;
        self
    }

    /// Builds the input from two validated group summaries.
    #[must_use]
    pub fn from_stats(control: &SummaryStat, variant: &SummaryStat, kind: MetricKind) -> Self {
        Self {
            control_mean: control.mean,
            variant_mean: variant.mean,
            control_n: control.n,
            variant_n: variant.n,
            control_std: control.std,
            variant_std: variant.std,
            kind,
        }
    }

    fn has_data(&self) -> bool {
        let present = |mean: f64| mean.is_finite() && mean != 0.0;
        present(self.control_mean)
            && present(self.variant_mean)
            && self.control_n > 0
            && self.variant_n > 0
    }

    /// Standard deviations `(control, variant)` after applying the fallback
    /// chain: own value, then the other group's, then `1`.
    fn continuous_stds(&self) -> (f64, f64) {
        let valid = |s: Option<f64>| s.filter(|s| s.is_finite() && *s >= 0.0);
        let control = valid(self.control_std);
        let variant = valid(self.variant_std);
        (
            control.or(variant).unwrap_or(DEFAULT_STD),
            variant.or(control).unwrap_or(DEFAULT_STD),
        )
    }

    #[expect(clippy::cast_precision_loss)]
    fn standard_errors(&self) -> (f64, f64) {
        let control_n = self.control_n as f64;
        let variant_n = self.variant_n as f64;
        match self.kind {
            MetricKind::Proportion => {
                let se = |p: f64, n: f64| (p * (1.0 - p) / n).max(0.0).sqrt();
                (
                    se(self.control_mean, control_n),
                    se(self.variant_mean, variant_n),
                )
            }
            MetricKind::Continuous => {
                let (control_std, variant_std) = self.continuous_stds();
                (control_std / control_n.sqrt(), variant_std / variant_n.sqrt())
            }
        }
    }

    /// Samples both density curves.
    ///
    /// Returns `None` when either mean or either sample size is zero or
    /// missing: there is nothing to draw yet.
    #[must_use]
    pub fn synthesize(&self) -> Option<NormalCurves> {
        if !self.has_data() {
            tracing::debug!(input = ?self, "distribution input incomplete, no curves");
            return None;
        }

        let (control_se, variant_se) = self.standard_errors();
        let control_display_std = display_std(control_se);
        let variant_display_std = display_std(variant_se);

        // At large magnitudes the half width can vanish in rounding; the
        // domain still extends at least one ulp past each mean.
        let min_x = f64::min(
            self.control_mean - DOMAIN_HALF_WIDTH * control_display_std,
            self.variant_mean - DOMAIN_HALF_WIDTH * variant_display_std,
        )
        .min(self.control_mean.min(self.variant_mean).next_down());
        let max_x = f64::max(
            self.control_mean + DOMAIN_HALF_WIDTH * control_display_std,
            self.variant_mean + DOMAIN_HALF_WIDTH * variant_display_std,
        )
        .max(self.control_mean.max(self.variant_mean).next_up());
        let domain = DisplayWindow::new(min_x, max_x)?;

        let (control, variant) = linspace(min_x, max_x, POINT_COUNT)
            .map(|x| {
                (
                    CurvePoint {
                        x,
                        y: normal_pdf(x, self.control_mean, control_display_std),
                    },
                    CurvePoint {
                        x,
                        y: normal_pdf(x, self.variant_mean, variant_display_std),
                    },
                )
            })
            .unzip();

        Some(NormalCurves {
            control,
            variant,
            domain,
            control_display_std,
            variant_display_std,
        })
    }
}

fn display_std(standard_error: f64) -> f64 {
    let scaled = standard_error * DISPLAY_SCALE;
    if scaled.is_finite() {
        scaled.max(MIN_DISPLAY_STD)
    } else {
        MIN_DISPLAY_STD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argmax(points: &[CurvePoint]) -> f64 {
        points
            .iter()
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|p| p.x)
            .unwrap()
    }

    #[test]
    fn test_from_conversion_stats() {
        let control = SummaryStat::from_conversions(500, 10_000).unwrap();
        let variant = SummaryStat::from_conversions(600, 10_000).unwrap();
        let input = DistributionInput::from_stats(&control, &variant, MetricKind::Proportion);
        assert_eq!(
            input,
            DistributionInput::new(0.05, 0.06, 10_000, 10_000, MetricKind::Proportion)
        );
        assert!(input.synthesize().is_some());
    }

    #[test]
    fn test_conversion_scenario() {
        let input = DistributionInput::new(0.05, 0.06, 10_000, 10_000, MetricKind::Proportion);
        let curves = input.synthesize().unwrap();

        assert_eq!(curves.control.len(), POINT_COUNT);
        assert_eq!(curves.variant.len(), POINT_COUNT);
        for (c, v) in curves.control.iter().zip(&curves.variant) {
            assert_eq!(c.x, v.x);
            assert!(c.y.is_finite() && v.y.is_finite());
        }
        assert!(curves.control.is_sorted_by(|a, b| a.x < b.x));

        let step = curves.domain.width() / 100.0;
        assert!((argmax(&curves.control) - 0.05).abs() <= step);
        assert!((argmax(&curves.variant) - 0.06).abs() <= step);
    }

    #[test]
    fn test_display_std_is_scaled_standard_error() {
        let input = DistributionInput::new(0.5, 0.5, 100, 100, MetricKind::Proportion);
        let curves = input.synthesize().unwrap();
        assert!((curves.control_display_std - 0.5).abs() < 1e-12);
        assert!((curves.domain.min - -1.5).abs() < 1e-12);
        assert!((curves.domain.max - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_inputs_produce_nothing() {
        let base = DistributionInput::new(0.05, 0.06, 1000, 1000, MetricKind::Proportion);
        assert!(base.synthesize().is_some());
        assert!(
            DistributionInput {
                control_mean: 0.0,
                ..base
            }
            .synthesize()
            .is_none()
        );
        assert!(
            DistributionInput {
                variant_mean: 0.0,
                ..base
            }
            .synthesize()
            .is_none()
        );
        assert!(DistributionInput { control_n: 0, ..base }.synthesize().is_none());
        assert!(DistributionInput { variant_n: 0, ..base }.synthesize().is_none());
    }

    #[test]
    fn test_zero_variance_uses_floor() {
        // p = 1 has zero binomial variance
        let input = DistributionInput::new(1.0, 1.0, 500, 500, MetricKind::Proportion);
        let curves = input.synthesize().unwrap();
        assert_eq!(curves.control_display_std, MIN_DISPLAY_STD);
        assert!(curves.control.iter().all(|p| p.y.is_finite()));
    }

    #[test]
    fn test_continuous_std_fallback() {
        let input = DistributionInput::new(10.0, 12.0, 100, 400, MetricKind::Continuous)
            .with_std(Some(5.0), None);
        let curves = input.synthesize().unwrap();
        // Variant borrows the control std: 5 / sqrt(400) * 10
        assert!((curves.variant_display_std - 2.5).abs() < 1e-12);
        assert!((curves.control_display_std - 5.0).abs() < 1e-12);

        let input = DistributionInput::new(10.0, 12.0, 100, 100, MetricKind::Continuous);
        let curves = input.synthesize().unwrap();
        assert!((curves.control_display_std - 1.0).abs() < 1e-12);
        assert!((curves.variant_display_std - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_domain_contains_both_means() {
        let input = DistributionInput::new(-3.0, 40.0, 7, 9, MetricKind::Continuous)
            .with_std(Some(0.0), Some(0.0));
        let curves = input.synthesize().unwrap();
        assert!(curves.domain.min < -3.0 && -3.0 < curves.domain.max);
        assert!(curves.domain.min < 40.0 && 40.0 < curves.domain.max);
    }

    #[test]
    fn test_domain_contains_large_means() {
        let input = DistributionInput::new(1e15, 2e15, 100, 100, MetricKind::Continuous)
            .with_std(Some(0.0), Some(0.0));
        let curves = input.synthesize().unwrap();
        assert!(curves.domain.min < 1e15 && 2e15 < curves.domain.max);

        let input = DistributionInput::new(1e15, 1e15, 100, 100, MetricKind::Continuous)
            .with_std(Some(0.0), Some(0.0));
        let curves = input.synthesize().unwrap();
        assert!(!curves.domain.is_degenerate());
        assert!(curves.domain.min < 1e15 && 1e15 < curves.domain.max);
        assert!(curves.control.iter().all(|p| p.y.is_finite()));
    }
}
