//! Illustrative power-vs-sample-size curve.
//!
//! The service reports a single point of the true power function: the sample
//! size required to reach the target power. The true curve also depends on the
//! effect size and the variance, which are not available here, so the point is
//! extended with a fixed hand-tuned sigmoid:
//!
//! ```text
//! power(n) = min(99, 50 + 50 · tanh((n − 0.5·N) / (0.3·N)))
//! ```
//!
//! where `N` is the required sample size. [`PowerCurve::approximate`] draws
//! exactly this shape. [`PowerCurve::calibrated`] keeps the width but moves
//! the centre so that the curve passes through the anchor `(N, target)`.
//!
//! # Examples
//!
//! ```
//! use expviz_geometry::power::PowerCurve;
//!
//! let curve = PowerCurve::approximate(1000, 80.0).unwrap();
//! assert_eq!(curve.points.first().unwrap().n, 200);
//! assert_eq!(curve.points.last().unwrap().n, 2000);
//! assert!(curve.points.iter().all(|p| (0.0..=99.0).contains(&p.power)));
//! ```

use serde::{Deserialize, Serialize};

/// Upper bound of every plotted power value, in percent.
pub const MAX_POWER: f64 = 99.0;

/// Approximate number of samples along the curve.
pub const TARGET_STEPS: u64 = 50;

const CENTER_FRACTION: f64 = 0.5;
const WIDTH_FRACTION: f64 = 0.3;

/// A sample of the power curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerPoint {
    pub n: u64,
    /// Power in percent.
    pub power: f64,
}

/// `50 + 50 · tanh((n − center) / width)`, capped at [`MAX_POWER`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sigmoid {
    pub center: f64,
    pub width: f64,
}

impl Sigmoid {
    #[must_use]
    pub fn power_at(&self, n: f64) -> f64 {
        f64::min(MAX_POWER, 50.0 + 50.0 * ((n - self.center) / self.width).tanh())
    }
}

/// The sampled curve together with the anchor it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerCurve {
    pub points: Vec<PowerPoint>,
    pub shape: Sigmoid,
    /// Sample size the service computed for the target power.
    pub required_n: u64,
    /// Target power, in percent.
    pub target_power: f64,
}

impl PowerCurve {
    /// Samples the fixed sigmoid centred at half the required sample size.
    ///
    /// Returns `None` if `required_n` is zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn approximate(required_n: u64, target_power: f64) -> Option<Self> {
        if required_n == 0 {
            tracing::debug!("required sample size is zero, no power curve");
            return None;
        }
        let n = required_n as f64;
        let shape = Sigmoid {
            center: CENTER_FRACTION * n,
            width: WIDTH_FRACTION * n,
        };
        Some(Self::sample(shape, required_n, target_power))
    }

    /// Samples the sigmoid shifted so that `power(required_n) == target_power`.
    ///
    /// Returns `None` if `required_n` is zero or `target_power` is outside
    /// `(0, 99]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::power::PowerCurve;
    /// let curve = PowerCurve::calibrated(1000, 80.0).unwrap();
    /// let anchor = curve.points.iter().find(|p| p.n == 1000).unwrap();
    /// assert!((anchor.power - 80.0).abs() < 1e-9);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn calibrated(required_n: u64, target_power: f64) -> Option<Self> {
        if required_n == 0 || !(target_power > 0.0 && target_power <= MAX_POWER) {
            tracing::debug!(
                required_n,
                target_power,
                "cannot calibrate power curve to anchor"
            );
            return None;
        }
        let n = required_n as f64;
        let width = WIDTH_FRACTION * n;
        let offset = (target_power / 50.0 - 1.0).atanh();
        let shape = Sigmoid {
            center: n - width * offset,
            width,
        };
        Some(Self::sample(shape, required_n, target_power))
    }

    #[expect(clippy::cast_precision_loss)]
    fn sample(shape: Sigmoid, required_n: u64, target_power: f64) -> Self {
        let points = sample_sizes(required_n)
            .map(|n| PowerPoint {
                n,
                power: shape.power_at(n as f64),
            })
            .collect();
        Self {
            points,
            shape,
            required_n,
            target_power,
        }
    }
}

/// Sample sizes from `floor(0.2·N)` to `2·N` in steps of
/// `max(1, floor(2·N / 50))`.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::power::sample_sizes;
/// let ns = sample_sizes(10).collect::<Vec<_>>();
/// assert_eq!(ns.first(), Some(&2));
/// assert_eq!(ns.last(), Some(&20));
/// assert_eq!(ns.len(), 19);
/// ```
pub fn sample_sizes(required_n: u64) -> impl Iterator<Item = u64> {
    let start = required_n / 5;
    let end = required_n.saturating_mul(2);
    let step = usize::try_from((end / TARGET_STEPS).max(1)).unwrap_or(usize::MAX);
    (start..=end).step_by(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid() {
        let ns = sample_sizes(1000).collect::<Vec<_>>();
        assert_eq!(ns[0], 200);
        assert_eq!(ns[1], 240);
        assert_eq!(*ns.last().unwrap(), 2000);
        assert!(ns.contains(&1000));
        assert_eq!(ns.len(), 46);
    }

    #[test]
    fn test_grid_small_required_n() {
        let ns = sample_sizes(1).collect::<Vec<_>>();
        assert_eq!(ns, vec![0, 1, 2]);
    }

    #[test]
    fn test_fixed_shape_values() {
        let curve = PowerCurve::approximate(1000, 80.0).unwrap();
        let at = |n| curve.points.iter().find(|p| p.n == n).unwrap().power;
        // Centre of the sigmoid
        assert!((at(440) - (50.0 + 50.0 * (-60.0_f64 / 300.0).tanh())).abs() < 1e-12);
        assert!((at(1000) - (50.0 + 50.0 * (500.0_f64 / 300.0).tanh())).abs() < 1e-12);
        assert_eq!(at(2000), MAX_POWER);
        assert_eq!(curve.required_n, 1000);
        assert_eq!(curve.target_power, 80.0);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        for required_n in [1, 7, 50, 1000, 123_457] {
            let curve = PowerCurve::approximate(required_n, 80.0).unwrap();
            assert!(curve.points.windows(2).all(|w| w[0].power <= w[1].power));
            assert!(curve.points.iter().all(|p| (0.0..=MAX_POWER).contains(&p.power)));
        }
    }

    #[test]
    fn test_calibrated_anchor() {
        let curve = PowerCurve::calibrated(1000, 80.0).unwrap();
        let anchor = curve.points.iter().find(|p| p.n == 1000).unwrap();
        assert!((anchor.power - 80.0).abs() < 1e-9);
        assert!(curve.points.iter().all(|p| (0.0..=MAX_POWER).contains(&p.power)));
    }

    #[test]
    fn test_rejects_invalid_anchor() {
        assert!(PowerCurve::approximate(0, 80.0).is_none());
        assert!(PowerCurve::calibrated(0, 80.0).is_none());
        assert!(PowerCurve::calibrated(1000, 0.0).is_none());
        assert!(PowerCurve::calibrated(1000, 100.0).is_none());
    }
}
