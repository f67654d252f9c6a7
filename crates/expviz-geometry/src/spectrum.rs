//! Marker layouts on a single horizontal track.
//!
//! These charts have no axis of their own. Every element is placed by its
//! percentage offset along a fixed-width track, computed through a
//! [`DisplayWindow`].

use serde::{Deserialize, Serialize};

use crate::{
    range::{Band, ClampPolicy, DisplayWindow, Padding, RangeMapper},
    summary::MetricKind,
};

/// Padding on each side of the effect spectrum, as a fraction of the baseline.
pub const SPECTRUM_PADDING: f64 = 0.4;

/// Baseline with the minimum detectable effect band around it.
///
/// Values inside the band ("gray area") are changes too small for the planned
/// experiment to detect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpectrum {
    pub window: DisplayWindow,
    pub baseline: f64,
    /// `baseline · (1 − mde / 100)`.
    pub lower: f64,
    /// `baseline · (1 + mde / 100)`.
    pub upper: f64,
    pub expected: Option<f64>,
    pub baseline_position: f64,
    pub lower_position: f64,
    pub upper_position: f64,
    pub expected_position: Option<f64>,
    pub gray_area: Band,
}

impl EffectSpectrum {
    /// Lays out the spectrum for a baseline and a relative MDE in percent.
    ///
    /// Returns `None` if the baseline or the MDE is zero or not finite, or if
    /// the resulting window has no width.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::spectrum::EffectSpectrum;
    /// let spectrum = EffectSpectrum::new(10.0, 10.0, Some(11.0)).unwrap();
    /// assert_eq!(spectrum.window.min, 5.0);
    /// assert_eq!(spectrum.window.max, 15.0);
    /// assert_eq!(spectrum.baseline_position, 50.0);
    /// ```
    #[must_use]
    pub fn new(baseline: f64, mde_percent: f64, expected: Option<f64>) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        if !usable(baseline) || !usable(mde_percent) {
            tracing::debug!(baseline, mde_percent, "no baseline or MDE, no spectrum");
            return None;
        }

        let lower = baseline * (1.0 - mde_percent / 100.0);
        let upper = baseline * (1.0 + mde_percent / 100.0);
        let window = RangeMapper::new(
            Padding::Absolute((baseline * SPECTRUM_PADDING).abs()),
            ClampPolicy::NonNegative,
        )
        .build_window([lower, upper])?;

        let expected = expected.filter(|v| v.is_finite());
        Some(Self {
            window,
            baseline,
            lower,
            upper,
            expected,
            baseline_position: window.to_percent(baseline)?,
            lower_position: window.to_percent(lower)?,
            upper_position: window.to_percent(upper)?,
            expected_position: match expected {
                Some(v) => Some(window.to_percent(v)?),
                None => None,
            },
            gray_area: window.band(lower, upper)?,
        })
    }
}

/// A single confidence interval drawn on a track starting at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalBar {
    pub window: DisplayWindow,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
    pub point_position: f64,
    pub interval: Band,
}

impl IntervalBar {
    /// Lays out an interval estimate.
    ///
    /// Proportions use a `[0, 1]` track. Continuous metrics use
    /// `[0, max(1.5 · upper, 2 · point)]`. Returns `None` when that track has
    /// no width or an input is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::{spectrum::IntervalBar, summary::MetricKind};
    /// let bar = IntervalBar::new(0.25, 0.2, 0.3, MetricKind::Proportion).unwrap();
    /// assert_eq!(bar.point_position, 25.0);
    /// ```
    #[must_use]
    pub fn new(point: f64, lower: f64, upper: f64, kind: MetricKind) -> Option<Self> {
        if ![point, lower, upper].iter().all(|v| v.is_finite()) {
            return None;
        }
        let extent = match kind {
            MetricKind::Proportion => 1.0,
            MetricKind::Continuous => f64::max(upper * 1.5, point * 2.0),
        };
        let window = DisplayWindow::new(0.0, extent)?;
        Some(Self {
            window,
            point,
            lower,
            upper,
            point_position: window.to_percent(point)?,
            interval: window.band(lower, upper)?,
        })
    }
}
