//! Value-to-position scaling shared by every bar and spectrum chart.
//!
//! A [`RangeMapper`] turns a handful of values into a padded [`DisplayWindow`],
//! and the window maps any value to a percentage position along the chart's
//! axis. Every chart picks its own [`Padding`] and [`ClampPolicy`]; the mapping
//! itself is the same linear function everywhere.
//!
//! # Degenerate windows
//!
//! When all values coincide the window has zero width and no position can be
//! computed. [`DisplayWindow::to_percent`] returns `None` in that case, so a
//! caller cannot reach the division without handling the "render nothing"
//! outcome first.
//!
//! ```
//! use expviz_geometry::range::build_window;
//!
//! let window = build_window([5.0, 5.0, 5.0], 0.1).unwrap();
//! assert!(window.is_degenerate());
//! assert_eq!(window.to_percent(5.0), None);
//! ```

use serde::{Deserialize, Serialize};

/// The numeric range a chart axis covers.
///
/// Invariant: `max >= min` and both bounds are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub min: f64,
    pub max: f64,
}

/// Left edge and width, both in percent, of a band drawn between two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub left: f64,
    pub width: f64,
}

impl DisplayWindow {
    /// Creates a window, returning `None` if the bounds are reversed or the
    /// bounds or the width are not finite.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        let finite = min.is_finite() && max.is_finite() && (max - min).is_finite();
        (finite && max >= min).then_some(Self { min, max })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the window has zero width.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Maps `value` to its position along the window, in percent.
    ///
    /// The mapping is linear and strictly increasing; values outside the
    /// window map outside `[0, 100]`. Returns `None` on a degenerate window.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::range::DisplayWindow;
    /// let window = DisplayWindow::new(10.0, 20.0).unwrap();
    /// assert_eq!(window.to_percent(15.0), Some(50.0));
    /// assert_eq!(window.to_percent(25.0), Some(150.0));
    /// ```
    #[must_use]
    pub fn to_percent(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some((value - self.min) / self.width() * 100.0)
    }

    /// Like [`to_percent`](Self::to_percent), clipped to `[0, 100]` for
    /// fixed-width tracks.
    #[must_use]
    pub fn to_clipped_percent(&self, value: f64) -> Option<f64> {
        self.to_percent(value).map(clip_percent)
    }

    /// Position and width of the band spanning `from..=to`.
    ///
    /// The band is ordered so that its width is never negative.
    #[must_use]
    pub fn band(&self, from: f64, to: f64) -> Option<Band> {
        let a = self.to_percent(from)?;
        let b = self.to_percent(to)?;
        Some(Band {
            left: a.min(b),
            width: (b - a).abs(),
        })
    }
}

/// Clamps a percentage position to the visible track.
#[must_use]
pub fn clip_percent(percent: f64) -> f64 {
    percent.clamp(0.0, 100.0)
}

/// How far a window extends beyond the observed values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Exactly the observed range.
    #[default]
    None,
    /// Pad both sides by this fraction of the observed range.
    Fraction(f64),
    /// Multiply the lower bound by `lower` and the upper bound by `upper`.
    Scale { lower: f64, upper: f64 },
    /// Pad both sides by a fixed amount.
    Absolute(f64),
}

/// What the lower bound may not go below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// The lower bound is whatever the padding produced.
    #[default]
    None,
    /// The lower bound is raised to `0` if padding pushed it negative.
    /// For rates and counts.
    NonNegative,
    /// The axis always starts at `0`.
    ZeroBased,
}

/// Builds display windows with a fixed padding and clamp rule.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeMapper {
    pub padding: Padding,
    pub clamp: ClampPolicy,
}

impl RangeMapper {
    #[must_use]
    pub const fn new(padding: Padding, clamp: ClampPolicy) -> Self {
        Self { padding, clamp }
    }

    /// Computes the window covering `values`.
    ///
    /// Non-finite values are ignored. Returns `None` if no finite value
    /// remains or the padding produced an invalid window.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::range::{ClampPolicy, Padding, RangeMapper};
    /// let mapper = RangeMapper::new(Padding::Fraction(0.5), ClampPolicy::NonNegative);
    /// let window = mapper.build_window([1.0, 3.0]).unwrap();
    /// assert_eq!((window.min, window.max), (0.0, 4.0));
    /// ```
    #[must_use]
    pub fn build_window<I>(&self, values: I) -> Option<DisplayWindow>
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;

        let (mut min, max) = match self.padding {
            Padding::None => (lo, hi),
            Padding::Fraction(fraction) => {
                let pad = (hi - lo) * fraction;
                (lo - pad, hi + pad)
            }
            Padding::Scale { lower, upper } => (lo * lower, hi * upper),
            Padding::Absolute(pad) => (lo - pad, hi + pad),
        };

        match self.clamp {
            ClampPolicy::None => {}
            ClampPolicy::NonNegative => min = min.max(0.0),
            ClampPolicy::ZeroBased => min = 0.0,
        }

        let window = DisplayWindow::new(min, max);
        if window.is_none() {
            tracing::debug!(min, max, "padding produced an invalid display window");
        }
        window
    }
}

/// Builds a window padded on both sides by `padding_fraction` of the value
/// range, with no clamping.
#[must_use]
pub fn build_window<I>(values: I, padding_fraction: f64) -> Option<DisplayWindow>
where
    I: IntoIterator<Item = f64>,
{
    RangeMapper::new(Padding::Fraction(padding_fraction), ClampPolicy::None).build_window(values)
}
