use serde::{Deserialize, Serialize};

/// A single sample of a plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Returns `count` evenly spaced values covering `[start, end]` inclusively.
///
/// Each value is computed from its index rather than by repeated addition, so
/// the last value is exactly `end` and no floating-point drift accumulates.
/// `count == 1` yields only `start`.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::curve::linspace;
/// let xs = linspace(0.0, 1.0, 5).collect::<Vec<_>>();
/// assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn linspace(start: f64, end: f64, count: usize) -> impl Iterator<Item = f64> {
    let intervals = count.saturating_sub(1).max(1) as f64;
    (0..count).map(move |i| {
        if i + 1 == count && count > 1 {
            end
        } else {
            start + (end - start) * (i as f64 / intervals)
        }
    })
}
