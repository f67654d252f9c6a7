//! Row data for the comparison charts.
//!
//! All builders return their rows in a fixed order, `[control, treatment]` or
//! `[pre, post]`, so axis labels never move between renders.

use serde::{Deserialize, Serialize};

use crate::range::{ClampPolicy, DisplayWindow, Padding, RangeMapper};

/// Headroom above the highest interval bound on the CI comparison axis.
pub const CI_AXIS_HEADROOM: f64 = 1.15;

/// Headroom above the highest rate on the rate comparison axis.
pub const RATE_AXIS_HEADROOM: f64 = 1.3;

/// Lower and upper scale factors of the diff-in-difference y-axis.
pub const TREND_AXIS_SCALE: (f64, f64) = (0.9, 1.1);

/// One bar of a two-group comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeriesRow {
    pub label: String,
    pub value: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl BarSeriesRow {
    /// Creates a row; a missing interval collapses to `[value, value]`.
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64, ci: Option<[f64; 2]>) -> Self {
        let [ci_low, ci_high] = ci.unwrap_or([value, value]);
        Self {
            label: label.into(),
            value,
            ci_low,
            ci_high,
        }
    }

    /// Whether the row carries a non-degenerate interval.
    #[must_use]
    pub fn has_interval(&self) -> bool {
        self.ci_low != self.value || self.ci_high != self.value
    }
}

/// Whether the treatment moved the metric up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    #[display("increase")]
    Increase,
    #[display("decrease")]
    Decrease,
    #[display("unchanged")]
    Unchanged,
}

impl ChangeDirection {
    #[must_use]
    pub fn between(control: f64, treatment: f64) -> Self {
        if treatment < control {
            Self::Decrease
        } else if treatment > control {
            Self::Increase
        } else {
            Self::Unchanged
        }
    }
}

/// Relative change from `control` to `treatment`, in percent.
///
/// Returns `None` when the change is undefined, i.e. `control` is zero or
/// either input is not finite. Callers show such a change as "undefined"
/// rather than as a number.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::series::percent_change;
/// assert_eq!(percent_change(0.10, 0.15).map(|p| p.round()), Some(50.0));
/// assert_eq!(percent_change(0.0, 0.15), None);
/// ```
#[must_use]
pub fn percent_change(control: f64, treatment: f64) -> Option<f64> {
    let change = (treatment - control) / control * 100.0;
    change.is_finite().then_some(change)
}

/// A two-bar comparison with its summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarComparison {
    pub rows: [BarSeriesRow; 2],
    pub percent_change: Option<f64>,
    pub direction: ChangeDirection,
}

impl BarComparison {
    #[must_use]
    pub fn control(&self) -> &BarSeriesRow {
        &self.rows[0]
    }

    #[must_use]
    pub fn treatment(&self) -> &BarSeriesRow {
        &self.rows[1]
    }

    /// Axis of the interval comparison chart: `[0, 1.15 · max(ci_high)]`.
    #[must_use]
    pub fn ci_axis(&self) -> Option<DisplayWindow> {
        RangeMapper::new(
            Padding::Scale {
                lower: 1.0,
                upper: CI_AXIS_HEADROOM,
            },
            ClampPolicy::ZeroBased,
        )
        .build_window(self.rows.iter().map(|r| r.ci_high))
    }

    /// Axis of the rate comparison chart: `[0, 1.3 · max(value)]`.
    #[must_use]
    pub fn rate_axis(&self) -> Option<DisplayWindow> {
        RangeMapper::new(
            Padding::Scale {
                lower: 1.0,
                upper: RATE_AXIS_HEADROOM,
            },
            ClampPolicy::ZeroBased,
        )
        .build_window(self.rows.iter().map(|r| r.value))
    }
}

/// Builds the `[control, treatment]` bar rows.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::series::bar_comparison;
/// let cmp = bar_comparison(("Control", 0.10, None), ("Variant", 0.12, Some([0.11, 0.13])));
/// assert_eq!(cmp.rows[0].ci_low, 0.10);
/// assert_eq!(cmp.rows[1].ci_high, 0.13);
/// ```
#[must_use]
pub fn bar_comparison(
    control: (&str, f64, Option<[f64; 2]>),
    treatment: (&str, f64, Option<[f64; 2]>),
) -> BarComparison {
    let (control_label, control_value, control_ci) = control;
    let (treatment_label, treatment_value, treatment_ci) = treatment;
    BarComparison {
        rows: [
            BarSeriesRow::new(control_label, control_value, control_ci),
            BarSeriesRow::new(treatment_label, treatment_value, treatment_ci),
        ],
        percent_change: percent_change(control_value, treatment_value),
        direction: ChangeDirection::between(control_value, treatment_value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[display("Pre-Period")]
    Pre,
    #[display("Post-Period")]
    Post,
}

/// One period of the diff-in-difference trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSeriesRow {
    pub period: Period,
    pub control: f64,
    pub treatment: f64,
    /// Projected treatment value under parallel trends; only set for
    /// [`Period::Post`].
    pub counterfactual: Option<f64>,
}

/// Pre/post trend lines with the counterfactual projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffInDiffTrend {
    pub rows: [TrendSeriesRow; 2],
    pub control_change: f64,
    pub treatment_change: f64,
    /// Observed post-period treatment minus its counterfactual.
    pub effect: f64,
    /// Y-axis window, `[0.9 · min, 1.1 · max]` of the observed values.
    pub window: Option<DisplayWindow>,
}

/// Builds the diff-in-difference rows.
///
/// The counterfactual projects the treatment group's pre-period value forward
/// by the control group's change: `treatment_pre + (control_post − control_pre)`.
///
/// Returns `None` if any input is not finite.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::series::diff_in_diff;
/// let trend = diff_in_diff(0.10, 0.11, 0.10, 0.15).unwrap();
/// assert!(trend.rows[0].counterfactual.is_none());
/// assert!((trend.rows[1].counterfactual.unwrap() - 0.11).abs() < 1e-12);
/// assert!((trend.effect - 0.04).abs() < 1e-12);
/// ```
#[must_use]
pub fn diff_in_diff(
    control_pre: f64,
    control_post: f64,
    treatment_pre: f64,
    treatment_post: f64,
) -> Option<DiffInDiffTrend> {
    let values = [control_pre, control_post, treatment_pre, treatment_post];
    if !values.iter().all(|v| v.is_finite()) {
        tracing::debug!(?values, "non-finite diff-in-difference input");
        return None;
    }

    let control_change = control_post - control_pre;
    let treatment_change = treatment_post - treatment_pre;
    let counterfactual = treatment_pre + control_change;
    let (lower, upper) = TREND_AXIS_SCALE;
    let window = RangeMapper::new(Padding::Scale { lower, upper }, ClampPolicy::None)
        .build_window(values);

    Some(DiffInDiffTrend {
        rows: [
            TrendSeriesRow {
                period: Period::Pre,
                control: control_pre,
                treatment: treatment_pre,
                counterfactual: None,
            },
            TrendSeriesRow {
                period: Period::Post,
                control: control_post,
                treatment: treatment_post,
                counterfactual: Some(counterfactual),
            },
        ],
        control_change,
        treatment_change,
        effect: treatment_post - counterfactual,
        window,
    })
}

/// Sorts groups for display, highest `key` first.
///
/// The sort is stable, so tied groups keep their input order. A `NaN` key
/// sorts last.
///
/// # Examples
///
/// ```
/// # use expviz_geometry::series::rank_descending;
/// let ranked = rank_descending(vec![("A", 0.1), ("B", 0.3), ("C", 0.1)], |g| g.1);
/// assert_eq!(ranked.iter().map(|g| g.0).collect::<Vec<_>>(), ["B", "A", "C"]);
/// ```
#[must_use]
pub fn rank_descending<T, F>(mut groups: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let sort_key = |g: &T| {
        let k = key(g);
        if k.is_nan() { f64::NEG_INFINITY } else { k }
    };
    groups.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a)));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ci_is_degenerate() {
        let row = BarSeriesRow::new("Control", 0.2, None);
        assert_eq!((row.ci_low, row.ci_high), (0.2, 0.2));
        assert!(!row.has_interval());
        assert!(BarSeriesRow::new("Variant", 0.2, Some([0.18, 0.22])).has_interval());
    }

    #[test]
    fn test_bar_comparison_order_and_axes() {
        let cmp = bar_comparison(
            ("Control", 0.10, Some([0.09, 0.11])),
            ("Treatment", 0.08, Some([0.07, 0.09])),
        );
        assert_eq!(cmp.control().label, "Control");
        assert_eq!(cmp.treatment().label, "Treatment");
        assert_eq!(cmp.direction, ChangeDirection::Decrease);
        assert!((cmp.percent_change.unwrap() - -20.0).abs() < 1e-9);

        let ci_axis = cmp.ci_axis().unwrap();
        assert_eq!(ci_axis.min, 0.0);
        assert!((ci_axis.max - 0.11 * 1.15).abs() < 1e-12);

        let rate_axis = cmp.rate_axis().unwrap();
        assert_eq!(rate_axis.min, 0.0);
        assert!((rate_axis.max - 0.13).abs() < 1e-12);
    }

    #[test]
    fn test_percent_change_undefined() {
        assert_eq!(percent_change(0.0, 1.0), None);
        assert_eq!(percent_change(0.0, 0.0), None);
        assert_eq!(percent_change(f64::NAN, 1.0), None);
        assert_eq!(percent_change(2.0, 2.0), Some(0.0));
    }

    #[test]
    fn test_direction() {
        assert_eq!(ChangeDirection::between(1.0, 2.0), ChangeDirection::Increase);
        assert_eq!(ChangeDirection::between(2.0, 1.0), ChangeDirection::Decrease);
        assert_eq!(ChangeDirection::between(2.0, 2.0), ChangeDirection::Unchanged);
    }

    #[test]
    fn test_diff_in_diff_scenario() {
        let trend = diff_in_diff(0.10, 0.11, 0.10, 0.15).unwrap();
        assert_eq!(trend.rows[0].period, Period::Pre);
        assert_eq!(trend.rows[1].period, Period::Post);
        assert_eq!(trend.rows[0].counterfactual, None);
        assert!((trend.rows[1].counterfactual.unwrap() - 0.11).abs() < 1e-12);
        assert!((trend.effect - 0.04).abs() < 1e-12);
        assert!((trend.effect - (trend.treatment_change - trend.control_change)).abs() < 1e-12);

        let window = trend.window.unwrap();
        assert!((window.min - 0.09).abs() < 1e-12);
        assert!((window.max - 0.165).abs() < 1e-12);
    }

    #[test]
    fn test_diff_in_diff_rejects_non_finite() {
        assert!(diff_in_diff(0.1, f64::NAN, 0.1, 0.2).is_none());
    }

    #[test]
    fn test_rank_is_stable() {
        let groups = vec![("A", 2.0), ("B", 5.0), ("C", 2.0), ("D", f64::NAN), ("E", 5.0)];
        let ranked = rank_descending(groups, |g| g.1);
        let names = ranked.iter().map(|g| g.0).collect::<Vec<_>>();
        assert_eq!(names, ["B", "E", "A", "C", "D"]);
    }
}
