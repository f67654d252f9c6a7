//! Two-bar comparisons built from service results.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Args;
use expviz_geometry::{
    range::DisplayWindow,
    series::{self, BarComparison},
    summary::MetricKind,
};
use serde::Serialize;

use crate::{
    render::{Renderer, Report, or_label, write_separator},
    schema::service::{SignificanceResult, TimingResult},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Significance result JSON file from the statistics service
    #[arg(long)]
    result: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct RatesArg {
    /// Timing result JSON file carrying event rates
    #[arg(long)]
    result: PathBuf,
}

/// Bars with the axis they are drawn against.
#[derive(Debug, Clone, Serialize)]
struct ComparisonReport {
    kind: MetricKind,
    #[serde(flatten)]
    comparison: BarComparison,
    axis: Option<DisplayWindow>,
    p_value: Option<f64>,
    /// Interval of the difference, as reported by the service.
    difference_ci: Option<[f64; 2]>,
}

impl Report for ComparisonReport {
    const CHART: &'static str = "comparison";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "  {:<12} {:>14} {:>14} {:>14}",
            "Group", "Value", "CI low", "CI high"
        )?;
        write_separator(w, 57)?;
        for row in &self.comparison.rows {
            writeln!(
                w,
                "  {:<12} {:>14.6} {:>14.6} {:>14.6}",
                row.label, row.value, row.ci_low, row.ci_high,
            )?;
        }
        writeln!(w)?;
        let change = self
            .comparison
            .percent_change
            .map_or_else(|| "undefined".to_owned(), |p| format!("{p:+.2}%"));
        writeln!(
            w,
            "Change: {change} ({}), p-value: {}",
            self.comparison.direction,
            or_label(self.p_value, 4, "N/A"),
        )?;
        if let Some(axis) = self.axis {
            writeln!(w, "Axis: [{:.6}, {:.6}]", axis.min, axis.max)?;
        }
        Ok(())
    }
}

fn significance_report(result: &SignificanceResult) -> Option<ComparisonReport> {
    let (control, variant) = result.values()?;
    let (control_ci, variant_ci) = (result.control_ci, result.variant_ci);
    let comparison =
        series::bar_comparison(("Control", control, control_ci), ("Variant", variant, variant_ci));
    // Without any interval the CI chart has nothing to scale to, fall back to values.
    let axis = if comparison.rows.iter().any(series::BarSeriesRow::has_interval) {
        comparison.ci_axis()
    } else {
        comparison.rate_axis()
    };
    Some(ComparisonReport {
        kind: result.metric_kind(),
        comparison,
        axis,
        p_value: result.p_value,
        difference_ci: result.confidence_interval,
    })
}

fn rate_report(result: &TimingResult) -> Option<ComparisonReport> {
    let comparison = series::bar_comparison(
        ("Control", result.control_rate?, result.control_rate_ci),
        ("Treatment", result.treatment_rate?, result.treatment_rate_ci),
    );
    let axis = comparison.rate_axis();
    Some(ComparisonReport {
        kind: MetricKind::Continuous,
        comparison,
        axis,
        p_value: result.p_value,
        difference_ci: result.rate_ratio_ci,
    })
}

pub(crate) fn run_compare(arg: &CompareArg, renderer: &Renderer) -> anyhow::Result<()> {
    let result: SignificanceResult = util::read_result_file(&arg.result)?;
    renderer.emit(significance_report(&result).as_ref())
}

pub(crate) fn run_rates(arg: &RatesArg, renderer: &Renderer) -> anyhow::Result<()> {
    let result: TimingResult = util::read_result_file(&arg.result)?;
    renderer.emit(rate_report(&result).as_ref())
}
