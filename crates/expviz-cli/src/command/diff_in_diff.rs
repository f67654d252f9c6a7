use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Args;
use expviz_geometry::series::{self, DiffInDiffTrend};
use serde::Serialize;

use crate::{
    render::{Renderer, Report, or_label, write_separator},
    schema::service::DiffInDiffResult,
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DiffInDiffArg {
    /// Control group value before the change
    #[arg(
        long,
        requires_all = ["control_post", "treatment_pre", "treatment_post"],
        conflicts_with = "result"
    )]
    control_pre: Option<f64>,
    /// Control group value after the change
    #[arg(long, conflicts_with = "result")]
    control_post: Option<f64>,
    /// Treatment group value before the change
    #[arg(long, conflicts_with = "result")]
    treatment_pre: Option<f64>,
    /// Treatment group value after the change
    #[arg(long, conflicts_with = "result")]
    treatment_post: Option<f64>,
    /// Diff-in-difference result JSON file from the statistics service
    #[arg(long)]
    result: Option<PathBuf>,
}

impl DiffInDiffArg {
    fn values(&self) -> Option<[f64; 4]> {
        Some([
            self.control_pre?,
            self.control_post?,
            self.treatment_pre?,
            self.treatment_post?,
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
struct DiffInDiffReport {
    #[serde(flatten)]
    trend: DiffInDiffTrend,
    /// Estimate reported by the service, if any.
    reported_effect: Option<f64>,
    confidence_interval: Option<[f64; 2]>,
    p_value: Option<f64>,
}

impl Report for DiffInDiffReport {
    const CHART: &'static str = "diff_in_diff";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "  {:<12} {:>14} {:>14} {:>16}",
            "Period", "Control", "Treatment", "Counterfactual"
        )?;
        write_separator(w, 59)?;
        for row in &self.trend.rows {
            writeln!(
                w,
                "  {:<12} {:>14.6} {:>14.6} {:>16}",
                row.period.to_string(),
                row.control,
                row.treatment,
                or_label(row.counterfactual, 6, "-"),
            )?;
        }
        writeln!(w)?;
        writeln!(
            w,
            "Effect: {:.6} (control change {:.6}, treatment change {:.6})",
            self.trend.effect, self.trend.control_change, self.trend.treatment_change,
        )?;
        if let Some(window) = self.trend.window {
            writeln!(w, "Axis: [{:.6}, {:.6}]", window.min, window.max)?;
        }
        Ok(())
    }
}

fn build_report(
    values: Option<[f64; 4]>,
    result: Option<&DiffInDiffResult>,
) -> Option<DiffInDiffReport> {
    let [control_pre, control_post, treatment_pre, treatment_post] = values?;
    let trend = series::diff_in_diff(control_pre, control_post, treatment_pre, treatment_post)?;
    if let Some(reported) = result.and_then(|r| r.diff_in_diff)
        && (reported - trend.effect).abs() > 1e-9 * reported.abs().max(1.0)
    {
        tracing::warn!(
            reported,
            computed = trend.effect,
            "reported diff-in-difference differs from group values"
        );
    }
    Some(DiffInDiffReport {
        trend,
        reported_effect: result.and_then(|r| r.diff_in_diff),
        confidence_interval: result.and_then(|r| r.confidence_interval),
        p_value: result.and_then(|r| r.p_value),
    })
}

pub(crate) fn run(arg: &DiffInDiffArg, renderer: &Renderer) -> anyhow::Result<()> {
    let report = match &arg.result {
        Some(path) => {
            let result: DiffInDiffResult = util::read_result_file(path)?;
            build_report(result.values(), Some(&result))
        }
        None => build_report(arg.values(), None),
    };
    renderer.emit(report.as_ref())
}
