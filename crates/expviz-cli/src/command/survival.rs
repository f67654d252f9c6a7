use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Args;
use expviz_geometry::survival::{self, SurvivalPoint};
use serde::Serialize;

use crate::{
    render::{Renderer, Report, or_label, write_separator},
    schema::service::TimingResult,
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SurvivalArg {
    /// Control group median time to event
    #[arg(long, conflicts_with = "result")]
    control_median: Option<f64>,
    /// Treatment group median time to event
    #[arg(long, conflicts_with = "result")]
    treatment_median: Option<f64>,
    /// Timing result JSON file from the statistics service
    #[arg(long)]
    result: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SurvivalReport {
    control_median: f64,
    treatment_median: f64,
    hazard_ratio: Option<f64>,
    points: Vec<SurvivalPoint>,
}

impl Report for SurvivalReport {
    const CHART: &'static str = "survival";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "Median time: control={:.2} treatment={:.2}, hazard ratio={}",
            self.control_median,
            self.treatment_median,
            or_label(self.hazard_ratio, 3, "N/A"),
        )?;
        writeln!(w)?;
        writeln!(w, "  {:>10} {:>10} {:>10}", "Time", "Control%", "Treat%")?;
        write_separator(w, 32)?;
        for point in self.points.iter().step_by(5) {
            writeln!(
                w,
                "  {:>10.2} {:>9.1}% {:>9.1}%",
                point.t, point.control, point.treatment,
            )?;
        }
        Ok(())
    }
}

fn build_report(
    control_median: Option<f64>,
    treatment_median: Option<f64>,
    hazard_ratio: Option<f64>,
) -> Option<SurvivalReport> {
    let points = survival::approximate_optional(control_median, treatment_median)?;
    Some(SurvivalReport {
        control_median: control_median?,
        treatment_median: treatment_median?,
        hazard_ratio,
        points,
    })
}

pub(crate) fn run(arg: &SurvivalArg, renderer: &Renderer) -> anyhow::Result<()> {
    let report = match &arg.result {
        Some(path) => {
            let result: TimingResult = util::read_result_file(path)?;
            build_report(
                result.control_median_time,
                result.treatment_median_time,
                result.hazard_ratio,
            )
        }
        None => build_report(arg.control_median, arg.treatment_median, None),
    };
    renderer.emit(report.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_medians() {
        let report = build_report(Some(30.0), Some(24.0), Some(1.25)).unwrap();
        assert_eq!(report.points.len(), 51);
        assert_eq!(report.points[0].control, 100.0);
    }

    #[test]
    fn test_missing_median_has_no_report() {
        assert!(build_report(None, Some(24.0), None).is_none());
        assert!(build_report(Some(0.0), Some(24.0), None).is_none());
    }

    #[test]
    fn test_table_header() {
        let report = build_report(Some(10.0), Some(20.0), None).unwrap();
        let mut buf = Vec::new();
        report.write_table(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("hazard ratio=N/A"));
        assert!(text.contains("Control%"));
    }
}
