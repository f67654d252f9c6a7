//! Single-track marker charts: effect spectrum and interval bar.

use std::io::{self, Write};

use clap::Args;
use expviz_geometry::{
    spectrum::{EffectSpectrum, IntervalBar},
    summary::MetricKind,
};

use crate::render::{Renderer, Report, write_separator};

#[derive(Debug, Clone, Args)]
pub(crate) struct SpectrumArg {
    /// Baseline value of the metric
    #[arg(long)]
    baseline: f64,
    /// Minimum detectable effect, percent relative to the baseline
    #[arg(long)]
    mde: f64,
    /// Expected value under the treatment
    #[arg(long)]
    expected: Option<f64>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct IntervalArg {
    /// Point estimate
    #[arg(long)]
    point: f64,
    /// Lower confidence bound
    #[arg(long)]
    lower: f64,
    /// Upper confidence bound
    #[arg(long)]
    upper: f64,
    /// Treat the metric as continuous instead of a proportion
    #[arg(long)]
    continuous: bool,
}

fn write_marker(w: &mut dyn Write, label: &str, value: f64, position: f64) -> io::Result<()> {
    writeln!(w, "  {label:<12} {value:>14.6} {position:>9.2}%")
}

impl Report for EffectSpectrum {
    const CHART: &'static str = "spectrum";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Track [{:.6}, {:.6}]", self.window.min, self.window.max)?;
        writeln!(w)?;
        writeln!(w, "  {:<12} {:>14} {:>10}", "Marker", "Value", "Position")?;
        write_separator(w, 38)?;
        write_marker(w, "MDE lower", self.lower, self.lower_position)?;
        write_marker(w, "Baseline", self.baseline, self.baseline_position)?;
        write_marker(w, "MDE upper", self.upper, self.upper_position)?;
        if let (Some(value), Some(position)) = (self.expected, self.expected_position) {
            write_marker(w, "Expected", value, position)?;
        }
        writeln!(w)?;
        writeln!(
            w,
            "Gray area: left={:.2}% width={:.2}%",
            self.gray_area.left, self.gray_area.width,
        )
    }
}

impl Report for IntervalBar {
    const CHART: &'static str = "interval";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "Track [{:.6}, {:.6}]", self.window.min, self.window.max)?;
        writeln!(w)?;
        writeln!(w, "  {:<12} {:>14} {:>10}", "Marker", "Value", "Position")?;
        write_separator(w, 38)?;
        write_marker(w, "Lower", self.lower, self.interval.left)?;
        write_marker(w, "Point", self.point, self.point_position)?;
        write_marker(
            w,
            "Upper",
            self.upper,
            self.interval.left + self.interval.width,
        )?;
        writeln!(w)?;
        writeln!(w, "Interval width: {:.2}%", self.interval.width)
    }
}

pub(crate) fn run_spectrum(arg: &SpectrumArg, renderer: &Renderer) -> anyhow::Result<()> {
    let spectrum = EffectSpectrum::new(arg.baseline, arg.mde, arg.expected);
    renderer.emit(spectrum.as_ref())
}

pub(crate) fn run_interval(arg: &IntervalArg, renderer: &Renderer) -> anyhow::Result<()> {
    let kind = if arg.continuous {
        MetricKind::Continuous
    } else {
        MetricKind::Proportion
    };
    let bar = IntervalBar::new(arg.point, arg.lower, arg.upper, kind);
    renderer.emit(bar.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_table_includes_expected() {
        let spectrum = EffectSpectrum::new(10.0, 10.0, Some(11.0)).unwrap();
        let mut buf = Vec::new();
        spectrum.write_table(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Expected"));
        assert!(text.contains("Baseline"));
        assert!(text.contains("50.00%"));
    }

    #[test]
    fn test_interval_table() {
        let bar = IntervalBar::new(0.25, 0.2, 0.3, MetricKind::Proportion).unwrap();
        let mut buf = Vec::new();
        bar.write_table(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Track [0.000000, 1.000000]"));
        assert!(text.contains("25.00%"));
    }
}
