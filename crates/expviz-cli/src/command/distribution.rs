use std::io::{self, Write};

use clap::Args;
use expviz_geometry::{
    normal::{DistributionInput, NormalCurves},
    summary::MetricKind,
};

use crate::render::{Renderer, Report, write_separator};

#[derive(Debug, Clone, Args)]
pub(crate) struct DistributionArg {
    /// Control group mean (conversion rate for proportion metrics)
    #[arg(long)]
    control_mean: f64,
    /// Variant group mean
    #[arg(long)]
    variant_mean: f64,
    /// Control group sample size
    #[arg(long)]
    control_n: u64,
    /// Variant group sample size
    #[arg(long)]
    variant_n: u64,
    /// Control group standard deviation (continuous metrics)
    #[arg(long)]
    control_std: Option<f64>,
    /// Variant group standard deviation (continuous metrics)
    #[arg(long)]
    variant_std: Option<f64>,
    /// Treat the metric as continuous instead of a proportion
    #[arg(long)]
    continuous: bool,
}

impl DistributionArg {
    fn input(&self) -> DistributionInput {
        let kind = if self.continuous {
            MetricKind::Continuous
        } else {
            MetricKind::Proportion
        };
        DistributionInput::new(
            self.control_mean,
            self.variant_mean,
            self.control_n,
            self.variant_n,
            kind,
        )
        .with_std(self.control_std, self.variant_std)
    }
}

/// Every n-th point printed in table mode.
const TABLE_STRIDE: usize = 10;

impl Report for NormalCurves {
    const CHART: &'static str = "distribution";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "Domain [{:.6}, {:.6}], display std control={:.6} variant={:.6}",
            self.domain.min, self.domain.max, self.control_display_std, self.variant_display_std,
        )?;
        writeln!(w)?;
        writeln!(w, "  {:>14} {:>14} {:>14}", "x", "Control", "Variant")?;
        write_separator(w, 44)?;
        for (control, variant) in self
            .control
            .iter()
            .zip(&self.variant)
            .step_by(TABLE_STRIDE)
        {
            writeln!(
                w,
                "  {:>14.6} {:>14.4} {:>14.4}",
                control.x, control.y, variant.y,
            )?;
        }
        Ok(())
    }
}

pub(crate) fn run(arg: &DistributionArg, renderer: &Renderer) -> anyhow::Result<()> {
    let curves = arg.input().synthesize();
    if let Some(curves) = &curves {
        tracing::debug!(
            points = curves.control.len(),
            min = curves.domain.min,
            max = curves.domain.max,
            "synthesized distribution curves"
        );
    }
    renderer.emit(curves.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_sampled_points() {
        let curves = DistributionInput::new(0.10, 0.12, 1000, 1000, MetricKind::Proportion)
            .synthesize()
            .unwrap();
        let mut buf = Vec::new();
        curves.write_table(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        // header, blank, column names, separator, then 101 / 10 rounded up
        assert_eq!(text.lines().count(), 4 + 11);
        assert!(text.starts_with("Domain ["));
    }
}
