use std::io::{self, Write};

use clap::Args;
use expviz_geometry::power::PowerCurve;

use crate::render::{Renderer, Report, write_separator};

#[derive(Debug, Clone, Args)]
pub(crate) struct PowerArg {
    /// Sample size per group needed to reach the target power
    #[arg(long)]
    required_n: u64,
    /// Target power in percent
    #[arg(long, default_value_t = 80.0)]
    target_power: f64,
    /// Shift the curve so it passes through the target power at the required size
    #[arg(long)]
    calibrated: bool,
}

impl Report for PowerCurve {
    const CHART: &'static str = "power";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "Required n={}, target power={:.1}%",
            self.required_n, self.target_power,
        )?;
        writeln!(w)?;
        writeln!(w, "  {:>10} {:>8} {:>3}", "n", "Power", "")?;
        write_separator(w, 23)?;
        for point in &self.points {
            let marker = if point.n == self.required_n { "<-" } else { "" };
            writeln!(w, "  {:>10} {:>7.1}% {marker:>3}", point.n, point.power)?;
        }
        Ok(())
    }
}

pub(crate) fn run(arg: &PowerArg, renderer: &Renderer) -> anyhow::Result<()> {
    let curve = if arg.calibrated {
        PowerCurve::calibrated(arg.required_n, arg.target_power)
    } else {
        PowerCurve::approximate(arg.required_n, arg.target_power)
    };
    renderer.emit(curve.as_ref())
}
