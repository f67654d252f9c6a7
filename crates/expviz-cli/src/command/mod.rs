use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{
    render::{OutputFormat, Renderer},
    util,
};

use self::{
    compare::{CompareArg, RatesArg},
    diff_in_diff::DiffInDiffArg,
    distribution::DistributionArg,
    power::PowerArg,
    rank::RankArg,
    spectrum::{IntervalArg, SpectrumArg},
    survival::SurvivalArg,
};

mod compare;
mod diff_in_diff;
mod distribution;
mod power;
mod rank;
mod spectrum;
mod survival;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "EXPVIZ_LOG";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Output format (`json` or `table`)
    #[arg(long, global = true, default_value = "json")]
    format: OutputFormat,
    /// Output file path (defaults to stdout)
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Chart style JSON file (defaults to the built-in palette)
    #[arg(long, global = true)]
    style: Option<PathBuf>,
    /// Which chart to build
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Overlaid normal density curves for two groups
    Distribution(#[clap(flatten)] DistributionArg),
    /// Exponential survival curves from median times
    Survival(#[clap(flatten)] SurvivalArg),
    /// Sample size versus statistical power curve
    Power(#[clap(flatten)] PowerArg),
    /// Effect spectrum around a baseline with the MDE gray area
    Spectrum(#[clap(flatten)] SpectrumArg),
    /// Confidence interval bar for a single estimate
    Interval(#[clap(flatten)] IntervalArg),
    /// Control versus variant bars from a significance result
    Compare(#[clap(flatten)] CompareArg),
    /// Control versus treatment event rates from a timing result
    Rates(#[clap(flatten)] RatesArg),
    /// Pre/post trend with counterfactual line
    DiffInDiff(#[clap(flatten)] DiffInDiffArg),
    /// Multi-variant groups ordered for display
    Rank(#[clap(flatten)] RankArg),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing();

    let renderer = Renderer {
        format: args.format,
        output: args.output,
        style: util::read_style_file(args.style.as_deref())?,
    };

    match args.mode {
        Mode::Distribution(arg) => distribution::run(&arg, &renderer)?,
        Mode::Survival(arg) => survival::run(&arg, &renderer)?,
        Mode::Power(arg) => power::run(&arg, &renderer)?,
        Mode::Spectrum(arg) => spectrum::run_spectrum(&arg, &renderer)?,
        Mode::Interval(arg) => spectrum::run_interval(&arg, &renderer)?,
        Mode::Compare(arg) => compare::run_compare(&arg, &renderer)?,
        Mode::Rates(arg) => compare::run_rates(&arg, &renderer)?,
        Mode::DiffInDiff(arg) => diff_in_diff::run(&arg, &renderer)?,
        Mode::Rank(arg) => rank::run(&arg, &renderer)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CommandArgs::try_parse_from([
            "expviz", "power", "--required-n", "1000", "--format", "table",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Table);
        assert!(matches!(args.mode, Mode::Power(_)));
    }
}
