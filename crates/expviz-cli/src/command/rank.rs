use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Args;
use expviz_geometry::{
    range::{ClampPolicy, DisplayWindow, Padding, RangeMapper},
    series::{self, RATE_AXIS_HEADROOM},
    summary::MetricKind,
};
use serde::Serialize;

use crate::{
    render::{Renderer, Report, or_label, write_separator},
    schema::service::{MultiVariantResult, VariantSummary},
    util,
};

/// Field the variants are ranked by.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum RankMetric {
    /// Rate for conversion results, mean otherwise.
    #[default]
    Auto,
    Rate,
    Mean,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct RankArg {
    /// Multi-variant result JSON file from the statistics service
    #[arg(long)]
    result: PathBuf,
    /// Field to rank by (`auto`, `rate` or `mean`)
    #[arg(long, default_value = "auto")]
    by: RankMetric,
}

#[derive(Debug, Clone, Serialize)]
struct RankedVariant {
    rank: usize,
    name: String,
    visitors: u64,
    value: Option<f64>,
    is_best: bool,
}

#[derive(Debug, Clone, Serialize)]
struct RankReport {
    kind: MetricKind,
    variants: Vec<RankedVariant>,
    axis: Option<DisplayWindow>,
}

impl Report for RankReport {
    const CHART: &'static str = "rank";

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "  {:>4} {:<20} {:>10} {:>14} {:>4}",
            "#", "Variant", "Visitors", "Value", ""
        )?;
        write_separator(w, 56)?;
        for variant in &self.variants {
            let best = if variant.is_best { "*" } else { "" };
            writeln!(
                w,
                "  {:>4} {:<20} {:>10} {:>14} {best:>4}",
                variant.rank,
                variant.name,
                variant.visitors,
                or_label(variant.value, 6, "N/A"),
            )?;
        }
        Ok(())
    }
}

fn resolve_kind(by: RankMetric, result: &MultiVariantResult) -> MetricKind {
    match by {
        RankMetric::Auto => result.metric_kind(),
        RankMetric::Rate => MetricKind::Proportion,
        RankMetric::Mean => MetricKind::Continuous,
    }
}

fn value_of(variant: &VariantSummary, kind: MetricKind) -> Option<f64> {
    match kind {
        MetricKind::Proportion => variant.rate,
        MetricKind::Continuous => variant.mean,
    }
}

fn build_report(result: &MultiVariantResult, by: RankMetric) -> Option<RankReport> {
    if result.variants.is_empty() {
        return None;
    }
    let kind = resolve_kind(by, result);
    let ranked = series::rank_descending(result.variants.iter().collect(), |v| {
        value_of(v, kind).unwrap_or(f64::NAN)
    });
    let axis = RangeMapper::new(
        Padding::Scale {
            lower: 1.0,
            upper: RATE_AXIS_HEADROOM,
        },
        ClampPolicy::ZeroBased,
    )
    .build_window(ranked.iter().filter_map(|v| value_of(v, kind)));

    let variants = ranked
        .into_iter()
        .enumerate()
        .map(|(i, v)| RankedVariant {
            rank: i + 1,
            name: v.name.clone(),
            visitors: v.visitors,
            value: value_of(v, kind),
            is_best: result.best_variant.as_deref() == Some(v.name.as_str()),
        })
        .collect();
    Some(RankReport {
        kind,
        variants,
        axis,
    })
}

pub(crate) fn run(arg: &RankArg, renderer: &Renderer) -> anyhow::Result<()> {
    let result: MultiVariantResult = util::read_result_file(&arg.result)?;
    renderer.emit(build_report(&result, arg.by).as_ref())
}
