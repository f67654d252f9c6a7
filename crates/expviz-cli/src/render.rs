//! Shared output path for every chart command.
//!
//! Each command produces a [`Report`]. In JSON mode the report is wrapped in an
//! envelope carrying the chart name and the style; in table mode it prints
//! itself as fixed-width text. A command with nothing to draw still emits an
//! envelope with `"data": null` and exits successfully.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Serialize;

use crate::schema::style::ChartStyle;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Table,
}

pub(crate) trait Report: Serialize {
    /// Chart identifier written to the JSON envelope.
    const CHART: &'static str;

    fn write_table(&self, w: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Serialize)]
struct Envelope<'a, R> {
    chart: &'static str,
    style: &'a ChartStyle,
    data: Option<&'a R>,
}

/// Buffered sink for one chart, stdout or a file.
struct Output {
    writer: Box<dyn Write>,
    target: String,
}

impl Output {
    fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                target: "stdout".to_owned(),
            });
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            target: path.display().to_string(),
        })
    }

    fn write_report<R>(
        &mut self,
        format: OutputFormat,
        envelope: &Envelope<'_, R>,
    ) -> io::Result<()>
    where
        R: Report,
    {
        match (format, envelope.data) {
            (OutputFormat::Json, _) => {
                serde_json::to_writer_pretty(&mut self.writer, envelope)?;
                writeln!(self.writer)?;
            }
            (OutputFormat::Table, Some(report)) => report.write_table(&mut *self.writer)?,
            (OutputFormat::Table, None) => {
                writeln!(self.writer, "{}: no data to draw", envelope.chart)?;
            }
        }
        self.writer.flush()
    }
}

#[derive(Debug)]
pub(crate) struct Renderer {
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub style: ChartStyle,
}

impl Renderer {
    pub(crate) fn emit<R>(&self, report: Option<&R>) -> anyhow::Result<()>
    where
        R: Report,
    {
        if report.is_none() {
            tracing::warn!(chart = R::CHART, "not enough data, nothing to draw");
        }

        let mut output = Output::open(self.output.as_deref())?;
        let envelope = Envelope {
            chart: R::CHART,
            style: &self.style,
            data: report,
        };
        output.write_report(self.format, &envelope).with_context(|| {
            format!("Failed to write {} chart to {}", R::CHART, output.target)
        })?;

        tracing::info!(chart = R::CHART, output = %output.target, "chart written");
        Ok(())
    }
}

/// Formats an optional value, or `label` when it is absent.
pub(crate) fn or_label(value: Option<f64>, precision: usize, label: &str) -> String {
    value.map_or_else(|| label.to_owned(), |v| format!("{v:.precision$}"))
}

/// Writes a horizontal rule under a table header.
pub(crate) fn write_separator(w: &mut dyn Write, width: usize) -> io::Result<()> {
    writeln!(w, "  {}", "-".repeat(width))
}

#[cfg(test)]
mod tests {
    use expviz_geometry::power::PowerCurve;

    use super::*;

    fn render_to_string(format: OutputFormat, report: Option<&PowerCurve>) -> String {
        let path = std::env::temp_dir().join(format!(
            "expviz-render-{}-{format:?}-{}.out",
            std::process::id(),
            report.is_some()
        ));
        let renderer = Renderer {
            format,
            output: Some(path.clone()),
            style: ChartStyle::default(),
        };
        renderer.emit(report).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(path).unwrap();
        text
    }

    #[test]
    fn test_no_data_writes_null_envelope() {
        let text = render_to_string(OutputFormat::Json, None);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["chart"], "power");
        assert!(value["data"].is_null());
        assert!(value["style"]["control"]["stroke"].is_string());
    }

    #[test]
    fn test_no_data_table_line() {
        let text = render_to_string(OutputFormat::Table, None);
        assert_eq!(text, "power: no data to draw\n");
    }

    #[test]
    fn test_report_json_lists_points() {
        let curve = PowerCurve::approximate(1000, 80.0).unwrap();
        let text = render_to_string(OutputFormat::Json, Some(&curve));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["data"]["required_n"], 1000);
        assert_eq!(value["data"]["points"].as_array().unwrap().len(), curve.points.len());
    }
}
