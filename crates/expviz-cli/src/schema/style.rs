//! Visual constants handed to the renderer alongside the geometry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeriesStyle {
    /// Stroke color as a CSS color string.
    pub stroke: String,
    /// Fill color as a CSS color string.
    pub fill: String,
    pub stroke_width: f64,
    /// Dash pattern, empty for a solid line.
    #[serde(default)]
    pub dash: Vec<f64>,
}

impl SeriesStyle {
    fn solid(stroke: &str, fill: &str, stroke_width: f64) -> Self {
        Self {
            stroke: stroke.to_owned(),
            fill: fill.to_owned(),
            stroke_width,
            dash: vec![],
        }
    }

    fn dashed(stroke: &str, stroke_width: f64, dash: f64) -> Self {
        Self {
            stroke: stroke.to_owned(),
            fill: "none".to_owned(),
            stroke_width,
            dash: vec![dash, dash],
        }
    }
}

/// Styles for every series kind the charts draw.
///
/// Missing entries in a style file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartStyle {
    pub control: SeriesStyle,
    pub treatment: SeriesStyle,
    /// Treatment bar when the treatment moved the metric the wrong way.
    pub regression: SeriesStyle,
    pub counterfactual: SeriesStyle,
    pub power: SeriesStyle,
    pub reference: SeriesStyle,
    pub axis: String,
    pub tick: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            control: SeriesStyle::solid("#2d6d9a", "#d3e5ef", 2.0),
            treatment: SeriesStyle::solid("#0f7b0f", "#dbeddb", 2.0),
            regression: SeriesStyle::solid("#c4554d", "#ffe2dd", 1.0),
            counterfactual: SeriesStyle::dashed("#9f6b2c", 2.0, 5.0),
            power: SeriesStyle::solid("#6940a5", "#e8deee", 2.5),
            reference: SeriesStyle::dashed("#9b9b9b", 1.5, 4.0),
            axis: "rgba(55, 53, 47, 0.09)".to_owned(),
            tick: "#9b9b9b".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_style_file() {
        let json = r##"{"power": {"stroke": "#000000", "fill": "#ffffff", "stroke_width": 1.0}}"##;
        let style: ChartStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.power.stroke, "#000000");
        assert!(style.power.dash.is_empty());
        assert_eq!(style.control, ChartStyle::default().control);
    }
}
