//! Result payloads returned by the statistics service.
//!
//! Only the scalar fields the charts consume are modelled; anything else in
//! the payload is ignored. Field names match the service's JSON.

use expviz_geometry::summary::MetricKind;
use serde::{Deserialize, Serialize};

/// Two-group significance test result, conversion or continuous.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SignificanceResult {
    pub control_rate: Option<f64>,
    pub variant_rate: Option<f64>,
    pub control_mean: Option<f64>,
    pub variant_mean: Option<f64>,
    pub control_ci: Option<[f64; 2]>,
    pub variant_ci: Option<[f64; 2]>,
    pub confidence_interval: Option<[f64; 2]>,
    pub p_value: Option<f64>,
    pub lift_percent: Option<f64>,
    pub is_significant: Option<bool>,
    pub confidence: Option<f64>,
}

impl SignificanceResult {
    /// Conversion results carry rates, continuous results carry means.
    pub fn metric_kind(&self) -> MetricKind {
        if self.control_rate.is_some() || self.variant_rate.is_some() {
            MetricKind::Proportion
        } else {
            MetricKind::Continuous
        }
    }

    /// `(control, variant)` primary outcome values.
    pub fn values(&self) -> Option<(f64, f64)> {
        match self.metric_kind() {
            MetricKind::Proportion => Some((self.control_rate?, self.variant_rate?)),
            MetricKind::Continuous => Some((self.control_mean?, self.variant_mean?)),
        }
    }
}

/// Time-to-event or event-rate result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TimingResult {
    pub control_median_time: Option<f64>,
    pub treatment_median_time: Option<f64>,
    pub hazard_ratio: Option<f64>,
    pub hazard_ratio_ci: Option<[f64; 2]>,
    pub control_events: Option<u64>,
    pub treatment_events: Option<u64>,
    pub control_censored: Option<u64>,
    pub treatment_censored: Option<u64>,
    pub control_rate: Option<f64>,
    pub treatment_rate: Option<f64>,
    pub control_rate_ci: Option<[f64; 2]>,
    pub treatment_rate_ci: Option<[f64; 2]>,
    pub rate_ratio: Option<f64>,
    pub rate_ratio_ci: Option<[f64; 2]>,
    pub rate_difference_percent: Option<f64>,
    pub p_value: Option<f64>,
}

/// Diff-in-difference result; rates for conversions, means otherwise.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DiffInDiffResult {
    pub control_pre_rate: Option<f64>,
    pub control_post_rate: Option<f64>,
    pub treatment_pre_rate: Option<f64>,
    pub treatment_post_rate: Option<f64>,
    pub control_pre_mean: Option<f64>,
    pub control_post_mean: Option<f64>,
    pub treatment_pre_mean: Option<f64>,
    pub treatment_post_mean: Option<f64>,
    pub diff_in_diff: Option<f64>,
    pub confidence_interval: Option<[f64; 2]>,
    pub p_value: Option<f64>,
}

impl DiffInDiffResult {
    /// `[control_pre, control_post, treatment_pre, treatment_post]`, taken
    /// from the rate fields when all four are present, else from the means.
    pub fn values(&self) -> Option<[f64; 4]> {
        let rates = || {
            Some([
                self.control_pre_rate?,
                self.control_post_rate?,
                self.treatment_pre_rate?,
                self.treatment_post_rate?,
            ])
        };
        let means = || {
            Some([
                self.control_pre_mean?,
                self.control_post_mean?,
                self.treatment_pre_mean?,
                self.treatment_post_mean?,
            ])
        };
        rates().or_else(means)
    }
}

/// One group of a multi-variant result.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VariantSummary {
    pub name: String,
    pub visitors: u64,
    pub conversions: Option<u64>,
    pub rate: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

/// Multi-variant significance result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MultiVariantResult {
    #[serde(default)]
    pub variants: Vec<VariantSummary>,
    pub best_variant: Option<String>,
}

impl MultiVariantResult {
    /// Conversion results have a rate on every variant.
    pub fn metric_kind(&self) -> MetricKind {
        if !self.variants.is_empty() && self.variants.iter().all(|v| v.rate.is_some()) {
            MetricKind::Proportion
        } else {
            MetricKind::Continuous
        }
    }
}
