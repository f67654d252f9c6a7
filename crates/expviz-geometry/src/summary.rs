use serde::{Deserialize, Serialize};

/// How a group's mean should be interpreted when deriving its spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// The mean is a rate in `[0, 1]` and the spread is `sqrt(p(1-p))`.
    #[default]
    Proportion,
    /// The mean is an arbitrary value and the spread is supplied directly.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SummaryStatError {
    #[display("sample size must be at least 1")]
    EmptySample,
    #[display("mean must be finite, got {mean}")]
    NonFiniteMean { mean: f64 },
    #[display("standard deviation must be finite and non-negative, got {std}")]
    InvalidStd { std: f64 },
}

/// Aggregate statistics describing one experiment group.
///
/// Only the mean, the sample size and (for continuous metrics) the standard
/// deviation are known; the raw observations never reach this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    /// Group mean, or the observed rate for proportions.
    pub mean: f64,
    /// Number of observations, always at least 1.
    pub n: u64,
    /// Standard deviation for continuous metrics.
    pub std: Option<f64>,
}

impl SummaryStat {
    /// Creates a validated summary statistic.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::summary::SummaryStat;
    /// let stat = SummaryStat::new(12.5, 400, Some(3.0)).unwrap();
    /// assert_eq!(stat.n, 400);
    /// assert!(SummaryStat::new(12.5, 0, None).is_err());
    /// ```
    pub fn new(mean: f64, n: u64, std: Option<f64>) -> Result<Self, SummaryStatError> {
        if n == 0 {
            return Err(SummaryStatError::EmptySample);
        }
        if !mean.is_finite() {
            return Err(SummaryStatError::NonFiniteMean { mean });
        }
        if let Some(std) = std
            && !(std.is_finite() && std >= 0.0)
        {
            return Err(SummaryStatError::InvalidStd { std });
        }
        Ok(Self { mean, n, std })
    }

    /// Creates a proportion statistic from a conversion count.
    ///
    /// # Examples
    ///
    /// ```
    /// # use expviz_geometry::summary::SummaryStat;
    /// let stat = SummaryStat::from_conversions(50, 1000).unwrap();
    /// assert!((stat.mean - 0.05).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn from_conversions(conversions: u64, visitors: u64) -> Result<Self, SummaryStatError> {
        if visitors == 0 {
            return Err(SummaryStatError::EmptySample);
        }
        Self::new(conversions as f64 / visitors as f64, visitors, None)
    }

    /// Spread of a single observation.
    ///
    /// For proportions this is `sqrt(p(1-p))`; for continuous metrics it is the
    /// supplied standard deviation, if any.
    #[must_use]
    pub fn spread(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Proportion => Some((self.mean * (1.0 - self.mean)).max(0.0).sqrt()),
            MetricKind::Continuous => self.std,
        }
    }

    /// Standard error of the mean, `spread / sqrt(n)`.
    ///
    /// Returns `None` for a continuous metric without a standard deviation.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn standard_error(&self, kind: MetricKind) -> Option<f64> {
        self.spread(kind).map(|s| s / (self.n as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_inputs() {
        assert_eq!(
            SummaryStat::new(1.0, 0, None),
            Err(SummaryStatError::EmptySample)
        );
        assert!(matches!(
            SummaryStat::new(f64::NAN, 10, None),
            Err(SummaryStatError::NonFiniteMean { .. })
        ));
        assert!(matches!(
            SummaryStat::new(1.0, 10, Some(-0.5)),
            Err(SummaryStatError::InvalidStd { .. })
        ));
    }

    #[test]
    fn test_proportion_standard_error() {
        let stat = SummaryStat::new(0.5, 100, None).unwrap();
        let se = stat.standard_error(MetricKind::Proportion).unwrap();
        assert!((se - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_continuous_standard_error() {
        let stat = SummaryStat::new(20.0, 25, Some(5.0)).unwrap();
        assert_eq!(stat.standard_error(MetricKind::Continuous), Some(1.0));

        let no_std = SummaryStat::new(20.0, 25, None).unwrap();
        assert_eq!(no_std.standard_error(MetricKind::Continuous), None);
    }

    #[test]
    fn test_zero_std_is_allowed() {
        let stat = SummaryStat::new(3.0, 5, Some(0.0)).unwrap();
        assert_eq!(stat.standard_error(MetricKind::Continuous), Some(0.0));
    }

    #[test]
    fn test_metric_kind_wire_name() {
        assert_eq!(
            serde_json::to_string(&MetricKind::Continuous).unwrap(),
            r#""continuous""#
        );
        let stat: SummaryStat =
            serde_json::from_str(r#"{"mean": 0.1, "n": 200, "std": null}"#).unwrap();
        assert_eq!(stat.std, None);
    }
}
