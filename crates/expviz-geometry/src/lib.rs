//! Chart geometry for experiment results.
//!
//! This crate turns summary statistics of an experiment (means, rates, sample
//! sizes, median times, interval bounds) into plot points and track positions.
//! It never sees raw observations and performs no I/O; every function is a
//! pure computation that either returns a complete result or `None` when there
//! is nothing to draw.
//!
//! # Modules
//!
//! - [`summary`]: Group summary statistics and standard errors
//! - [`curve`]: Shared point type and sampling grid
//! - [`normal`]: Overlaid normal densities comparing two means
//! - [`survival`]: Exponential survival curves rebuilt from two medians
//! - [`power`]: Power-vs-sample-size curve around a required sample size
//! - [`range`]: Display windows and value-to-percent mapping
//! - [`series`]: Bar comparison, diff-in-difference trend and ranking rows
//! - [`spectrum`]: Effect-size spectrum and single interval bar layouts
//!
//! # Examples
//!
//! ## Comparing two conversion rates
//!
//! ```
//! use expviz_geometry::{normal::DistributionInput, summary::MetricKind};
//!
//! let input = DistributionInput::new(0.05, 0.06, 10_000, 10_000, MetricKind::Proportion);
//! let curves = input.synthesize().unwrap();
//! assert!(curves.domain.contains(0.05) && curves.domain.contains(0.06));
//! ```
//!
//! ## Survival curves from median times
//!
//! ```
//! use expviz_geometry::survival;
//!
//! let points = survival::approximate(30.0, 24.0).unwrap();
//! assert!(points.iter().all(|p| p.treatment <= p.control));
//! ```
//!
//! ## Placing values on a track
//!
//! ```
//! use expviz_geometry::range::{ClampPolicy, Padding, RangeMapper};
//!
//! let mapper = RangeMapper::new(Padding::Fraction(0.1), ClampPolicy::NonNegative);
//! let window = mapper.build_window([0.04, 0.05, 0.06]).unwrap();
//! let position = window.to_percent(0.05).unwrap();
//! assert!((position - 50.0).abs() < 1e-9);
//! ```
//!
//! ## Diff-in-difference trend
//!
//! ```
//! use expviz_geometry::series;
//!
//! let trend = series::diff_in_diff(0.10, 0.11, 0.10, 0.15).unwrap();
//! assert!((trend.effect - 0.04).abs() < 1e-12);
//! ```

pub mod curve;
pub mod normal;
pub mod power;
pub mod range;
pub mod series;
pub mod spectrum;
pub mod summary;
pub mod survival;
