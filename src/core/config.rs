//! Metric configuration and runtime metric selection.
//!
//! Each metric has its own typed configuration struct. [`MetricConfig`] is
//! the tagged union used when the metric is chosen at runtime, e.g. from a
//! JSON or TOML document:
//!
//! ```
//! use tsdist::MetricConfig;
//!
//! let cfg: MetricConfig = serde_json::from_str(r#"{"metric": "dtw", "window": 0.1}"#).unwrap();
//! assert_eq!(cfg.metric().name(), "dtw");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::algorithms::bounding::Bounding;
use crate::core::error::{SpecializationError, UnknownMetric};
use crate::metrics::dtw::DtwConfig;
use crate::metrics::edr::EdrConfig;
use crate::metrics::erp::ErpConfig;
use crate::metrics::lcss::LcssConfig;
use crate::metrics::wdtw::WdtwConfig;

/// Configuration of a metric that takes no parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoConfig {}

/// Resolve the optional warping-window parameters shared by elastic metrics.
pub fn resolve_bounding(
    metric: &'static str,
    window: Option<f64>,
    itakura_max_slope: Option<f64>,
) -> Result<Bounding, SpecializationError> {
    match (window, itakura_max_slope) {
        (Some(_), Some(_)) => Err(SpecializationError::ConflictingParameters {
            metric,
            first: "window",
            second: "itakura_max_slope",
        }),
        (Some(window), None) => {
            require_unit_interval(metric, "window", window)?;
            Ok(Bounding::SakoeChiba { window })
        }
        (None, Some(max_slope)) => {
            require_unit_interval(metric, "itakura_max_slope", max_slope)?;
            Ok(Bounding::Itakura { max_slope })
        }
        (None, None) => Ok(Bounding::Full),
    }
}

pub fn require_unit_interval(
    metric: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), SpecializationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SpecializationError::InvalidParameter {
            metric,
            parameter,
            value: value.to_string(),
            reason: "must lie in [0, 1]",
        });
    }
    Ok(())
}

pub fn require_positive(
    metric: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), SpecializationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(SpecializationError::InvalidParameter {
            metric,
            parameter,
            value: value.to_string(),
            reason: "must be finite and greater than 0",
        });
    }
    Ok(())
}

pub fn require_non_negative(
    metric: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), SpecializationError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(SpecializationError::InvalidParameter {
            metric,
            parameter,
            value: value.to_string(),
            reason: "must be finite and at least 0",
        });
    }
    Ok(())
}

pub fn require_finite(
    metric: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), SpecializationError> {
    if !value.is_finite() {
        return Err(SpecializationError::InvalidParameter {
            metric,
            parameter,
            value: value.to_string(),
            reason: "must be finite",
        });
    }
    Ok(())
}

/// The distance metrics known to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Absolute,
    Squared,
    Euclidean,
    Dtw,
    Wdtw,
    Lcss,
    Erp,
    Edr,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Absolute,
        Metric::Squared,
        Metric::Euclidean,
        Metric::Dtw,
        Metric::Wdtw,
        Metric::Lcss,
        Metric::Erp,
        Metric::Edr,
    ];

    /// Canonical name, as accepted by [`FromStr`] and serde.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Absolute => "absolute",
            Metric::Squared => "squared",
            Metric::Euclidean => "euclidean",
            Metric::Dtw => "dtw",
            Metric::Wdtw => "wdtw",
            Metric::Lcss => "lcss",
            Metric::Erp => "erp",
            Metric::Edr => "edr",
        }
    }

    /// This metric with its default configuration.
    pub fn default_config(self) -> MetricConfig {
        match self {
            Metric::Absolute => MetricConfig::Absolute,
            Metric::Squared => MetricConfig::Squared,
            Metric::Euclidean => MetricConfig::Euclidean,
            Metric::Dtw => MetricConfig::Dtw(DtwConfig::default()),
            Metric::Wdtw => MetricConfig::Wdtw(WdtwConfig::default()),
            Metric::Lcss => MetricConfig::Lcss(LcssConfig::default()),
            Metric::Erp => MetricConfig::Erp(ErpConfig::default()),
            Metric::Edr => MetricConfig::Edr(EdrConfig::default()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "absolute" | "manhattan" | "sad" | "cityblock" => Ok(Metric::Absolute),
            "squared" | "squared_euclidean" | "sqeuclidean" => Ok(Metric::Squared),
            "euclidean" | "ed" => Ok(Metric::Euclidean),
            "dtw" | "dynamic_time_warping" => Ok(Metric::Dtw),
            "wdtw" | "weighted_dtw" => Ok(Metric::Wdtw),
            "lcss" | "longest_common_subsequence" => Ok(Metric::Lcss),
            "erp" | "edit_real_penalty" => Ok(Metric::Erp),
            "edr" | "edit_distance_real_sequences" => Ok(Metric::Edr),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// A metric together with its parameters, chosen at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", rename_all = "snake_case")]
pub enum MetricConfig {
    Absolute,
    Squared,
    Euclidean,
    Dtw(DtwConfig),
    Wdtw(WdtwConfig),
    Lcss(LcssConfig),
    Erp(ErpConfig),
    Edr(EdrConfig),
}

impl MetricConfig {
    pub fn metric(&self) -> Metric {
        match self {
            MetricConfig::Absolute => Metric::Absolute,
            MetricConfig::Squared => Metric::Squared,
            MetricConfig::Euclidean => Metric::Euclidean,
            MetricConfig::Dtw(_) => Metric::Dtw,
            MetricConfig::Wdtw(_) => Metric::Wdtw,
            MetricConfig::Lcss(_) => Metric::Lcss,
            MetricConfig::Erp(_) => Metric::Erp,
            MetricConfig::Edr(_) => Metric::Edr,
        }
    }
}

impl From<Metric> for MetricConfig {
    fn from(metric: Metric) -> Self {
        metric.default_config()
    }
}
