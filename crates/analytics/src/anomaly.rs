use chrono::{DateTime, Utc};
use core_types::{HourlySample, Variable};
use serde::{Deserialize, Serialize};

use crate::descriptive::valid_values;
use crate::numeric::{is_degenerate_spread, mean, population_std_dev, z_score};

/// Default reporting threshold, in standard deviations.
pub const DEFAULT_THRESHOLD_SIGMA: f64 = 3.0;

/// How far outside the norm a flagged reading lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    /// |z| ≥ 3.5
    Medium,
    /// |z| ≥ 4
    High,
    /// |z| ≥ 5
    Extreme,
}

impl Severity {
    /// Buckets an absolute deviation (in σ). The buckets are fixed and do not
    /// move with the reporting threshold.
    pub fn from_deviation(deviation: f64) -> Self {
        match deviation.abs() {
            d if d >= 5.0 => Severity::Extreme,
            d if d >= 4.0 => Severity::High,
            d if d >= 3.5 => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// A single reading that lies unusually far from its variable's mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    pub timestamp: DateTime<Utc>,
    pub variable: Variable,
    pub observed: f64,
    /// The variable's mean over the series.
    pub expected: f64,
    /// Absolute distance from the mean in standard deviations.
    pub deviation_sigma: f64,
    pub severity: Severity,
}

/// Scores one reading. Returns `(|z|, severity)` when `|z|` exceeds `threshold`.
pub fn score_anomaly(value: f64, mean: f64, std_dev: f64, threshold: f64) -> Option<(f64, Severity)> {
    let deviation = z_score(value, mean, std_dev).abs();
    (deviation > threshold).then(|| (deviation, Severity::from_deviation(deviation)))
}

/// Flags readings of `variable` whose |z-score| against the series' own
/// mean and population std-dev exceeds `threshold`. A variable without spread
/// produces no anomalies.
pub fn detect_anomalies(
    series: &[HourlySample],
    variable: Variable,
    threshold: f64,
) -> Vec<AnomalyRecord> {
    let values = valid_values(series, variable);
    if values.is_empty() {
        return Vec::new();
    }
    let m = mean(&values);
    let std_dev = population_std_dev(&values, m);
    if is_degenerate_spread(std_dev, m) {
        tracing::debug!(%variable, "zero variance, skipping anomaly scan");
        return Vec::new();
    }

    series
        .iter()
        .filter_map(|sample| {
            let observed = sample.get(variable)?;
            let (deviation_sigma, severity) = score_anomaly(observed, m, std_dev, threshold)?;
            Some(AnomalyRecord {
                timestamp: sample.timestamp,
                variable,
                observed,
                expected: m,
                deviation_sigma,
                severity,
            })
        })
        .collect()
}
