use core_types::{HourlySample, Variable};
use serde::{Deserialize, Serialize};

use crate::numeric::{mean, percentile, population_std_dev};

/// Summary statistics of one variable across a series.
///
/// `count + missing_count` always equals the length of the input series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VariableStatistics {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    pub count: usize,
    pub missing_count: usize,
}

/// Collects the finite readings of `variable`, in series order.
pub fn valid_values(series: &[HourlySample], variable: Variable) -> Vec<f64> {
    series.iter().filter_map(|s| s.get(variable)).collect()
}

/// Computes the summary of `variable`. With no valid readings every figure is
/// zero and the whole series counts as missing.
pub fn describe(series: &[HourlySample], variable: Variable) -> VariableStatistics {
    let values = valid_values(series, variable);
    let stats = summarize(&values, series.len());
    if stats.count == 0 && !series.is_empty() {
        tracing::debug!(%variable, samples = series.len(), "no valid readings");
    }
    stats
}

/// Summarizes already-filtered values taken from a series of `series_len` samples.
pub fn summarize(values: &[f64], series_len: usize) -> VariableStatistics {
    if values.is_empty() {
        return VariableStatistics {
            missing_count: series_len,
            ..VariableStatistics::default()
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let m = mean(values);
    VariableStatistics {
        mean: m,
        median: percentile(&sorted, 50.0),
        std_dev: population_std_dev(values, m),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
        p95: percentile(&sorted, 95.0),
        count: values.len(),
        missing_count: series_len.saturating_sub(values.len()),
    }
}
