use core_types::{HourlySample, Variable};
use serde::{Deserialize, Serialize};

use crate::correlation::MIN_PAIRS;
use crate::numeric::{correlation_p_value, linear_regression};

/// Direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClassification {
    Increasing,
    Decreasing,
    Stable,
}

/// Least-squares trend of a variable against elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub variable: Variable,
    /// Change per hour, in the variable's unit.
    pub slope: f64,
    /// Fitted value at the first sample of the series.
    pub intercept: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub classification: TrendClassification,
    /// `(1 − p) · 100`, in percent.
    pub confidence: f64,
    /// Points the fit was computed from.
    pub sample_count: usize,
}

impl TrendResult {
    /// The result reported when there is not enough data to fit a line.
    pub fn degenerate(variable: Variable, sample_count: usize) -> Self {
        Self {
            variable,
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            p_value: 1.0,
            classification: TrendClassification::Stable,
            confidence: 0.0,
            sample_count,
        }
    }
}

/// Fits `value = slope · hours + intercept`, where `hours` is measured from the
/// first sample of the series.
///
/// The trend counts as increasing or decreasing only when its p-value is below
/// `significance`; otherwise it is stable. Fewer than three points, or points
/// that all share one timestamp, give a degenerate stable result.
pub fn analyze_trend(series: &[HourlySample], variable: Variable, significance: f64) -> TrendResult {
    let Some(first) = series.first() else {
        return TrendResult::degenerate(variable, 0);
    };
    let origin = first.timestamp;

    let (hours, values): (Vec<f64>, Vec<f64>) = series
        .iter()
        .filter_map(|s| {
            let value = s.get(variable)?;
            let elapsed = (s.timestamp - origin).num_milliseconds() as f64 / 3_600_000.0;
            Some((elapsed, value))
        })
        .unzip();

    let sample_count = values.len();
    if sample_count < MIN_PAIRS {
        return TrendResult::degenerate(variable, sample_count);
    }
    let Some(fit) = linear_regression(&hours, &values) else {
        tracing::debug!(%variable, "all points share one timestamp, trend undefined");
        return TrendResult::degenerate(variable, sample_count);
    };

    let r = fit.r_squared.sqrt().copysign(fit.slope);
    let p_value = if fit.r_squared == 0.0 {
        1.0
    } else {
        correlation_p_value(r, sample_count)
    };

    let classification = if p_value < significance {
        if fit.slope > 0.0 {
            TrendClassification::Increasing
        } else if fit.slope < 0.0 {
            TrendClassification::Decreasing
        } else {
            TrendClassification::Stable
        }
    } else {
        TrendClassification::Stable
    };

    TrendResult {
        variable,
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        p_value,
        classification,
        confidence: (1.0 - p_value) * 100.0,
        sample_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(values: &[Option<f64>]) -> Vec<HourlySample> {
        let start = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let s = HourlySample::new(start + Duration::hours(i as i64));
                match v {
                    Some(v) => s.with(Variable::Pressure, *v),
                    None => s,
                }
            })
            .collect()
    }

    #[test]
    fn rising_series_is_increasing() {
        let values: Vec<Option<f64>> = (0..24)
            .map(|h| Some(1000.0 + 0.5 * h as f64 + if h % 2 == 0 { 0.1 } else { -0.1 }))
            .collect();
        let trend = analyze_trend(&series_from(&values), Variable::Pressure, 0.05);
        assert_eq!(trend.classification, TrendClassification::Increasing);
        assert_abs_diff_eq!(trend.slope, 0.5, epsilon = 0.01);
        assert!(trend.r_squared > 0.99);
        assert!(trend.p_value < 0.05);
        assert!(trend.confidence > 95.0);
        assert_eq!(trend.sample_count, 24);
    }

    #[test]
    fn falling_series_is_decreasing() {
        let values: Vec<Option<f64>> = (0..40).map(|h| Some(20.0 - 0.2 * h as f64)).collect();
        let trend = analyze_trend(&series_from(&values), Variable::Pressure, 0.05);
        assert_eq!(trend.classification, TrendClassification::Decreasing);
        assert_abs_diff_eq!(trend.intercept, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn noise_without_drift_is_stable() {
        let values: Vec<Option<f64>> = [3.0, -3.0, 2.0, -2.0, 3.0, -3.0, 2.0, -2.0]
            .into_iter()
            .map(|v| Some(1000.0 + v))
            .collect();
        let trend = analyze_trend(&series_from(&values), Variable::Pressure, 0.05);
        assert_eq!(trend.classification, TrendClassification::Stable);
        assert!(trend.p_value >= 0.05);
    }

    #[test]
    fn too_few_points_is_degenerate() {
        let values = [Some(1.0), None, Some(2.0), None];
        let trend = analyze_trend(&series_from(&values), Variable::Pressure, 0.05);
        assert_eq!(trend, TrendResult::degenerate(Variable::Pressure, 2));
        assert_eq!(
            analyze_trend(&[], Variable::Pressure, 0.05),
            TrendResult::degenerate(Variable::Pressure, 0)
        );
    }

    #[test]
    fn elapsed_time_counts_from_first_sample_even_if_missing() {
        // The first hour has no reading, so the line starts at hour 1.
        let values = [None, Some(2.0), Some(3.0), Some(4.0)];
        let trend = analyze_trend(&series_from(&values), Variable::Pressure, 0.05);
        assert_abs_diff_eq!(trend.slope, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(trend.intercept, 1.0, epsilon = 1e-12);
    }
}
