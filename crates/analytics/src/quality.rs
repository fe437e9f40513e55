use chrono::{DateTime, Utc};
use core_types::{HourlySample, Variable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variables that must all be present for an hour to count as complete.
pub const CRITICAL_VARIABLES: [Variable; 3] = [
    Variable::Temperature,
    Variable::Pressure,
    Variable::RelativeHumidity,
];

/// Default cap on the suspicious readings listed in a report.
pub const MAX_SUSPICIOUS_VALUES: usize = 50;

/// A reading outside its variable's physical range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousValue {
    pub timestamp: DateTime<Utc>,
    pub variable: Variable,
    pub value: f64,
    pub expected_min: f64,
    pub expected_max: f64,
}

/// Completeness and plausibility of a weather record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_samples: usize,
    /// Samples carrying every critical variable.
    pub complete_samples: usize,
    pub missing_percent: f64,
    /// 0–100; penalized by missing critical data and by out-of-range readings.
    pub quality_score: f64,
    /// Share of samples with a valid reading, per variable (%).
    pub completeness: BTreeMap<Variable, f64>,
    /// Every out-of-range reading, including the ones not listed.
    pub outlier_count: usize,
    /// The first out-of-range readings in series order, capped.
    pub suspicious_values: Vec<SuspiciousValue>,
}

/// Scores the record's completeness and plausibility.
///
/// An empty series has 0% completeness and a score of 0.
pub fn assess_quality(series: &[HourlySample], max_suspicious: usize) -> QualityReport {
    let total = series.len();

    let complete = series
        .iter()
        .filter(|s| CRITICAL_VARIABLES.iter().all(|v| s.has(*v)))
        .count();

    let mut outlier_count = 0;
    let mut suspicious_values = Vec::new();
    for sample in series {
        for variable in Variable::ALL {
            let Some(value) = sample.get(variable) else {
                continue;
            };
            let (expected_min, expected_max) = variable.physical_range();
            if value < expected_min || value > expected_max {
                outlier_count += 1;
                if suspicious_values.len() < max_suspicious {
                    suspicious_values.push(SuspiciousValue {
                        timestamp: sample.timestamp,
                        variable,
                        value,
                        expected_min,
                        expected_max,
                    });
                }
            }
        }
    }

    let completeness = Variable::ALL
        .into_iter()
        .map(|variable| {
            let present = series.iter().filter(|s| s.has(variable)).count();
            (variable, percent(present, total))
        })
        .collect();

    let missing_percent = if total == 0 {
        100.0
    } else {
        percent(total - complete, total)
    };
    let outlier_percent = percent(outlier_count, total);
    let quality_score = (100.0 - missing_percent - outlier_percent).clamp(0.0, 100.0);

    if outlier_count > suspicious_values.len() {
        tracing::debug!(
            outliers = outlier_count,
            listed = suspicious_values.len(),
            "suspicious value list truncated"
        );
    }

    QualityReport {
        total_samples: total,
        complete_samples: complete,
        missing_percent,
        quality_score,
        completeness,
        outlier_count,
        suspicious_values,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
