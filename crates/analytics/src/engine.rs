use configuration::AnalysisParams;
use core_types::{HourlySample, Variable};
use std::collections::BTreeMap;

use crate::anomaly::{AnomalyRecord, detect_anomalies};
use crate::correlation::{CorrelationMatrix, correlation_matrix};
use crate::descriptive::{VariableStatistics, describe};
use crate::error::AnalyticsError;
use crate::quality::assess_quality;
use crate::report::AtmosphericResearchData;
use crate::trend::{TrendResult, analyze_trend};

/// A stateless calculator that turns an atmospheric record into a research report.
#[derive(Debug, Clone, Default)]
pub struct AtmosphericAnalyzer {
    params: AnalysisParams,
}

impl AtmosphericAnalyzer {
    /// Creates an analyzer, rejecting parameters that cannot produce a report.
    pub fn new(params: AnalysisParams) -> Result<Self, AnalyticsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// The main entry point for analysing a weather record.
    ///
    /// # Arguments
    ///
    /// * `label` - An opaque location/time-range label copied into the report.
    /// * `series` - The hourly samples, in time order. Missing readings are normal.
    ///
    /// Data problems never fail the call: they surface as missing counts, the
    /// quality report and degenerate correlation/trend entries. An empty series
    /// yields a zeroed report.
    pub fn analyze(&self, label: &str, series: &[HourlySample]) -> AtmosphericResearchData {
        if series.is_empty() {
            tracing::warn!(label, "analysing an empty series");
        }

        let statistics = self.calculate_statistics(series);

        let correlations = self
            .params
            .include_correlation
            .then(|| self.calculate_correlations(series));
        let trends = self
            .params
            .include_trends
            .then(|| self.calculate_trends(series, &statistics));
        let anomalies = self
            .params
            .include_anomalies
            .then(|| self.calculate_anomalies(series, &statistics));

        let quality = assess_quality(series, self.params.max_suspicious_values);

        tracing::info!(
            label,
            samples = series.len(),
            anomalies = anomalies.as_ref().map_or(0, Vec::len),
            quality_score = quality.quality_score,
            "atmospheric analysis complete"
        );

        AtmosphericResearchData {
            label: label.to_string(),
            sample_count: series.len(),
            period_start: series.first().map(|s| s.timestamp),
            period_end: series.last().map(|s| s.timestamp),
            statistics,
            correlations,
            trends,
            anomalies,
            quality,
        }
    }

    /// Descriptive statistics for every tracked variable.
    fn calculate_statistics(&self, series: &[HourlySample]) -> BTreeMap<Variable, VariableStatistics> {
        Variable::ALL
            .into_iter()
            .map(|variable| (variable, describe(series, variable)))
            .collect()
    }

    fn calculate_correlations(&self, series: &[HourlySample]) -> CorrelationMatrix {
        let matrix = correlation_matrix(series, &self.params.correlation_variables);
        tracing::debug!(variables = matrix.variables.len(), "correlation matrix built");
        matrix
    }

    /// Trends for every variable that has at least one reading.
    fn calculate_trends(
        &self,
        series: &[HourlySample],
        statistics: &BTreeMap<Variable, VariableStatistics>,
    ) -> Vec<TrendResult> {
        statistics
            .iter()
            .filter(|(_, stats)| stats.count > 0)
            .map(|(variable, _)| analyze_trend(series, *variable, self.params.trend_significance))
            .collect()
    }

    fn calculate_anomalies(
        &self,
        series: &[HourlySample],
        statistics: &BTreeMap<Variable, VariableStatistics>,
    ) -> Vec<AnomalyRecord> {
        let anomalies: Vec<AnomalyRecord> = statistics
            .iter()
            .filter(|(_, stats)| stats.count > 0)
            .flat_map(|(variable, _)| {
                detect_anomalies(series, *variable, self.params.anomaly_threshold_sigma)
            })
            .collect();
        tracing::debug!(count = anomalies.len(), "anomaly scan complete");
        anomalies
    }
}
