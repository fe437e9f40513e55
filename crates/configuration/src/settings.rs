use core_types::{AssetConfig, Variable};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)] // Use default values if the [analysis] section is missing
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

/// Tuning knobs for the atmospheric statistics engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// A reading is reported as an anomaly when its |z-score| exceeds this.
    pub anomaly_threshold_sigma: f64,
    pub include_correlation: bool,
    pub include_trends: bool,
    pub include_anomalies: bool,
    /// p-value below which a trend is classified as increasing/decreasing.
    pub trend_significance: f64,
    /// Upper bound on suspicious-value references listed in the quality report.
    pub max_suspicious_values: usize,
    /// Variables entering the correlation matrix, in matrix order.
    pub correlation_variables: Vec<Variable>,
}

/// One asset location and the weather series that drives it.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Opaque location/time-range label carried into reports unmodified.
    pub label: String,
    /// JSON file holding the site's `HourlySample` series.
    pub series_path: PathBuf,
    pub asset: AssetConfig,
}

// --- Default Implementations ---

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            anomaly_threshold_sigma: 3.0,
            include_correlation: true,
            include_trends: true,
            include_anomalies: true,
            trend_significance: 0.05,
            max_suspicious_values: 50,
            correlation_variables: vec![
                Variable::Temperature,
                Variable::RelativeHumidity,
                Variable::Pressure,
                Variable::WindSpeed,
                Variable::Irradiance,
                Variable::CloudCover,
                Variable::Precipitation,
            ],
        }
    }
}

/// Upper bound on `max_suspicious_values`.
pub const SUSPICIOUS_VALUES_LIMIT: usize = 50;
/// Loosest significance level a trend may be classified at.
pub const MAX_TREND_SIGNIFICANCE: f64 = 0.05;

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.anomaly_threshold_sigma.is_finite() && self.anomaly_threshold_sigma > 0.0) {
            return Err(ConfigError::ValidationError(
                "analysis.anomaly_threshold_sigma must be greater than zero".to_string(),
            ));
        }
        if !(self.trend_significance > 0.0 && self.trend_significance <= MAX_TREND_SIGNIFICANCE) {
            return Err(ConfigError::ValidationError(format!(
                "analysis.trend_significance must be within (0, {MAX_TREND_SIGNIFICANCE}]"
            )));
        }
        if self.max_suspicious_values > SUSPICIOUS_VALUES_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "analysis.max_suspicious_values must not exceed {SUSPICIOUS_VALUES_LIMIT}"
            )));
        }
        let mut seen = Vec::with_capacity(self.correlation_variables.len());
        for variable in &self.correlation_variables {
            if seen.contains(variable) {
                return Err(ConfigError::ValidationError(format!(
                    "analysis.correlation_variables lists '{variable}' twice"
                )));
            }
            seen.push(*variable);
        }
        Ok(())
    }
}

impl Config {
    /// Checks the analysis parameters and every site's asset definition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        for site in &self.sites {
            site.asset
                .validate()
                .map_err(|source| ConfigError::InvalidAsset {
                    site: site.label.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn site(&self, label: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.label == label)
    }
}
