//! # Atmos Forecaster
//!
//! Pairs a weather series with an asset definition and produces the asset's
//! hourly power output. The physics lives in `power-models`; this crate only
//! validates the request, selects the model and keeps the output aligned with
//! its input.

use chrono::{DateTime, Utc};
use core_types::{AssetConfig, HourlySample, PowerSample, PowerUnit};
use power_models::{PowerModel, create_model};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::ForecastError;

/// Hourly output of one asset, index-aligned with the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerForecast {
    /// `"solar"` or `"wind"`.
    pub asset_kind: String,
    pub unit: PowerUnit,
    pub rated_capacity: f64,
    /// One entry per input sample, in input order.
    pub samples: Vec<PowerSample>,
    /// Hours whose driver reading was missing; they are reported as zero output.
    pub driver_gaps: usize,
}

/// Aggregate figures over a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    /// Sum of hourly output, in kWh or MWh to match the forecast unit.
    pub total_energy: f64,
    pub peak_power: f64,
    pub peak_at: Option<DateTime<Utc>>,
    pub mean_capacity_percent: f64,
    /// Hours with non-zero output.
    pub productive_hours: usize,
    pub driver_gaps: usize,
}

impl PowerForecast {
    pub fn summary(&self) -> ForecastSummary {
        let total_energy = self.samples.iter().map(|s| s.power).sum();

        // First hour wins on ties so the result is stable.
        let peak = self
            .samples
            .iter()
            .fold(None::<&PowerSample>, |best, s| match best {
                Some(b) if b.power >= s.power => Some(b),
                _ => Some(s),
            });

        let mean_capacity_percent = if self.samples.is_empty() {
            0.0
        } else {
            self.samples.iter().map(|s| s.capacity_percent).sum::<f64>() / self.samples.len() as f64
        };

        ForecastSummary {
            total_energy,
            peak_power: peak.map_or(0.0, |p| p.power),
            peak_at: peak.map(|p| p.timestamp),
            mean_capacity_percent,
            productive_hours: self.samples.iter().filter(|s| s.power > 0.0).count(),
            driver_gaps: self.driver_gaps,
        }
    }
}

/// Drives a power model over weather series for a single asset.
pub struct Forecaster {
    asset: AssetConfig,
    model: Box<dyn PowerModel>,
}

impl Forecaster {
    /// Validates the asset and builds its model. Nothing is computed for an
    /// invalid asset.
    pub fn new(asset: AssetConfig) -> Result<Self, ForecastError> {
        let model = create_model(&asset)?;
        Ok(Self { asset, model })
    }

    pub fn asset(&self) -> &AssetConfig {
        &self.asset
    }

    /// Produces the power series for `series`.
    ///
    /// The output has exactly one sample per input sample, in the same order,
    /// so callers can zip driver variables with output. An empty series is
    /// rejected because there is nothing to forecast.
    pub fn run(&self, series: &[HourlySample]) -> Result<PowerForecast, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::InvalidInput(
                "weather series is empty, no forecast can be produced".to_string(),
            ));
        }

        let mut driver_gaps = 0;
        let samples: Vec<PowerSample> = series
            .iter()
            .map(|sample| {
                self.model.estimate(sample).unwrap_or_else(|| {
                    driver_gaps += 1;
                    PowerSample::idle(sample.timestamp)
                })
            })
            .collect();

        if driver_gaps > 0 {
            tracing::warn!(
                model = self.model.name(),
                gaps = driver_gaps,
                "driver readings missing, those hours are reported as zero output"
            );
        }
        tracing::info!(
            model = self.model.name(),
            samples = samples.len(),
            "forecast complete"
        );

        Ok(PowerForecast {
            asset_kind: self.asset.kind().to_string(),
            unit: self.model.unit(),
            rated_capacity: self.model.rated_capacity(),
            samples,
            driver_gaps,
        })
    }
}

/// One-shot convenience: validate, select the model and run it.
pub fn forecast(asset: &AssetConfig, series: &[HourlySample]) -> Result<PowerForecast, ForecastError> {
    Forecaster::new(asset.clone())?.run(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use core_types::{SolarConfig, Variable, WindConfig};

    fn at(hour: i64) -> HourlySample {
        HourlySample::new(Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap() + Duration::hours(hour))
    }

    #[test]
    fn empty_series_is_invalid_input() {
        let err = forecast(&AssetConfig::Solar(SolarConfig::new(5.0)), &[]).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn invalid_asset_is_rejected_first() {
        let err = forecast(&AssetConfig::Wind(WindConfig::new(2.0, -5.0)), &[]).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfiguration(_)));
    }

    #[test]
    fn missing_driver_hours_are_zero_and_counted() {
        let series = vec![
            at(0).with(Variable::WindSpeed, 8.0),
            at(1).with(Variable::Temperature, 12.0),
            at(2).with(Variable::WindSpeed, 30.0),
        ];
        let result = forecast(&AssetConfig::Wind(WindConfig::new(2.0, 80.0)), &series).unwrap();
        assert_eq!(result.samples.len(), 3);
        assert_eq!(result.driver_gaps, 1);
        assert_eq!(result.samples[1], PowerSample::idle(series[1].timestamp));
        assert_eq!(result.unit, PowerUnit::Megawatt);
        assert_eq!(result.asset_kind, "wind");
    }

    #[test]
    fn summary_reports_peak_and_energy() {
        let series = vec![
            at(10).with(Variable::Irradiance, 500.0),
            at(11).with(Variable::Irradiance, 1000.0),
            at(12).with(Variable::Irradiance, 1000.0),
            at(13).with(Variable::Irradiance, 0.0),
        ];
        let mut solar = SolarConfig::new(10.0);
        solar.system_losses_percent = 0.0;
        let result = forecast(&AssetConfig::Solar(solar), &series).unwrap();
        let summary = result.summary();
        assert_eq!(summary.total_energy, 25.0);
        assert_eq!(summary.peak_power, 10.0);
        assert_eq!(summary.peak_at, Some(series[1].timestamp));
        assert_eq!(summary.productive_hours, 3);
        assert_eq!(summary.mean_capacity_percent, 62.5);
    }
}
