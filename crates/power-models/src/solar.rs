use core_types::{HourlySample, PowerSample, PowerUnit, SolarConfig, Variable};

use crate::PowerModel;
use crate::error::ModelError;

/// Share of irradiance removed by a fully overcast sky.
const CLOUD_ATTENUATION: f64 = 0.8;
/// Irradiance at standard test conditions (W/m²).
const STC_IRRADIANCE: f64 = 1000.0;
/// NOCT model: cell rise of (45 − 20) °C at 800 W/m².
const NOCT_RISE_C: f64 = 45.0 - 20.0;
const NOCT_IRRADIANCE: f64 = 800.0;
const STC_CELL_TEMP_C: f64 = 25.0;
/// Power temperature coefficient of crystalline silicon (per °C).
const TEMP_COEFFICIENT: f64 = -0.004;

/// Photovoltaic plant model: plane irradiance to AC output.
#[derive(Debug, Clone)]
pub struct SolarModel {
    config: SolarConfig,
}

impl SolarModel {
    /// Creates a new `SolarModel`, rejecting an invalid plant definition.
    pub fn new(config: SolarConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolarConfig {
        &self.config
    }

    /// AC output in kW for one set of conditions.
    ///
    /// * `irradiance` - W/m²; zero or negative means no production.
    /// * `ambient_temp_c` - enables the cell-temperature derate when given.
    /// * `cloud_cover_percent` - attenuates irradiance when given.
    pub fn ac_power(
        &self,
        irradiance: f64,
        ambient_temp_c: Option<f64>,
        cloud_cover_percent: Option<f64>,
    ) -> f64 {
        let adjusted = match cloud_cover_percent {
            Some(cloud) => irradiance * (1.0 - CLOUD_ATTENUATION * cloud / 100.0),
            None => irradiance,
        };
        if adjusted <= 0.0 {
            return 0.0;
        }

        let derate = (100.0 - self.config.system_losses_percent) / 100.0;
        let mut power = (adjusted / STC_IRRADIANCE * self.config.dc_capacity_kw * derate).max(0.0);

        if let Some(ambient) = ambient_temp_c {
            let cell_temp = cell_temperature(ambient, adjusted);
            power *= 1.0 + TEMP_COEFFICIENT * (cell_temp - STC_CELL_TEMP_C);
        }

        power.max(0.0)
    }
}

/// Estimated cell temperature (°C) from the NOCT model.
pub fn cell_temperature(ambient_temp_c: f64, irradiance: f64) -> f64 {
    ambient_temp_c + NOCT_RISE_C * (irradiance / NOCT_IRRADIANCE)
}

impl PowerModel for SolarModel {
    fn estimate(&self, sample: &HourlySample) -> Option<PowerSample> {
        let irradiance = sample.get(Variable::Irradiance)?;
        let power = self.ac_power(
            irradiance,
            sample.get(Variable::Temperature),
            sample.get(Variable::CloudCover),
        );
        Some(PowerSample::new(sample.timestamp, power, self.config.dc_capacity_kw))
    }

    fn rated_capacity(&self) -> f64 {
        self.config.dc_capacity_kw
    }

    fn unit(&self) -> PowerUnit {
        PowerUnit::Kilowatt
    }

    fn name(&self) -> &'static str {
        "solar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    fn seven_kw() -> SolarModel {
        SolarModel::new(SolarConfig::new(7.0)).unwrap()
    }

    #[test]
    fn clear_sky_output_without_temperature() {
        let model = seven_kw();
        let power = model.ac_power(800.0, None, None);
        assert_abs_diff_eq!(power, 4.816, epsilon = 1e-9);

        let sample = HourlySample::new(Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap())
            .with(Variable::Irradiance, 800.0);
        let out = model.estimate(&sample).unwrap();
        assert_abs_diff_eq!(out.capacity_percent, 68.8, epsilon = 1e-9);
    }

    #[test]
    fn hot_cells_are_derated() {
        let model = seven_kw();
        assert_abs_diff_eq!(cell_temperature(25.0, 800.0), 50.0, epsilon = 1e-12);
        let power = model.ac_power(800.0, Some(25.0), None);
        assert_abs_diff_eq!(power, 4.3344, epsilon = 1e-9);
    }

    #[test]
    fn clouds_attenuate_irradiance() {
        let model = seven_kw();
        let overcast = model.ac_power(800.0, None, Some(100.0));
        // 800 · (1 − 0.8) = 160 W/m²
        assert_abs_diff_eq!(overcast, 0.16 * 7.0 * 0.86, epsilon = 1e-9);
    }

    #[test]
    fn no_light_means_no_power() {
        let model = seven_kw();
        assert_eq!(model.ac_power(0.0, Some(30.0), None), 0.0);
        assert_eq!(model.ac_power(-20.0, None, Some(10.0)), 0.0);
    }

    #[test]
    fn output_is_monotonic_in_irradiance_and_bounded() {
        let model = seven_kw();
        let mut previous = 0.0;
        for step in 0..=30 {
            let irradiance = step as f64 * 50.0;
            let power = model.ac_power(irradiance, None, Some(20.0));
            assert!(power >= previous);
            previous = power;

            let sample = HourlySample::new(Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap())
                .with(Variable::Irradiance, irradiance)
                .with(Variable::Temperature, -40.0);
            let out = model.estimate(&sample).unwrap();
            assert!((0.0..=100.0).contains(&out.capacity_percent));
        }
    }

    #[test]
    fn missing_irradiance_yields_no_estimate() {
        let sample = HourlySample::new(Utc.with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap())
            .with(Variable::Temperature, 20.0);
        assert!(seven_kw().estimate(&sample).is_none());
    }

    #[test]
    fn rejects_zero_capacity() {
        assert!(SolarModel::new(SolarConfig::new(0.0)).is_err());
    }
}
