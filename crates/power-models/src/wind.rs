use core_types::{HourlySample, PowerSample, PowerUnit, Variable, WindConfig};

use crate::PowerModel;
use crate::error::ModelError;

/// ISA sea-level temperature (K).
const STANDARD_TEMP_K: f64 = 288.15;
const KELVIN_OFFSET: f64 = 273.15;
/// Atmospheric scale height used for the altitude density term (m).
const SCALE_HEIGHT_M: f64 = 8500.0;

/// Single-turbine model: measured wind speed to electrical output.
///
/// The measurement is first extrapolated to hub height with the power-law
/// profile, then mapped through a four-region power curve and finally scaled
/// by the air-density ratio.
#[derive(Debug, Clone)]
pub struct WindModel {
    config: WindConfig,
}

impl WindModel {
    /// Creates a new `WindModel`, rejecting an invalid turbine definition.
    pub fn new(config: WindConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    /// Wind speed at hub height: `v_ref · (hub / ref)^α`.
    pub fn hub_speed(&self, reference_speed: f64) -> f64 {
        let ratio = self.config.hub_height_m / self.config.reference_height_m;
        reference_speed * ratio.powf(self.config.shear_exponent)
    }

    /// Output in MW at a given hub-height speed, before density correction.
    pub fn curve_power(&self, hub_speed: f64) -> f64 {
        let WindConfig {
            rated_capacity_mw,
            cut_in_speed,
            rated_speed,
            cut_out_speed,
            ..
        } = self.config;

        if hub_speed < cut_in_speed || hub_speed > cut_out_speed {
            // Below cut-in the rotor idles; above cut-out it is feathered.
            return 0.0;
        }
        if hub_speed >= rated_speed {
            return rated_capacity_mw;
        }

        let fraction = (hub_speed.powi(3) - cut_in_speed.powi(3))
            / (rated_speed.powi(3) - cut_in_speed.powi(3));
        (rated_capacity_mw * fraction).clamp(0.0, rated_capacity_mw)
    }

    /// Air-density ratio relative to the standard atmosphere. The temperature
    /// and altitude terms apply independently; with neither known it is 1.0.
    pub fn density_ratio(&self, ambient_temp_c: Option<f64>) -> f64 {
        let mut ratio = 1.0;
        if let Some(ambient) = ambient_temp_c.filter(|t| *t + KELVIN_OFFSET > 0.0) {
            ratio = STANDARD_TEMP_K / (ambient + KELVIN_OFFSET);
        }
        if let Some(altitude) = self.config.site_altitude_m {
            ratio *= (-altitude / SCALE_HEIGHT_M).exp();
        }
        ratio
    }

    /// Output in MW for a wind speed measured at the reference height.
    pub fn power(&self, reference_speed: f64, ambient_temp_c: Option<f64>) -> f64 {
        let hub_speed = self.hub_speed(reference_speed);
        let power = self.curve_power(hub_speed) * self.density_ratio(ambient_temp_c);
        power.max(0.0)
    }
}

impl PowerModel for WindModel {
    fn estimate(&self, sample: &HourlySample) -> Option<PowerSample> {
        let speed = sample.get(Variable::WindSpeed)?;
        let power = self.power(speed, sample.get(Variable::Temperature));
        Some(PowerSample::new(sample.timestamp, power, self.config.rated_capacity_mw))
    }

    fn rated_capacity(&self) -> f64 {
        self.config.rated_capacity_mw
    }

    fn unit(&self) -> PowerUnit {
        PowerUnit::Megawatt
    }

    fn name(&self) -> &'static str {
        "wind"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    fn turbine() -> WindModel {
        WindModel::new(WindConfig::new(1.5, 100.0)).unwrap()
    }

    #[test]
    fn ten_metre_speed_is_extrapolated_to_hub() {
        let model = turbine();
        let hub = model.hub_speed(10.0);
        assert_abs_diff_eq!(hub, 13.80, epsilon = 0.01);
        assert_eq!(model.power(10.0, None), 1.5);
    }

    #[test]
    fn outside_operating_window_produces_nothing() {
        let model = turbine();
        assert_eq!(model.curve_power(2.9), 0.0);
        assert_eq!(model.curve_power(25.1), 0.0);
        assert_eq!(model.curve_power(-1.0), 0.0);
    }

    #[test]
    fn rated_region_is_flat() {
        let model = turbine();
        for speed in [12.0, 15.0, 20.0, 25.0] {
            assert_eq!(model.curve_power(speed), 1.5);
        }
    }

    #[test]
    fn partial_load_follows_cubic_and_is_monotonic() {
        let model = turbine();
        assert_eq!(model.curve_power(3.0), 0.0);
        let expected = 1.5 * (8.0f64.powi(3) - 27.0) / (1728.0 - 27.0);
        assert_abs_diff_eq!(model.curve_power(8.0), expected, epsilon = 1e-12);

        let mut previous = 0.0;
        let mut speed = 3.0;
        while speed < 12.0 {
            let power = model.curve_power(speed);
            assert!((0.0..=1.5).contains(&power));
            assert!(power >= previous);
            previous = power;
            speed += 0.25;
        }
    }

    #[test]
    fn cold_dense_air_raises_output_but_percent_is_clamped() {
        let model = turbine();
        let sample = HourlySample::new(Utc.with_ymd_and_hms(2024, 1, 10, 3, 0, 0).unwrap())
            .with(Variable::WindSpeed, 10.0)
            .with(Variable::Temperature, -10.0);
        let out = model.estimate(&sample).unwrap();
        assert_abs_diff_eq!(out.power, 1.5 * 288.15 / 263.15, epsilon = 1e-9);
        assert_eq!(out.capacity_percent, 100.0);
    }

    #[test]
    fn altitude_thins_the_air() {
        let mut config = WindConfig::new(2.0, 80.0);
        config.site_altitude_m = Some(1700.0);
        let model = WindModel::new(config).unwrap();
        assert_abs_diff_eq!(model.density_ratio(Some(15.0)), (-0.2f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(model.density_ratio(None), (-0.2f64).exp(), epsilon = 1e-12);
        assert_eq!(turbine().density_ratio(None), 1.0);
    }

    #[test]
    fn rejects_non_positive_heights() {
        assert!(WindModel::new(WindConfig::new(1.5, 0.0)).is_err());
        let mut config = WindConfig::new(1.5, 80.0);
        config.reference_height_m = -10.0;
        assert!(WindModel::new(config).is_err());
    }
}
