use serde::{Deserialize, Serialize};

use crate::enums::PowerUnit;
use crate::error::CoreError;

fn default_system_losses_percent() -> f64 {
    14.0
}
fn default_cut_in_speed() -> f64 {
    3.0
}
fn default_rated_speed() -> f64 {
    12.0
}
fn default_cut_out_speed() -> f64 {
    25.0
}
fn default_reference_height_m() -> f64 {
    10.0
}
fn default_shear_exponent() -> f64 {
    0.14
}

/// The generating asset a forecast is produced for.
///
/// A plant is either solar or wind, never both, so the parameters of one
/// variant cannot leak into the other. In TOML/JSON the variant is selected by
/// a `type = "solar" | "wind"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetConfig {
    Solar(SolarConfig),
    Wind(WindConfig),
}

/// Parameters of a photovoltaic plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarConfig {
    /// Peak DC capacity of the array (kW).
    pub dc_capacity_kw: f64,
    /// Combined wiring, inverter and soiling losses (%).
    #[serde(default = "default_system_losses_percent")]
    pub system_losses_percent: f64,
    /// Panel tilt from horizontal (degrees). Carried for reporting only.
    #[serde(default)]
    pub tilt_deg: Option<f64>,
    /// Panel azimuth (degrees, 180 = south). Carried for reporting only.
    #[serde(default)]
    pub azimuth_deg: Option<f64>,
}

/// Parameters of a single wind turbine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    /// Nameplate capacity (MW).
    pub rated_capacity_mw: f64,
    /// Rotor hub height above ground (m).
    pub hub_height_m: f64,
    #[serde(default = "default_cut_in_speed")]
    pub cut_in_speed: f64,
    #[serde(default = "default_rated_speed")]
    pub rated_speed: f64,
    #[serde(default = "default_cut_out_speed")]
    pub cut_out_speed: f64,
    /// Height at which the input wind speed was measured (m).
    #[serde(default = "default_reference_height_m")]
    pub reference_height_m: f64,
    /// Power-law wind shear exponent (alpha).
    #[serde(default = "default_shear_exponent")]
    pub shear_exponent: f64,
    /// Site elevation above sea level (m), used for the air-density correction.
    #[serde(default)]
    pub site_altitude_m: Option<f64>,
}

impl SolarConfig {
    pub fn new(dc_capacity_kw: f64) -> Self {
        Self {
            dc_capacity_kw,
            system_losses_percent: default_system_losses_percent(),
            tilt_deg: None,
            azimuth_deg: None,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.dc_capacity_kw.is_finite() && self.dc_capacity_kw > 0.0) {
            return Err(invalid("dc_capacity_kw", "must be greater than zero"));
        }
        if !(0.0..=100.0).contains(&self.system_losses_percent) {
            return Err(invalid(
                "system_losses_percent",
                "must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

impl WindConfig {
    pub fn new(rated_capacity_mw: f64, hub_height_m: f64) -> Self {
        Self {
            rated_capacity_mw,
            hub_height_m,
            cut_in_speed: default_cut_in_speed(),
            rated_speed: default_rated_speed(),
            cut_out_speed: default_cut_out_speed(),
            reference_height_m: default_reference_height_m(),
            shear_exponent: default_shear_exponent(),
            site_altitude_m: None,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.rated_capacity_mw.is_finite() && self.rated_capacity_mw > 0.0) {
            return Err(invalid("rated_capacity_mw", "must be greater than zero"));
        }
        if !(self.hub_height_m.is_finite() && self.hub_height_m > 0.0) {
            return Err(invalid("hub_height_m", "must be greater than zero"));
        }
        if !(self.reference_height_m.is_finite() && self.reference_height_m > 0.0) {
            return Err(invalid("reference_height_m", "must be greater than zero"));
        }
        if !self.shear_exponent.is_finite() {
            return Err(invalid("shear_exponent", "must be a finite number"));
        }
        // The partial-load region divides by rated³ − cut_in³.
        if !(self.cut_in_speed >= 0.0
            && self.cut_in_speed < self.rated_speed
            && self.rated_speed <= self.cut_out_speed)
        {
            return Err(invalid(
                "power_curve",
                "thresholds must satisfy 0 <= cut_in < rated <= cut_out",
            ));
        }
        Ok(())
    }
}

impl AssetConfig {
    /// Rejects parameters no model can run with. Called before any computation.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            AssetConfig::Solar(solar) => solar.validate(),
            AssetConfig::Wind(wind) => wind.validate(),
        }
    }

    /// Capacity that `capacity_percent` is measured against, in `power_unit()`.
    pub fn rated_capacity(&self) -> f64 {
        match self {
            AssetConfig::Solar(solar) => solar.dc_capacity_kw,
            AssetConfig::Wind(wind) => wind.rated_capacity_mw,
        }
    }

    pub fn power_unit(&self) -> PowerUnit {
        match self {
            AssetConfig::Solar(_) => PowerUnit::Kilowatt,
            AssetConfig::Wind(_) => PowerUnit::Megawatt,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AssetConfig::Solar(_) => "solar",
            AssetConfig::Wind(_) => "wind",
        }
    }
}

fn invalid(field: &str, reason: &str) -> CoreError {
    CoreError::InvalidConfiguration(field.to_string(), reason.to_string())
}
