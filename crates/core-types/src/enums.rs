use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// An atmospheric quantity that can appear on an `HourlySample`.
///
/// The declaration order is the canonical order used for every report, so the
/// engine's output never depends on hash iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Air temperature at 2 m (°C).
    Temperature,
    /// Relative humidity (%).
    RelativeHumidity,
    /// Surface pressure (hPa).
    Pressure,
    /// Wind speed at the measurement height (m/s).
    WindSpeed,
    /// Wind direction (degrees, 0 = North).
    WindDirection,
    /// Global horizontal irradiance (W/m²).
    Irradiance,
    /// Total cloud cover (%).
    CloudCover,
    /// Hourly precipitation (mm).
    Precipitation,
    /// Dew point (°C).
    DewPoint,
}

impl Variable {
    pub const ALL: [Variable; 9] = [
        Variable::Temperature,
        Variable::RelativeHumidity,
        Variable::Pressure,
        Variable::WindSpeed,
        Variable::WindDirection,
        Variable::Irradiance,
        Variable::CloudCover,
        Variable::Precipitation,
        Variable::DewPoint,
    ];

    /// The snake_case name used in serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::RelativeHumidity => "relative_humidity",
            Variable::Pressure => "pressure",
            Variable::WindSpeed => "wind_speed",
            Variable::WindDirection => "wind_direction",
            Variable::Irradiance => "irradiance",
            Variable::CloudCover => "cloud_cover",
            Variable::Precipitation => "precipitation",
            Variable::DewPoint => "dew_point",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Temperature | Variable::DewPoint => "°C",
            Variable::RelativeHumidity | Variable::CloudCover => "%",
            Variable::Pressure => "hPa",
            Variable::WindSpeed => "m/s",
            Variable::WindDirection => "°",
            Variable::Irradiance => "W/m²",
            Variable::Precipitation => "mm",
        }
    }

    /// The physically plausible `(min, max)` range for a reading, inclusive.
    /// Readings outside it are treated as sensor faults by the quality report.
    pub fn physical_range(&self) -> (f64, f64) {
        match self {
            Variable::Temperature => (-60.0, 60.0),
            Variable::RelativeHumidity => (0.0, 100.0),
            Variable::Pressure => (800.0, 1100.0),
            Variable::WindSpeed => (0.0, 100.0),
            Variable::WindDirection => (0.0, 360.0),
            Variable::Irradiance => (0.0, 1500.0),
            Variable::CloudCover => (0.0, 100.0),
            Variable::Precipitation => (0.0, 500.0),
            Variable::DewPoint => (-80.0, 40.0),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown variable '{s}'")))
    }
}

/// Unit of the `power` field on a `PowerSample`. Each asset reports in its
/// native unit: solar plants in kW, wind turbines in MW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUnit {
    Kilowatt,
    Megawatt,
}

impl PowerUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PowerUnit::Kilowatt => "kW",
            PowerUnit::Megawatt => "MW",
        }
    }

    /// The matching energy unit for one hour at this power.
    pub fn energy_symbol(&self) -> &'static str {
        match self {
            PowerUnit::Kilowatt => "kWh",
            PowerUnit::Megawatt => "MWh",
        }
    }
}
