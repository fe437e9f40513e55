use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::enums::Variable;

/// One hour of atmospheric observations.
///
/// Every field is optional: stations drop readings all the time, and a series
/// is never assumed to be complete. Non-finite readings are treated the same
/// as absent ones by every accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "readings")]
    pub fields: BTreeMap<Variable, f64>,
}

/// A raw reading as delivered; anything other than a number is a gap.
#[derive(Deserialize)]
#[serde(untagged)]
enum Reading {
    Number(f64),
    Gap(IgnoredAny),
}

/// Keeps numeric readings of known variables. Nulls, strings and unknown
/// variable names are dropped so they count as missing instead of failing the
/// whole series.
fn readings<'de, D>(deserializer: D) -> Result<BTreeMap<Variable, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Reading>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(name, reading)| match reading {
            Reading::Number(value) => name.parse::<Variable>().ok().map(|v| (v, value)),
            Reading::Gap(_) => None,
        })
        .collect())
}

impl HourlySample {
    /// Creates a sample with no readings.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach a reading.
    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        self.fields.insert(variable, value);
        self
    }

    /// Returns the reading for `variable` if it is present and finite.
    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.fields
            .get(&variable)
            .copied()
            .filter(|value| value.is_finite())
    }

    pub fn has(&self, variable: Variable) -> bool {
        self.get(variable).is_some()
    }
}

/// The modelled output of an asset for one hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerSample {
    pub timestamp: DateTime<Utc>,
    /// Output in the asset's native unit, never negative.
    pub power: f64,
    /// Output as a share of rated capacity, clamped to [0, 100].
    pub capacity_percent: f64,
}

impl PowerSample {
    /// Builds a sample, enforcing the non-negative power and clamped
    /// capacity-percent invariants.
    pub fn new(timestamp: DateTime<Utc>, power: f64, rated_capacity: f64) -> Self {
        let power = if power.is_finite() { power.max(0.0) } else { 0.0 };
        let capacity_percent = if rated_capacity > 0.0 {
            (power / rated_capacity * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            timestamp,
            power,
            capacity_percent,
        }
    }

    /// A zero-output hour.
    pub fn idle(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            power: 0.0,
            capacity_percent: 0.0,
        }
    }
}
