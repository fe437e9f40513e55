//! # Atmos Power Models
//!
//! This crate turns weather into electricity. It defines a universal
//! `PowerModel` trait and provides the solar and wind implementations.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   files, configuration loading or presentation. It depends only on `core-types`.
//! - **Model Agnostic Assembly:** By using the `PowerModel` trait, the
//!   `forecaster` can drive any asset without knowing its physics.
//! - **Exhaustive Selection:** `create_model` matches on the `AssetConfig` sum
//!   type, so each asset variant always gets exactly one model.

// Declare all the modules that constitute this crate.
pub mod error;
pub mod factory;
pub mod solar;
pub mod wind;

// Re-export the key components to create a clean, public-facing API.
pub use error::ModelError;
pub use factory::create_model;
pub use solar::SolarModel;
pub use wind::WindModel;

use core_types::{HourlySample, PowerSample, PowerUnit};

/// The core trait that all generation models implement.
///
/// Models are immutable once built, so `estimate` takes `&self` and the
/// `Send + Sync` bounds let one model serve several threads at once.
pub trait PowerModel: Send + Sync {
    /// Estimates the output for one hour of weather.
    ///
    /// # Returns
    ///
    /// * `Some(PowerSample)` - when the sample carries the model's driver variable.
    /// * `None` - when the driver reading is missing for that hour.
    fn estimate(&self, sample: &HourlySample) -> Option<PowerSample>;

    /// Capacity that `capacity_percent` is measured against, in `unit()`.
    fn rated_capacity(&self) -> f64;

    fn unit(&self) -> PowerUnit;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}
