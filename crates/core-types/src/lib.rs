//! # Atmos Core Types
//!
//! The shared vocabulary of the workspace: weather samples, asset definitions and
//! power output. As a Layer 0 crate it has no knowledge of the models or the
//! statistics engine that consume these types.

pub mod asset;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use asset::{AssetConfig, SolarConfig, WindConfig};
pub use enums::{PowerUnit, Variable};
pub use error::CoreError;
pub use structs::{HourlySample, PowerSample};
