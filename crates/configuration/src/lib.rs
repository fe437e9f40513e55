use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalysisParams, Config, SiteConfig};

/// Loads the application configuration from a TOML file.
///
/// Values can be overridden through `ATMOS_`-prefixed environment variables,
/// e.g. `ATMOS_ANALYSIS__ANOMALY_THRESHOLD_SIGMA=2.5`. The result is validated
/// before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("ATMOS")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), sites = config.sites.len(), "configuration loaded");
    Ok(config)
}
