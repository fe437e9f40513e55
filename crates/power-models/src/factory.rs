use core_types::AssetConfig;

use crate::PowerModel;
use crate::error::ModelError;
use crate::solar::SolarModel;
use crate::wind::WindModel;

/// Creates the physical model matching an asset definition.
///
/// The match is exhaustive: adding an `AssetConfig` variant without a model
/// is a compile error rather than a runtime fallthrough.
pub fn create_model(asset: &AssetConfig) -> Result<Box<dyn PowerModel>, ModelError> {
    let model: Box<dyn PowerModel> = match asset {
        AssetConfig::Solar(config) => Box::new(SolarModel::new(config.clone())?),
        AssetConfig::Wind(config) => Box::new(WindModel::new(config.clone())?),
    };
    tracing::debug!(model = model.name(), rated = model.rated_capacity(), "power model selected");
    Ok(model)
}
