use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Invalid asset configuration: {0}")]
    InvalidConfiguration(#[from] power_models::ModelError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
