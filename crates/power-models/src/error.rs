use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model received an invalid configuration: {0}")]
    InvalidConfiguration(#[from] core_types::CoreError),
}
