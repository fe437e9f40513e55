use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid configuration for {0}: {1}")]
    InvalidConfiguration(String, String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
