use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid reverse pointer: {0}")]
    InvalidReversePointer(String),

    #[error("Invalid network configuration: {0}")]
    InvalidNetworkConfiguration(String),

    #[error("Record store failure: {0}")]
    StoreFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
