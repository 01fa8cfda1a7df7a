use thiserror::Error;

use crate::core::config::ConfigError;
use crate::turn::wire::ProtocolError;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
