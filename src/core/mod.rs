pub mod config;
pub mod error;
pub mod types;

pub use config::{ClientConfig, ConfigError, ReplayConfig};
pub use error::{Result, TacticsError};
