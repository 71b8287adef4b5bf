pub mod app_config;
pub mod config;
pub mod products;
pub mod signatures;

pub use app_config::{AppConfig, DEFAULT_DESKTOP_USER_AGENT, DEFAULT_MOBILE_USER_AGENT};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{Extensions, Platform, ProductRecord, UnknownPlatform};
pub use signatures::{load_block_signatures, BlockSignatures};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read block signatures file {path}: {source}")]
    SignaturesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse block signatures file: {0}")]
    SignaturesFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
