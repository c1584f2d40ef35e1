//! Error types for tessera-node.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error(transparent)]
    Config(#[from] tessera_factory::ConfigError),

    #[error(transparent)]
    Bonding(#[from] tessera_bonding::Error),

    #[error(transparent)]
    Factory(#[from] tessera_factory::Error),
}
