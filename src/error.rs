use crate::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the startup sequence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to load env file: {0}")]
    Config(#[from] ConfigError),

    #[error("no configuration was supplied to the application context")]
    MissingConfig,
}
