//! Env-file loading and the configuration it produces.

mod builder;
mod error;
mod file;
mod process;

pub use builder::{EnvLoader, LoadOutcome, DEFAULT_FILENAME};
pub use error::ConfigError;
pub use file::EnvFile;
pub use process::ProcessConfig;
