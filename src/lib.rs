pub mod config;
pub mod context;
mod error;

pub use config::{ConfigError, EnvFile, EnvLoader, LoadOutcome, ProcessConfig};
pub use context::AppContext;
pub use error::Error;
