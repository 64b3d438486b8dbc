use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading an env file.
///
/// Messages never include line content, since values are often credentials.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required env file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read env file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed entry #{entry} in env file '{path}'")]
    ParseError { path: PathBuf, entry: usize },

    #[error("line {line} of env file '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf, line: usize },
}
