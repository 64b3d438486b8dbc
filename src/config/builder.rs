use std::path::{Path, PathBuf};

use super::{ConfigError, EnvFile, ProcessConfig};

/// File name looked up when none is configured.
pub const DEFAULT_FILENAME: &str = ".env";

/// What a call to [`EnvLoader::load_into`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No usable file was found; the configuration is unchanged.
    Missing,
    /// The file was parsed and its entries applied.
    Loaded { applied: usize, skipped: usize },
}

/// Startup loader for an optional env-definition file.
///
/// By default it reads `.env` from the process working directory. A missing
/// file is not an error, malformed entries are skipped, and a file that
/// exists but can't be read is logged and treated as missing.
///
/// ## Example
///
/// ```no_run
/// use envseed::EnvLoader;
///
/// let config = EnvLoader::new().load()?;
/// let endpoint = config.get_or("BROKER_URL", "localhost:9092");
/// # Ok::<(), envseed::ConfigError>(())
/// ```
///
/// Every setting can be changed before loading:
///
/// ```no_run
/// # use envseed::EnvLoader;
/// let config = EnvLoader::new()
///     .directory("deploy")
///     .filename("listener.env")
///     .required(true)
///     .strict(true)
///     .load()?;
/// # Ok::<(), envseed::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "loaders do nothing until .load() is called"]
pub struct EnvLoader {
    directory: Option<PathBuf>,
    filename: String,
    required: bool,
    strict: bool,
    export: bool,
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self {
            directory: None,
            filename: DEFAULT_FILENAME.to_string(),
            required: false,
            strict: false,
            export: false,
        }
    }
}

impl EnvLoader {
    /// Creates a loader for `.env` in the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory to look in instead of the working directory.
    pub fn directory(mut self, dir: impl AsRef<Path>) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// File name to look for inside the directory.
    pub fn filename(mut self, name: impl Into<String>) -> Self {
        self.filename = name.into();
        self
    }

    /// If `true`, a missing or unreadable file fails the load.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// If `true`, the first malformed entry fails the load instead of being skipped.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// If `true`, the loaded configuration is also published into the
    /// process environment.
    ///
    /// This mutates process-global state and must happen before any other
    /// thread is spawned.
    pub fn export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    /// Path of the file this loader reads.
    ///
    /// Relative to the working directory unless a directory was set.
    pub fn path(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.join(&self.filename),
            None => PathBuf::from(&self.filename),
        }
    }

    /// Locates and parses the file without applying it anywhere.
    ///
    /// Returns `Ok(None)` when there is no usable file.
    pub fn read(&self) -> Result<Option<EnvFile>, ConfigError> {
        let path = self.path();
        match EnvFile::read(&path, self.required, self.strict) {
            Err(ConfigError::ReadError { source, .. }) if !self.required => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "env file unreadable, continuing without it"
                );
                Ok(None)
            }
            other => other,
        }
    }

    /// Loads the file into a fresh [`ProcessConfig`].
    pub fn load(self) -> Result<ProcessConfig, ConfigError> {
        let mut config = ProcessConfig::new();
        self.load_into(&mut config)?;
        Ok(config)
    }

    /// Applies the file on top of `config`, overwriting existing keys.
    ///
    /// `config` is left untouched when the file is missing or the load fails.
    pub fn load_into(&self, config: &mut ProcessConfig) -> Result<LoadOutcome, ConfigError> {
        let Some(file) = self.read()? else {
            tracing::debug!(path = %self.path().display(), "no env file found");
            return Ok(LoadOutcome::Missing);
        };

        let applied = config.apply(&file);
        let skipped = file.skipped();
        tracing::debug!(
            path = %self.path().display(),
            applied,
            skipped,
            "loaded env file"
        );

        if self.export {
            config.export_to_process_env();
        }

        Ok(LoadOutcome::Loaded { applied, skipped })
    }
}
