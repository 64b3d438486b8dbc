//! Startup context that owns the loaded configuration.

use crate::config::{EnvLoader, ProcessConfig};
use crate::Error;

/// Owns the [`ProcessConfig`] for the lifetime of the application.
///
/// Built once during startup, after which components receive the context (or
/// [`config()`](Self::config)) by reference instead of reading global state.
///
/// ## Example
///
/// ```no_run
/// use envseed::{AppContext, EnvLoader};
///
/// let ctx = AppContext::builder()
///     .with_loader(EnvLoader::new())?
///     .build()?;
///
/// let topic = ctx.config().get_or("LISTENER_TOPIC", "events");
/// # Ok::<(), envseed::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext {
    config: ProcessConfig,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder { config: None }
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Consumes the context, returning the configuration.
    pub fn into_config(self) -> ProcessConfig {
        self.config
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    config: Option<ProcessConfig>,
}

impl AppContextBuilder {
    /// Uses an already-populated configuration.
    pub fn with_config(mut self, config: ProcessConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Runs `loader` now and uses the configuration it produces.
    ///
    /// If a configuration was already attached, the file is applied on top
    /// of it.
    pub fn with_loader(mut self, loader: EnvLoader) -> Result<Self, Error> {
        let mut config = self.config.take().unwrap_or_default();
        loader.load_into(&mut config)?;
        self.config = Some(config);
        Ok(self)
    }

    /// Builds the `AppContext`.
    ///
    /// Returns an error if no configuration was provided.
    pub fn build(self) -> Result<AppContext, Error> {
        Ok(AppContext {
            config: self.config.ok_or(Error::MissingConfig)?,
        })
    }
}
