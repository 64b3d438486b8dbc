//! The configuration object handed to application components.

use std::collections::BTreeMap;

use super::EnvFile;

/// Key/value configuration populated once at startup and read afterwards.
///
/// Owned by the startup sequence (usually through an
/// [`AppContext`](crate::AppContext)) and passed by reference, instead of being
/// overlaid onto global process state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessConfig {
    values: BTreeMap<String, String>,
}

impl ProcessConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` if it is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Looks `key` up here first, then in the process environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::to_owned)
            .or_else(|| std::env::var(key).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Sets `key`, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Applies every entry of `file` in order, overwriting existing keys.
    ///
    /// Returns the number of entries applied.
    pub fn apply(&mut self, file: &EnvFile) -> usize {
        for (key, value) in file.iter() {
            self.set(key, value);
        }
        file.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates entries sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Publishes every entry into the process environment.
    ///
    /// Mutates process-global state: call it during startup, before any other
    /// thread is spawned.
    pub fn export_to_process_env(&self) {
        for (key, value) in &self.values {
            std::env::set_var(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProcessConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        config.extend(iter);
        config
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for ProcessConfig {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
