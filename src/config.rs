//! Configuration loading via `ortho-config`.

use std::ffi::OsString;
use std::time::Duration;

use camino::Utf8Path;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::namespace::SERVICE_ACCOUNT_NAMESPACE_FILE;

/// Default delay between two status polls, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
/// Default wait deadline, in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;
/// Directory Tekton collects task results from.
pub const DEFAULT_RESULTS_DIR: &str = "/tekton/results";

/// Creator tunables layered from defaults, configuration files, and
/// `CREATE_DV_*` environment variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "CREATE_DV")]
pub struct CreatorConfig {
    /// Delay between two status polls while waiting for the import.
    #[ortho_config(default = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
    /// Upper bound on the whole wait, measured from the first poll.
    #[ortho_config(default = DEFAULT_WAIT_TIMEOUT_SECS)]
    pub wait_timeout_secs: u64,
    /// Directory receiving the `name` and `namespace` result files.
    #[ortho_config(default = DEFAULT_RESULTS_DIR.to_owned())]
    pub results_dir: String,
    /// File holding the active namespace when neither the caller nor the
    /// manifest names one.
    #[ortho_config(default = SERVICE_ACCOUNT_NAMESPACE_FILE.to_owned())]
    pub namespace_file: String,
}

impl CreatorConfig {
    /// Built-in values used when no file or environment override applies.
    #[must_use]
    pub fn builtin_defaults() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            results_dir: DEFAULT_RESULTS_DIR.to_owned(),
            namespace_file: SERVICE_ACCOUNT_NAMESPACE_FILE.to_owned(),
        }
    }

    /// Loads configuration without parsing CLI arguments; the binary owns
    /// its own flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("create-datavolume-from-manifest")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Rejects zero durations, a poll interval longer than the wait, and
    /// empty paths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidField("poll_interval_ms"));
        }
        if self.wait_timeout_secs == 0 {
            return Err(ConfigError::InvalidField("wait_timeout_secs"));
        }
        if self.poll_interval() > self.wait_timeout() {
            return Err(ConfigError::InvalidField("poll_interval_ms"));
        }
        if self.results_dir.trim().is_empty() {
            return Err(ConfigError::InvalidField("results_dir"));
        }
        if self.namespace_file.trim().is_empty() {
            return Err(ConfigError::InvalidField("namespace_file"));
        }
        Ok(())
    }

    /// Poll interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Wait deadline as a [`Duration`].
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Results directory as a UTF-8 path.
    #[must_use]
    pub fn results_dir(&self) -> &Utf8Path {
        Utf8Path::new(self.results_dir.trim())
    }

    /// Namespace file as a UTF-8 path.
    #[must_use]
    pub fn namespace_file(&self) -> &Utf8Path {
        Utf8Path::new(self.namespace_file.trim())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// A field holds a value the creator cannot use.
    #[error("invalid configuration field: {0}")]
    InvalidField(&'static str),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
