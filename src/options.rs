//! Normalisation and validation of command-line options.

use thiserror::Error;
use tracing::Level;

use crate::output::{InvalidOutputType, OutputType};

/// Errors raised by [`CliOptions::validate`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum OptionsError {
    /// No manifest text was supplied.
    #[error("dv-manifest param has to be specified")]
    MissingManifest,
    /// `--output` names an unknown format.
    #[error(transparent)]
    InvalidOutput(#[from] InvalidOutputType),
}

/// Raw option values as received from flags or environment variables.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CliOptions {
    /// Manifest text of the DataVolume to create.
    pub dv_manifest: String,
    /// Explicit target namespace; empty means unset.
    pub dv_namespace: String,
    /// Wait flag; only the literal `true` enables waiting.
    pub wait_for_success: String,
    /// Output format name.
    pub output: String,
    /// Enables debug logging.
    pub debug: bool,
}

impl CliOptions {
    /// Trims surrounding whitespace from the manifest, namespace, and wait
    /// flag.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self {
            dv_manifest: self.dv_manifest.trim().to_owned(),
            dv_namespace: self.dv_namespace.trim().to_owned(),
            wait_for_success: self.wait_for_success.trim().to_owned(),
            ..self
        }
    }

    /// Checks that a manifest was given and the output format is known.
    ///
    /// # Errors
    ///
    /// Returns [`OptionsError`] describing the first invalid option.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.dv_manifest.trim().is_empty() {
            return Err(OptionsError::MissingManifest);
        }
        self.output_type()?;
        Ok(())
    }

    /// Manifest text.
    #[must_use]
    pub fn manifest(&self) -> &str {
        &self.dv_manifest
    }

    /// Explicit namespace, if one was given.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        let namespace = self.dv_namespace.trim();
        (!namespace.is_empty()).then_some(namespace)
    }

    /// Returns whether the caller asked to wait for the import.
    #[must_use]
    pub fn wait_for_success(&self) -> bool {
        self.wait_for_success.trim() == "true"
    }

    /// Parsed output format.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOutputType`] for unknown format names.
    pub fn output_type(&self) -> Result<OutputType, InvalidOutputType> {
        self.output.parse()
    }

    /// Log level: `DEBUG` with `--debug`, otherwise `INFO`.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        if self.debug { Level::DEBUG } else { Level::INFO }
    }
}
