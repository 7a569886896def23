//! Tekton task result recording.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;

use crate::datavolume::DataVolume;

/// Result file holding the created DataVolume's name.
pub const NAME_RESULT: &str = "name";
/// Result file holding the created DataVolume's namespace.
pub const NAMESPACE_RESULT: &str = "namespace";

/// Errors raised while writing result files.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ResultsError {
    /// Filesystem access failed.
    #[error("failed to write result {path}: {message}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying error message.
        message: String,
    },
}

/// Writes one file per result into a results directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultsWriter {
    dir: Utf8PathBuf,
}

impl ResultsWriter {
    /// Creates a writer targeting `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the results are written to.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Records the name and namespace of `data_volume`.
    ///
    /// # Errors
    ///
    /// Returns [`ResultsError::Io`] when the directory cannot be created or
    /// a file cannot be written.
    pub fn record(&self, data_volume: &DataVolume) -> Result<(), ResultsError> {
        Dir::create_ambient_dir_all(&self.dir, ambient_authority()).map_err(|err| {
            ResultsError::Io {
                path: self.dir.clone(),
                message: err.to_string(),
            }
        })?;
        let dir =
            Dir::open_ambient_dir(&self.dir, ambient_authority()).map_err(|err| ResultsError::Io {
                path: self.dir.clone(),
                message: err.to_string(),
            })?;

        for (file_name, value) in [
            (NAME_RESULT, data_volume.name()),
            (NAMESPACE_RESULT, data_volume.namespace()),
        ] {
            dir.write(file_name, value).map_err(|err| ResultsError::Io {
                path: self.dir.join(file_name),
                message: err.to_string(),
            })?;
        }
        Ok(())
    }
}
