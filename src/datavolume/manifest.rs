//! Manifest decoding.

use thiserror::Error;

use super::types::DataVolume;

/// Errors raised while decoding a `DataVolume` manifest.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    /// The text is not a YAML or JSON document of the expected shape.
    #[error("{0}")]
    Parse(String),
    /// The document lacks `kind` or `apiVersion`.
    #[error("kind or apiVersion missing")]
    MissingTypeMeta,
}

/// Decodes a YAML or JSON manifest into a [`DataVolume`].
///
/// JSON is accepted because it is a subset of YAML. The namespace may be
/// empty; resolving it is left to the caller.
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] when the text cannot be parsed and
/// [`DecodeError::MissingTypeMeta`] when `kind` or `apiVersion` is missing.
pub fn decode(manifest: &str) -> Result<DataVolume, DecodeError> {
    let data_volume: DataVolume =
        serde_yaml::from_str(manifest).map_err(|err| DecodeError::Parse(err.to_string()))?;

    if data_volume.kind.trim().is_empty() || data_volume.api_version.trim().is_empty() {
        return Err(DecodeError::MissingTypeMeta);
    }

    Ok(data_volume)
}
