//! Pretty printing of the final DataVolume.

use std::io::Write;
use std::str::FromStr;

use thiserror::Error;

use crate::datavolume::DataVolume;

/// Output format selected with `--output`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OutputType {
    /// Print nothing.
    #[default]
    None,
    /// Print YAML.
    Yaml,
    /// Print indented JSON.
    Json,
}

/// Raised when `--output` names an unknown format.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{0} is not a valid output type")]
pub struct InvalidOutputType(pub String);

impl FromStr for OutputType {
    type Err = InvalidOutputType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" => Ok(Self::None),
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(InvalidOutputType(other.to_owned())),
        }
    }
}

/// Errors raised while printing.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Serialisation failed.
    #[error("failed to render DV: {0}")]
    Render(String),
    /// Writing to the sink failed.
    #[error("failed to write DV: {0}")]
    Io(#[from] std::io::Error),
}

impl OutputType {
    /// Renders `data_volume` in this format. Returns `None` for
    /// [`OutputType::None`].
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Render`] when serialisation fails.
    pub fn render(self, data_volume: &DataVolume) -> Result<Option<String>, OutputError> {
        match self {
            Self::None => Ok(None),
            Self::Yaml => serde_yaml::to_string(data_volume)
                .map(Some)
                .map_err(|err| OutputError::Render(err.to_string())),
            Self::Json => serde_json::to_string_pretty(data_volume)
                .map(Some)
                .map_err(|err| OutputError::Render(err.to_string())),
        }
    }

    /// Writes the rendered resource to `out`, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] when rendering or writing fails.
    pub fn print(self, data_volume: &DataVolume, out: &mut impl Write) -> Result<(), OutputError> {
        let Some(rendered) = self.render(data_volume)? else {
            return Ok(());
        };
        writeln!(out, "{}", rendered.trim_end())?;
        Ok(())
    }
}
