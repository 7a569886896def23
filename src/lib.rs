//! Core library for the `create-datavolume-from-manifest` pipeline task.
//!
//! The crate decodes a CDI `DataVolume` manifest, creates the resource
//! through an abstract client, and optionally polls its status until the
//! import succeeds, fails, or the wait deadline passes (decode → resolve
//! namespace → create → wait).

pub mod client;
pub mod config;
pub mod creator;
pub mod datavolume;
pub mod exit;
pub mod logging;
pub mod namespace;
pub mod options;
pub mod output;
pub mod results;
#[cfg(test)]
pub mod test_helpers;
pub mod test_support;

pub use client::{
    ClientError, ClientFuture, ClientInitError, DataVolumeClient, KubeDataVolumeClient,
};
pub use config::{ConfigError, CreatorConfig};
pub use creator::{CreateError, CreateRequest, DataVolumeCreator, FailedSnapshot, WaitError};
pub use datavolume::{
    ConditionIndex, DataVolume, DataVolumeCondition, DataVolumeConditionType, DataVolumePhase,
    DataVolumeSpec, DataVolumeStatus, DecodeError, ImportState,
};
pub use exit::{ExitCode, Severity};
pub use namespace::{
    NamespaceError, NamespaceOrigin, NamespaceSource, ResolvedNamespace, ServiceAccountNamespace,
    resolve_namespace,
};
pub use options::{CliOptions, OptionsError};
pub use output::{InvalidOutputType, OutputError, OutputType};
pub use results::{ResultsError, ResultsWriter};
