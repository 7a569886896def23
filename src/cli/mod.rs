//! Command-line interface definitions for the `create-datavolume-from-manifest`
//! binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `create-datavolume-from-manifest` binary.
#[derive(Debug, Parser)]
#[command(
    name = "create-datavolume-from-manifest",
    about = "Create a CDI DataVolume from a manifest and optionally wait for its import",
    version
)]
pub(crate) struct Cli {
    /// YAML manifest of a DataVolume resource to be created.
    #[arg(long = "dv-manifest", env = "DV_MANIFEST", value_name = "MANIFEST")]
    pub(crate) dv_manifest: Option<String>,
    /// Namespace where to create the DataVolume.
    ///
    /// Defaults to the namespace in the manifest, then to the active
    /// namespace of the pod.
    #[arg(long = "dv-namespace", env = "DV_NAMESPACE", value_name = "NAMESPACE")]
    pub(crate) dv_namespace: Option<String>,
    /// Set to "true" to wait until the DataVolume import succeeds.
    #[arg(long = "wait-for-success", env = "WAIT_FOR_SUCCESS", value_name = "BOOL")]
    pub(crate) wait_for_success: Option<String>,
    /// Output format. One of: yaml|json.
    #[arg(short = 'o', long = "output", value_name = "FORMAT")]
    pub(crate) output: Option<String>,
    /// Sets DEBUG log level.
    #[arg(long)]
    pub(crate) debug: bool,
}
