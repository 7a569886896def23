//! Target namespace resolution.
//!
//! The namespace comes from the first non-empty source in strict order: the
//! caller's explicit value, the manifest's own `metadata.namespace`, and the
//! active namespace of the environment. The environment is only consulted
//! when both earlier sources are empty.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use thiserror::Error;
use tracing::debug;

/// Namespace file mounted into pods with a service account.
pub const SERVICE_ACCOUNT_NAMESPACE_FILE: &str =
    "/var/run/secrets/kubernetes.io/serviceaccount/namespace";

/// Errors raised while resolving the target namespace.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum NamespaceError {
    /// No explicit or manifest namespace was given and the environment does
    /// not expose one.
    #[error("could not detect active namespace")]
    Undetected,
}

/// Supplies the active namespace of the environment on demand.
pub trait NamespaceSource {
    /// Returns the active namespace.
    ///
    /// # Errors
    ///
    /// Returns [`NamespaceError::Undetected`] when none is available.
    fn active_namespace(&self) -> Result<String, NamespaceError>;
}

impl<T: NamespaceSource + ?Sized> NamespaceSource for &T {
    fn active_namespace(&self) -> Result<String, NamespaceError> {
        (**self).active_namespace()
    }
}

/// Reads the active namespace from the service-account namespace file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceAccountNamespace {
    path: Utf8PathBuf,
}

impl ServiceAccountNamespace {
    /// Reads the namespace from `path` instead of the default location.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the namespace file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read(&self) -> std::io::Result<String> {
        let parent = self.path.parent().unwrap_or_else(|| Utf8Path::new("."));
        let file_name = self.path.file_name().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "namespace file path is missing a filename",
            )
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        dir.read_to_string(file_name)
    }
}

impl Default for ServiceAccountNamespace {
    fn default() -> Self {
        Self::new(SERVICE_ACCOUNT_NAMESPACE_FILE)
    }
}

impl NamespaceSource for ServiceAccountNamespace {
    fn active_namespace(&self) -> Result<String, NamespaceError> {
        let contents = self.read().map_err(|err| {
            debug!(path = %self.path, error = %err, "namespace file unreadable");
            NamespaceError::Undetected
        })?;
        let namespace = contents.trim();
        if namespace.is_empty() {
            return Err(NamespaceError::Undetected);
        }
        Ok(namespace.to_owned())
    }
}

/// Which source supplied the resolved namespace.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NamespaceOrigin {
    /// The caller passed it explicitly.
    Explicit,
    /// The manifest carried it.
    Manifest,
    /// The environment's active namespace.
    Active,
}

/// Namespace chosen for the resource, with its origin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedNamespace {
    /// Namespace the resource is created in.
    pub namespace: String,
    /// Where it came from.
    pub origin: NamespaceOrigin,
}

/// Picks the target namespace.
///
/// `explicit` is trimmed before use; `source` is queried only when neither
/// `explicit` nor `manifest` is non-empty.
///
/// # Errors
///
/// Returns [`NamespaceError`] when the environment has to be consulted and
/// cannot supply a namespace.
pub fn resolve_namespace<S>(
    explicit: Option<&str>,
    manifest: &str,
    source: &S,
) -> Result<ResolvedNamespace, NamespaceError>
where
    S: NamespaceSource + ?Sized,
{
    if let Some(namespace) = explicit.map(str::trim).filter(|value| !value.is_empty()) {
        return Ok(ResolvedNamespace {
            namespace: namespace.to_owned(),
            origin: NamespaceOrigin::Explicit,
        });
    }
    if !manifest.is_empty() {
        return Ok(ResolvedNamespace {
            namespace: manifest.to_owned(),
            origin: NamespaceOrigin::Manifest,
        });
    }
    source
        .active_namespace()
        .map(|namespace| ResolvedNamespace {
            namespace,
            origin: NamespaceOrigin::Active,
        })
}
