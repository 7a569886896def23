//! Resource client abstraction used by the creator.
//!
//! The creator only needs two calls against the remote API: create a
//! `DataVolume` and fetch one by namespace and name. Keeping them behind a
//! trait lets tests drive the creator with scripted responses.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::datavolume::DataVolume;
use crate::exit::Severity;

mod cluster;

pub use self::cluster::{ClientInitError, KubeDataVolumeClient};

/// HTTP status codes the API server uses for rejections that are reported
/// as soft failures: not found, conflict, and unprocessable entity.
pub const SOFT_STATUS_CODES: [u16; 3] = [404, 409, 422];

/// Errors raised by resource clients.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClientError {
    /// The API server answered with an error status.
    #[error("{message} (reason {reason}, status {code})")]
    Api {
        /// HTTP status code.
        code: u16,
        /// Machine-readable reason such as `AlreadyExists`.
        reason: String,
        /// Human-readable message from the API server.
        message: String,
    },
    /// The request never produced an API status (connection, TLS, decoding).
    #[error("{0}")]
    Transport(String),
}

impl ClientError {
    /// Returns the HTTP status code for API errors.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::Transport(_) => None,
        }
    }

    /// Returns whether the API rejected the request as not found,
    /// conflicting, or unprocessable.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        self.status_code()
            .is_some_and(|code| SOFT_STATUS_CODES.contains(&code))
    }

    /// Maps [`ClientError::is_soft`] onto a reporting severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        if self.is_soft() {
            Severity::Soft
        } else {
            Severity::Fatal
        }
    }
}

/// Future returned by client operations.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClientError>> + Send + 'a>>;

/// Minimal interface to the `DataVolume` API.
pub trait DataVolumeClient {
    /// Fetches the current state of a `DataVolume`.
    fn get<'a>(&'a self, namespace: &'a str, name: &'a str) -> ClientFuture<'a, DataVolume>;

    /// Creates a `DataVolume` in the namespace recorded in its metadata and
    /// returns the object as stored by the API server.
    fn create<'a>(&'a self, data_volume: &'a DataVolume) -> ClientFuture<'a, DataVolume>;
}
