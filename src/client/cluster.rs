//! `kube`-backed implementation of [`DataVolumeClient`].

use kube::api::{Api, PostParams};
use kube::{Client, Config};
use thiserror::Error;

use super::{ClientError, ClientFuture, DataVolumeClient};
use crate::datavolume::DataVolume;

/// Errors raised while building the Kubernetes client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClientInitError {
    /// Neither a kubeconfig nor an in-cluster service account was usable.
    #[error("failed to load Kubernetes configuration: {0}")]
    Config(String),
    /// The client could not be constructed from the loaded configuration.
    #[error("failed to build Kubernetes client: {0}")]
    Client(String),
}

/// Talks to the CDI API through a pre-authenticated [`kube::Client`].
#[derive(Clone)]
pub struct KubeDataVolumeClient {
    client: Client,
}

impl KubeDataVolumeClient {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient configuration: `KUBECONFIG` or
    /// `~/.kube/config` when present, otherwise the in-cluster service
    /// account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientInitError`] when no configuration can be loaded or the
    /// client cannot be built from it.
    pub async fn infer() -> Result<Self, ClientInitError> {
        let config = Config::infer()
            .await
            .map_err(|err| ClientInitError::Config(err.to_string()))?;
        let client =
            Client::try_from(config).map_err(|err| ClientInitError::Client(err.to_string()))?;
        Ok(Self::new(client))
    }

    fn api(&self, namespace: &str) -> Api<DataVolume> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

impl std::fmt::Debug for KubeDataVolumeClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("KubeDataVolumeClient")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl DataVolumeClient for KubeDataVolumeClient {
    fn get<'a>(&'a self, namespace: &'a str, name: &'a str) -> ClientFuture<'a, DataVolume> {
        Box::pin(async move {
            self.api(namespace)
                .get(name)
                .await
                .map_err(ClientError::from)
        })
    }

    fn create<'a>(&'a self, data_volume: &'a DataVolume) -> ClientFuture<'a, DataVolume> {
        Box::pin(async move {
            self.api(data_volume.namespace())
                .create(&PostParams::default(), data_volume)
                .await
                .map_err(ClientError::from)
        })
    }
}

impl From<kube::Error> for ClientError {
    fn from(value: kube::Error) -> Self {
        match value {
            kube::Error::Api(response) => Self::Api {
                code: response.code,
                reason: response.reason,
                message: response.message,
            },
            other => Self::Transport(other.to_string()),
        }
    }
}
