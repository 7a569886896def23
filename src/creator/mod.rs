//! DataVolume creation and import tracking.
//!
//! [`DataVolumeCreator`] runs the workflow in strict order: decode the
//! manifest, resolve the target namespace, create the resource, and, when
//! asked, poll its status until the import reaches a terminal state or the
//! deadline passes. Nothing is retried or rolled back; the only repeated
//! call is the status poll.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::client::DataVolumeClient;
use crate::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_SECS};
use crate::datavolume::{DataVolume, ImportState, decode, evaluate};
use crate::namespace::{NamespaceSource, resolve_namespace};

mod error;

pub use error::{CreateError, FailedSnapshot, WaitError};

const POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
const WAIT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS);

/// Inputs for a single create run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateRequest {
    /// YAML or JSON manifest text.
    pub manifest: String,
    /// Explicit namespace overriding the manifest's.
    pub namespace: Option<String>,
    /// Whether to wait for the import to succeed.
    pub wait_for_success: bool,
}

impl CreateRequest {
    /// Creates a request that does not wait and keeps the manifest's
    /// namespace.
    #[must_use]
    pub fn new(manifest: impl Into<String>) -> Self {
        Self {
            manifest: manifest.into(),
            ..Self::default()
        }
    }

    /// Targets `namespace` instead of the manifest's namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Enables or disables waiting for the import.
    #[must_use]
    pub const fn wait_for_success(mut self, wait: bool) -> Self {
        self.wait_for_success = wait;
        self
    }
}

enum WaitState {
    Fetch,
    Observed(DataVolume),
    Backoff,
    Finished(Result<DataVolume, WaitError>),
}

/// Creates DataVolumes through a [`DataVolumeClient`].
#[derive(Debug)]
pub struct DataVolumeCreator<C, N> {
    client: C,
    namespaces: N,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl<C, N> DataVolumeCreator<C, N>
where
    C: DataVolumeClient,
    N: NamespaceSource,
{
    /// Creates a creator polling every second for up to ten minutes.
    #[must_use]
    pub const fn new(client: C, namespaces: N) -> Self {
        Self {
            client,
            namespaces,
            poll_interval: POLL_INTERVAL,
            wait_timeout: WAIT_TIMEOUT,
        }
    }

    /// Overrides the delay between two status polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the wait deadline.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Creates the DataVolume described by `request`.
    ///
    /// Without waiting, the object returned by the create call is the
    /// result. With waiting, the result is the last fetched snapshot, which
    /// reports a successful import.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError`] tagged with the failing stage.
    pub async fn create(&self, request: &CreateRequest) -> Result<DataVolume, CreateError> {
        let mut data_volume = decode(&request.manifest).map_err(CreateError::Decode)?;

        let resolved = resolve_namespace(
            request.namespace.as_deref(),
            data_volume.namespace(),
            &self.namespaces,
        )
        .map_err(CreateError::Namespace)?;
        debug!(
            namespace = %resolved.namespace,
            origin = ?resolved.origin,
            "resolved namespace"
        );
        data_volume.metadata.namespace = Some(resolved.namespace.clone());

        debug!(
            name = data_volume.name(),
            namespace = %resolved.namespace,
            "creating DV"
        );
        let created = self
            .client
            .create(&data_volume)
            .await
            .map_err(CreateError::Create)?;

        if !request.wait_for_success {
            return Ok(created);
        }

        let namespace = match created.namespace() {
            "" => resolved.namespace.as_str(),
            reported => reported,
        };
        debug!(
            name = created.name(),
            namespace,
            "waiting for success of DV"
        );
        self.wait_for_success(namespace, created.name())
            .await
            .map_err(CreateError::Wait)
    }

    async fn wait_for_success(&self, namespace: &str, name: &str) -> Result<DataVolume, WaitError> {
        let deadline = Instant::now() + self.wait_timeout;
        let mut state = WaitState::Fetch;

        loop {
            state = match state {
                WaitState::Fetch => match self.client.get(namespace, name).await {
                    Ok(current) => WaitState::Observed(current),
                    Err(err) => WaitState::Finished(Err(WaitError::Fetch(err))),
                },
                WaitState::Observed(current) => match evaluate(&current) {
                    ImportState::Succeeded => WaitState::Finished(Ok(current)),
                    ImportState::ImportFailed => WaitState::Finished(Err(
                        WaitError::ImportFailed(FailedSnapshot::of(&current)),
                    )),
                    ImportState::PhaseFailed => WaitState::Finished(Err(
                        WaitError::PhaseFailed(FailedSnapshot::of(&current)),
                    )),
                    ImportState::InProgress => {
                        debug!(
                            phase = %current.phase().cloned().unwrap_or_default(),
                            progress = current
                                .status
                                .as_ref()
                                .and_then(|status| status.progress.as_deref())
                                .unwrap_or_default(),
                            "DV import in progress"
                        );
                        WaitState::Backoff
                    }
                },
                WaitState::Backoff => {
                    // Never sleep past the deadline.
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    sleep(self.poll_interval.min(remaining)).await;
                    if Instant::now() >= deadline {
                        WaitState::Finished(Err(WaitError::Timeout(self.wait_timeout)))
                    } else {
                        WaitState::Fetch
                    }
                }
                WaitState::Finished(result) => return result,
            };
        }
    }
}

#[cfg(test)]
mod tests;
