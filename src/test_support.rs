//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use k8s_openapi::api::core::v1::{PersistentVolumeClaimSpec, VolumeResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use tokio::time::Instant;

use crate::client::{ClientError, ClientFuture, DataVolumeClient};
use crate::datavolume::{
    BlankSource, ConditionStatus, DATA_VOLUME_API_VERSION, DATA_VOLUME_KIND, DataVolume,
    DataVolumeCondition, DataVolumeConditionType, DataVolumePhase, DataVolumeSource,
    DataVolumeSpec, DataVolumeStatus, HttpSource, RegistrySource,
};
use crate::namespace::{NamespaceError, NamespaceSource};

/// Importer message reported by [`import_failed`].
pub const IMPORT_FAILURE_MESSAGE: &str = "Unable to connect to http data source";

/// Default claim size used by [`DataVolumeBuilder`].
pub const DEFAULT_TEST_SIZE: &str = "100M";

/// Builds `DataVolume` objects for tests.
#[derive(Clone, Debug)]
pub struct DataVolumeBuilder {
    data_volume: DataVolume,
}

impl DataVolumeBuilder {
    /// Starts a blank-image DataVolume with a 100M `ReadWriteOnce`
    /// filesystem claim.
    #[must_use]
    pub fn blank(name: &str) -> Self {
        Self::with_source(
            name,
            DataVolumeSource {
                blank: Some(BlankSource::default()),
                ..DataVolumeSource::default()
            },
        )
    }

    /// Starts a DataVolume importing from an HTTP(S) URL.
    #[must_use]
    pub fn url(name: &str, url: &str) -> Self {
        Self::with_source(
            name,
            DataVolumeSource {
                http: Some(HttpSource {
                    url: url.to_owned(),
                    ..HttpSource::default()
                }),
                ..DataVolumeSource::default()
            },
        )
    }

    /// Starts a DataVolume importing from a container registry.
    #[must_use]
    pub fn registry(name: &str, url: &str) -> Self {
        Self::with_source(
            name,
            DataVolumeSource {
                registry: Some(RegistrySource {
                    url: Some(url.to_owned()),
                    ..RegistrySource::default()
                }),
                ..DataVolumeSource::default()
            },
        )
    }

    fn with_source(name: &str, source: DataVolumeSource) -> Self {
        let mut data_volume = DataVolume {
            api_version: DATA_VOLUME_API_VERSION.to_owned(),
            kind: DATA_VOLUME_KIND.to_owned(),
            spec: DataVolumeSpec {
                source: Some(source),
                pvc: Some(claim_spec(DEFAULT_TEST_SIZE)),
                ..DataVolumeSpec::default()
            },
            ..DataVolume::default()
        };
        data_volume.metadata.name = Some(name.to_owned());
        Self { data_volume }
    }

    /// Sets `metadata.namespace`.
    #[must_use]
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.data_volume.metadata.namespace = Some(namespace.to_owned());
        self
    }

    /// Replaces the requested claim size.
    #[must_use]
    pub fn size(mut self, size: &str) -> Self {
        self.data_volume.spec.pvc = Some(claim_spec(size));
        self
    }

    /// Clears `kind` and `apiVersion`.
    #[must_use]
    pub fn without_type_meta(mut self) -> Self {
        self.data_volume.api_version.clear();
        self.data_volume.kind.clear();
        self
    }

    /// Sets the reported phase.
    #[must_use]
    pub fn phase(mut self, phase: DataVolumePhase) -> Self {
        self.status_mut().phase = phase;
        self
    }

    /// Appends a condition to the reported status.
    #[must_use]
    pub fn condition(
        mut self,
        condition_type: DataVolumeConditionType,
        status: ConditionStatus,
        reason: &str,
    ) -> Self {
        self.status_mut()
            .conditions
            .push(DataVolumeCondition::new(condition_type, status, reason));
        self
    }

    fn status_mut(&mut self) -> &mut DataVolumeStatus {
        self.data_volume
            .status
            .get_or_insert_with(DataVolumeStatus::default)
    }

    /// Returns the built object.
    #[must_use]
    pub fn build(self) -> DataVolume {
        self.data_volume
    }

    /// Renders the object as a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns the serialisation error when rendering fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.data_volume)
    }
}

fn claim_spec(size: &str) -> PersistentVolumeClaimSpec {
    PersistentVolumeClaimSpec {
        access_modes: Some(vec![String::from("ReadWriteOnce")]),
        resources: Some(VolumeResourceRequirements {
            requests: Some(BTreeMap::from([(
                String::from("storage"),
                Quantity(size.to_owned()),
            )])),
            ..VolumeResourceRequirements::default()
        }),
        volume_mode: Some(String::from("Filesystem")),
        ..PersistentVolumeClaimSpec::default()
    }
}

/// Status snapshot of a successful import.
#[must_use]
pub fn succeeded(data_volume: DataVolume) -> DataVolume {
    with_status(data_volume, DataVolumePhase::Succeeded, &[
        (DataVolumeConditionType::Bound, ConditionStatus::True, "Bound"),
        (DataVolumeConditionType::Running, ConditionStatus::False, "Completed"),
        (DataVolumeConditionType::Ready, ConditionStatus::True, ""),
    ])
}

/// Status snapshot of an import still pulling its source.
#[must_use]
pub fn importing(data_volume: DataVolume) -> DataVolume {
    with_status(data_volume, DataVolumePhase::ImportInProgress, &[
        (DataVolumeConditionType::Bound, ConditionStatus::True, "Bound"),
        (DataVolumeConditionType::Running, ConditionStatus::True, "Pulling"),
    ])
}

/// Status snapshot of an importer that exited with an error. The `Running`
/// condition carries [`IMPORT_FAILURE_MESSAGE`].
#[must_use]
pub fn import_failed(data_volume: DataVolume) -> DataVolume {
    let mut failed = with_status(data_volume, DataVolumePhase::ImportInProgress, &[
        (DataVolumeConditionType::Bound, ConditionStatus::True, "Bound"),
        (DataVolumeConditionType::Running, ConditionStatus::False, "Error"),
    ]);
    if let Some(status) = failed.status.as_mut() {
        for condition in &mut status.conditions {
            if condition.condition_type == DataVolumeConditionType::Running {
                IMPORT_FAILURE_MESSAGE.clone_into(&mut condition.message);
            }
        }
    }
    failed
}

/// Status snapshot with phase `Failed` and no conditions.
#[must_use]
pub fn phase_failed(data_volume: DataVolume) -> DataVolume {
    with_status(data_volume, DataVolumePhase::Failed, &[])
}

fn with_status(
    mut data_volume: DataVolume,
    phase: DataVolumePhase,
    conditions: &[(DataVolumeConditionType, ConditionStatus, &str)],
) -> DataVolume {
    data_volume.status = Some(DataVolumeStatus {
        phase,
        conditions: conditions
            .iter()
            .map(|(condition_type, status, reason)| {
                DataVolumeCondition::new(condition_type.clone(), status.clone(), *reason)
            })
            .collect(),
        ..DataVolumeStatus::default()
    });
    data_volume
}

/// Builds an API error with the given status code.
#[must_use]
pub fn api_error(code: u16, reason: &str) -> ClientError {
    ClientError::Api {
        code,
        reason: reason.to_owned(),
        message: format!("simulated {reason}"),
    }
}

/// Records a single `get` made through [`ScriptedClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GetCall {
    /// Namespace passed to `get`.
    pub namespace: String,
    /// Name passed to `get`.
    pub name: String,
    /// Instant the call was made, on the tokio clock.
    pub at: Instant,
}

#[derive(Debug, Default)]
struct ScriptState {
    create_response: Option<Result<DataVolume, ClientError>>,
    get_responses: VecDeque<Result<DataVolume, ClientError>>,
    created: Vec<DataVolume>,
    gets: Vec<GetCall>,
}

/// Scripted client that replays pre-seeded responses.
///
/// `create` echoes the submitted object unless a response was queued with
/// [`ScriptedClient::fail_create`]. `get` pops responses in FIFO order and
/// keeps repeating the last one, so a single queued snapshot stands for a
/// resource that never changes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedClient {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedClient {
    /// Creates a client with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next `create` fail with `error`.
    pub fn fail_create(&self, error: ClientError) {
        self.state().create_response = Some(Err(error));
    }

    /// Queues a successful `get` response.
    pub fn push_get(&self, data_volume: DataVolume) {
        self.state().get_responses.push_back(Ok(data_volume));
    }

    /// Queues a failing `get` response.
    pub fn push_get_error(&self, error: ClientError) {
        self.state().get_responses.push_back(Err(error));
    }

    /// Objects submitted to `create`, in call order.
    #[must_use]
    pub fn created(&self) -> Vec<DataVolume> {
        self.state().created.clone()
    }

    /// Number of `create` calls.
    #[must_use]
    pub fn create_count(&self) -> usize {
        self.state().created.len()
    }

    /// All recorded `get` calls.
    #[must_use]
    pub fn gets(&self) -> Vec<GetCall> {
        self.state().gets.clone()
    }

    /// Number of `get` calls.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.state().gets.len()
    }
}

impl DataVolumeClient for ScriptedClient {
    fn get<'a>(&'a self, namespace: &'a str, name: &'a str) -> ClientFuture<'a, DataVolume> {
        let result = {
            let mut state = self.state();
            state.gets.push(GetCall {
                namespace: namespace.to_owned(),
                name: name.to_owned(),
                at: Instant::now(),
            });
            if state.get_responses.len() > 1 {
                state.get_responses.pop_front()
            } else {
                state.get_responses.front().cloned()
            }
        };
        let response = result.unwrap_or_else(|| Err(api_error(404, "NotFound")));
        Box::pin(async move { response })
    }

    fn create<'a>(&'a self, data_volume: &'a DataVolume) -> ClientFuture<'a, DataVolume> {
        let response = {
            let mut state = self.state();
            state.created.push(data_volume.clone());
            state
                .create_response
                .take()
                .unwrap_or_else(|| Ok(data_volume.clone()))
        };
        Box::pin(async move { response })
    }
}

/// Namespace source returning a fixed value and counting queries.
#[derive(Clone, Debug, Default)]
pub struct FixedNamespace {
    namespace: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl FixedNamespace {
    /// Source reporting `namespace` as active.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_owned()),
            calls: Arc::default(),
        }
    }

    /// Source with no active namespace.
    #[must_use]
    pub fn undetected() -> Self {
        Self::default()
    }

    /// Number of times the active namespace was requested.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NamespaceSource for FixedNamespace {
    fn active_namespace(&self) -> Result<String, NamespaceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.namespace.clone().ok_or(NamespaceError::Undetected)
    }
}
