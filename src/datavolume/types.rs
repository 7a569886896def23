//! Typed model of the CDI `DataVolume` custom resource.
//!
//! Only the fields the creator reads are modelled explicitly. Every struct
//! that mirrors an open-ended API object keeps the keys it does not know
//! about in a flattened `extra` map so a manifest survives a decode/encode
//! round trip unchanged.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::core::v1::{PersistentVolumeClaimSpec, VolumeResourceRequirements};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// API group served by the Containerized Data Importer.
pub const DATA_VOLUME_GROUP: &str = "cdi.kubevirt.io";
/// API version of the `DataVolume` resource.
pub const DATA_VOLUME_VERSION: &str = "v1beta1";
/// Fully qualified `apiVersion` value.
pub const DATA_VOLUME_API_VERSION: &str = "cdi.kubevirt.io/v1beta1";
/// Kind of the resource.
pub const DATA_VOLUME_KIND: &str = "DataVolume";
const DATA_VOLUME_PLURAL: &str = "datavolumes";

type Extra = BTreeMap<String, Value>;

/// A `DataVolume` as submitted to, and reported by, the API server.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolume {
    /// Group/version identifier; empty when the manifest omitted it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Kind identifier; empty when the manifest omitted it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Standard object metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ObjectMeta,
    /// Desired state.
    #[serde(default, deserialize_with = "null_as_default")]
    pub spec: DataVolumeSpec,
    /// Observed state, owned by the remote system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DataVolumeStatus>,
    /// Top-level keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Reads an explicit `null` as the type's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl DataVolume {
    /// Returns the object name, or an empty string when unset.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Returns the object namespace, or an empty string when unset.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    /// Returns the reported phase, if the resource has a status.
    #[must_use]
    pub fn phase(&self) -> Option<&DataVolumePhase> {
        self.status.as_ref().map(|status| &status.phase)
    }

    /// Returns the reported conditions in list order.
    #[must_use]
    pub fn conditions(&self) -> &[DataVolumeCondition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl Resource for DataVolume {
    type DynamicType = ();
    type Scope = NamespaceResourceScope;

    fn kind(_: &Self::DynamicType) -> Cow<'_, str> {
        Cow::Borrowed(DATA_VOLUME_KIND)
    }

    fn group(_: &Self::DynamicType) -> Cow<'_, str> {
        Cow::Borrowed(DATA_VOLUME_GROUP)
    }

    fn version(_: &Self::DynamicType) -> Cow<'_, str> {
        Cow::Borrowed(DATA_VOLUME_VERSION)
    }

    fn plural(_: &Self::DynamicType) -> Cow<'_, str> {
        Cow::Borrowed(DATA_VOLUME_PLURAL)
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

/// Desired state of a `DataVolume`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeSpec {
    /// Where the data is imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DataVolumeSource>,
    /// Claim template used when the manifest pins the full PVC spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvc: Option<PersistentVolumeClaimSpec>,
    /// Storage request that lets CDI fill in storage-profile defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageSpec>,
    /// `kubevirt` or `archive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Whether the target volume should be preallocated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preallocation: Option<bool>,
    /// Priority class for the importer pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_class_name: Option<String>,
    /// Spec keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Storage request for a `DataVolume` using storage-profile defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    /// Requested access modes, e.g. `ReadWriteOnce`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_modes: Option<Vec<String>>,
    /// Requested size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<VolumeResourceRequirements>,
    /// Storage class to provision from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,
    /// `Filesystem` or `Block`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mode: Option<String>,
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Import source. Exactly one member is expected to be set.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeSource {
    /// Empty disk image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank: Option<BlankSource>,
    /// Image downloaded over HTTP(S).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpSource>,
    /// Container disk pulled from a registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistrySource>,
    /// Clone of an existing claim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvc: Option<PvcSource>,
    /// Object fetched from an S3 bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Source>,
    /// Other source kinds (`upload`, `gcs`, `imageio`, `vddk`, `snapshot`).
    #[serde(flatten)]
    pub extra: Extra,
}

/// Blank image source; carries no settings of its own.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct BlankSource {
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// HTTP(S) import source.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpSource {
    /// Image URL.
    #[serde(default)]
    pub url: String,
    /// Secret holding `accessKeyId`/`secretKey` for basic auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<String>,
    /// Config map with a custom CA bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_config_map: Option<String>,
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Container registry import source.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySource {
    /// `docker://` or `oci-archive://` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Image stream reference, as an alternative to `url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_stream: Option<String>,
    /// `pod` or `node`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_method: Option<String>,
    /// Pull secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<String>,
    /// Config map with a custom CA bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_config_map: Option<String>,
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Source claim for a clone.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PvcSource {
    /// Namespace of the source claim.
    #[serde(default)]
    pub namespace: String,
    /// Name of the source claim.
    #[serde(default)]
    pub name: String,
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// S3 import source.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3Source {
    /// Object URL.
    #[serde(default)]
    pub url: String,
    /// Secret with the bucket credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<String>,
    /// Config map with a custom CA bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_config_map: Option<String>,
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Observed state of a `DataVolume`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeStatus {
    /// Coarse lifecycle stage.
    #[serde(default)]
    pub phase: DataVolumePhase,
    /// Fine-grained signals, at most one per type in practice.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<DataVolumeCondition>,
    /// Import progress such as `45.10%`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
    /// Number of importer pod restarts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_count: Option<i32>,
    /// Name of the claim backing the volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_name: Option<String>,
    /// Keys this model does not know about.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Lifecycle phase reported in `status.phase`.
///
/// Phases introduced by newer CDI releases are kept verbatim in
/// [`DataVolumePhase::Other`] instead of failing deserialisation.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum DataVolumePhase {
    /// No phase reported yet.
    #[default]
    Unset,
    /// Waiting for the claim to be created.
    Pending,
    /// The claim is bound.
    PvcBound,
    /// The importer pod is scheduled.
    ImportScheduled,
    /// The importer pod is running.
    ImportInProgress,
    /// The clone is scheduled.
    CloneScheduled,
    /// The clone is running.
    CloneInProgress,
    /// The upload server is scheduled.
    UploadScheduled,
    /// The upload server accepts data.
    UploadReady,
    /// The claim waits for a consumer pod before binding.
    WaitForFirstConsumer,
    /// Population waits for the claim to bind.
    PendingPopulation,
    /// A multi-stage import is paused between checkpoints.
    Paused,
    /// The data is in place.
    Succeeded,
    /// The operation failed.
    Failed,
    /// CDI cannot determine the phase.
    Unknown,
    /// Any phase this model does not know about.
    Other(String),
}

impl DataVolumePhase {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unset => "",
            Self::Pending => "Pending",
            Self::PvcBound => "PVCBound",
            Self::ImportScheduled => "ImportScheduled",
            Self::ImportInProgress => "ImportInProgress",
            Self::CloneScheduled => "CloneScheduled",
            Self::CloneInProgress => "CloneInProgress",
            Self::UploadScheduled => "UploadScheduled",
            Self::UploadReady => "UploadReady",
            Self::WaitForFirstConsumer => "WaitForFirstConsumer",
            Self::PendingPopulation => "PendingPopulation",
            Self::Paused => "Paused",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for DataVolumePhase {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" => Self::Unset,
            "Pending" => Self::Pending,
            "PVCBound" => Self::PvcBound,
            "ImportScheduled" => Self::ImportScheduled,
            "ImportInProgress" => Self::ImportInProgress,
            "CloneScheduled" => Self::CloneScheduled,
            "CloneInProgress" => Self::CloneInProgress,
            "UploadScheduled" => Self::UploadScheduled,
            "UploadReady" => Self::UploadReady,
            "WaitForFirstConsumer" => Self::WaitForFirstConsumer,
            "PendingPopulation" => Self::PendingPopulation,
            "Paused" => Self::Paused,
            "Succeeded" => Self::Succeeded,
            "Failed" => Self::Failed,
            "Unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<DataVolumePhase> for String {
    fn from(value: DataVolumePhase) -> Self {
        match value {
            DataVolumePhase::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DataVolumePhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Condition type reported in `status.conditions[].type`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", into = "String")]
pub enum DataVolumeConditionType {
    /// The volume is ready for use.
    Ready,
    /// The backing claim is bound; the binding condition.
    Bound,
    /// The importer, cloner, or upload pod is running.
    Running,
    /// Any condition type this model does not know about.
    Other(String),
}

impl DataVolumeConditionType {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ready => "Ready",
            Self::Bound => "Bound",
            Self::Running => "Running",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for DataVolumeConditionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ready" => Self::Ready,
            "Bound" => Self::Bound,
            "Running" => Self::Running,
            _ => Self::Other(value),
        }
    }
}

impl From<DataVolumeConditionType> for String {
    fn from(value: DataVolumeConditionType) -> Self {
        match value {
            DataVolumeConditionType::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DataVolumeConditionType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Tri-state condition value.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ConditionStatus {
    /// The condition holds.
    True,
    /// The condition does not hold.
    False,
    /// The remote system cannot tell.
    #[default]
    Unknown,
    /// A value outside the Kubernetes convention, kept verbatim.
    Other(String),
}

impl ConditionStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for ConditionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "True" => Self::True,
            "False" => Self::False,
            "Unknown" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<ConditionStatus> for String {
    fn from(value: ConditionStatus) -> Self {
        match value {
            ConditionStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A single entry of `status.conditions`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataVolumeCondition {
    /// Signal name.
    #[serde(rename = "type")]
    pub condition_type: DataVolumeConditionType,
    /// Signal value.
    #[serde(default)]
    pub status: ConditionStatus,
    /// Machine-readable cause, e.g. `Error` or `Pulling`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// RFC 3339 time of the last status change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    /// RFC 3339 time the condition was last refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_time: Option<String>,
}

impl DataVolumeCondition {
    /// Builds a condition with the given type, status, and reason.
    #[must_use]
    pub fn new(
        condition_type: DataVolumeConditionType,
        status: ConditionStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            condition_type,
            status,
            reason: reason.into(),
            message: String::new(),
            last_transition_time: None,
            last_heartbeat_time: None,
        }
    }
}
