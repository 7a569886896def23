//! CDI `DataVolume` model, manifest decoding, and status evaluation.

mod conditions;
mod manifest;
mod types;

pub use conditions::{
    ConditionIndex, IMPORT_ERROR_REASON, ImportState, evaluate, has_import_failed,
    is_import_succeeded,
};
pub use manifest::{DecodeError, decode};
pub use types::{
    BlankSource, ConditionStatus, DATA_VOLUME_API_VERSION, DATA_VOLUME_GROUP, DATA_VOLUME_KIND,
    DATA_VOLUME_VERSION, DataVolume, DataVolumeCondition, DataVolumeConditionType,
    DataVolumePhase, DataVolumeSource, DataVolumeSpec, DataVolumeStatus, HttpSource, PvcSource,
    RegistrySource, S3Source, StorageSpec,
};
