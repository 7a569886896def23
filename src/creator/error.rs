//! Error types for the create workflow.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::client::ClientError;
use crate::datavolume::{
    ConditionIndex, DataVolume, DataVolumeConditionType, DataVolumePhase, DecodeError,
};
use crate::exit::Severity;
use crate::namespace::NamespaceError;

/// State of the snapshot that ended a wait with a failure.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FailedSnapshot {
    /// Reported phase.
    pub phase: DataVolumePhase,
    /// Reason on the `Running` condition, empty when absent.
    pub reason: String,
    /// Message on the `Running` condition, empty when absent.
    pub message: String,
}

impl FailedSnapshot {
    /// Captures the phase and the `Running` condition of `data_volume`.
    #[must_use]
    pub fn of(data_volume: &DataVolume) -> Self {
        let conditions = ConditionIndex::build(data_volume);
        let running = conditions.get(&DataVolumeConditionType::Running);
        Self {
            phase: data_volume.phase().cloned().unwrap_or_default(),
            reason: running
                .map(|condition| condition.reason.clone())
                .unwrap_or_default(),
            message: running
                .map(|condition| condition.message.clone())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for FailedSnapshot {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "phase {}", self.phase)?;
        if !self.reason.is_empty() {
            write!(formatter, ", reason {}", self.reason)?;
        }
        if !self.message.is_empty() {
            write!(formatter, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Errors raised while waiting for an import to finish.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum WaitError {
    /// The importer reported an error on the `Running` condition.
    #[error("Import of DV failed: {0}")]
    ImportFailed(FailedSnapshot),
    /// The DataVolume entered phase `Failed`.
    #[error("DV is in phase failed: {0}")]
    PhaseFailed(FailedSnapshot),
    /// Fetching the current status failed.
    #[error("{0}")]
    Fetch(#[source] ClientError),
    /// No terminal state was observed before the deadline.
    #[error("timed out waiting for the condition after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl WaitError {
    /// Fetch failures follow the client classification; every other wait
    /// failure is soft.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Fetch(err) => err.severity(),
            Self::ImportFailed(_) | Self::PhaseFailed(_) | Self::Timeout(_) => Severity::Soft,
        }
    }
}

/// Errors raised by [`super::DataVolumeCreator::create`], prefixed with the
/// stage that failed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CreateError {
    /// The manifest could not be decoded.
    #[error("could not read DV manifest: {0}")]
    Decode(#[source] DecodeError),
    /// No target namespace could be determined.
    #[error("can't get active namespace: {0}")]
    Namespace(#[source] NamespaceError),
    /// The API rejected the create call.
    #[error("could not create DV: {0}")]
    Create(#[source] ClientError),
    /// The import did not succeed.
    #[error("Failed to wait for success of DV: {0}")]
    Wait(#[source] WaitError),
}

impl CreateError {
    /// Reporting severity of the failure.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::Decode(_) => Severity::Soft,
            Self::Namespace(_) => Severity::Fatal,
            Self::Create(err) => err.severity(),
            Self::Wait(err) => err.severity(),
        }
    }
}
