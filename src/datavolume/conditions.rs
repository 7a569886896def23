//! Classification of a `DataVolume` status snapshot.
//!
//! Every function here is pure: the same snapshot always yields the same
//! answer, and the condition lookup is rebuilt from the condition list on
//! each evaluation rather than cached between polls.

use std::collections::BTreeMap;

use super::types::{
    ConditionStatus, DataVolume, DataVolumeCondition, DataVolumeConditionType, DataVolumePhase,
};

/// Reason CDI reports on the `Running` condition when the importer fails.
///
/// Matched exactly; CDI does not publish a richer contract for it.
pub const IMPORT_ERROR_REASON: &str = "Error";

/// Lookup from condition type to the last condition of that type.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConditionIndex<'a> {
    by_type: BTreeMap<&'a DataVolumeConditionType, &'a DataVolumeCondition>,
}

impl<'a> ConditionIndex<'a> {
    /// Builds the index from the resource's condition list. When a type
    /// appears more than once, the later entry wins.
    #[must_use]
    pub fn build(data_volume: &'a DataVolume) -> Self {
        let mut by_type = BTreeMap::new();
        for condition in data_volume.conditions() {
            by_type.insert(&condition.condition_type, condition);
        }
        Self { by_type }
    }

    /// Returns the condition recorded for `condition_type`.
    #[must_use]
    pub fn get(&self, condition_type: &DataVolumeConditionType) -> Option<&'a DataVolumeCondition> {
        self.by_type.get(condition_type).copied()
    }

    /// Returns whether the condition exists and carries `status`.
    #[must_use]
    pub fn has_status(
        &self,
        condition_type: &DataVolumeConditionType,
        status: &ConditionStatus,
    ) -> bool {
        self.get(condition_type)
            .is_some_and(|condition| &condition.status == status)
    }

    /// Number of distinct condition types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Returns whether no conditions were reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

/// Outcome of evaluating a status snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImportState {
    /// Phase `Succeeded` with the claim bound.
    Succeeded,
    /// The importer reported an error while the claim is bound.
    ImportFailed,
    /// Phase `Failed`, regardless of conditions.
    PhaseFailed,
    /// Anything else; keep waiting.
    InProgress,
}

impl ImportState {
    /// Returns whether polling should stop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Returns whether the import finished successfully.
#[must_use]
pub fn is_import_succeeded(data_volume: &DataVolume) -> bool {
    let conditions = ConditionIndex::build(data_volume);
    data_volume.phase() == Some(&DataVolumePhase::Succeeded)
        && conditions.has_status(&DataVolumeConditionType::Bound, &ConditionStatus::True)
}

/// Returns whether the importer failed.
///
/// All four parts must hold: phase `ImportInProgress`, `Bound=True`,
/// `Running=False`, and a `Running` reason of exactly
/// [`IMPORT_ERROR_REASON`].
#[must_use]
pub fn has_import_failed(data_volume: &DataVolume) -> bool {
    let conditions = ConditionIndex::build(data_volume);
    data_volume.phase() == Some(&DataVolumePhase::ImportInProgress)
        && conditions.has_status(&DataVolumeConditionType::Bound, &ConditionStatus::True)
        && conditions
            .get(&DataVolumeConditionType::Running)
            .is_some_and(|running| {
                running.status == ConditionStatus::False && running.reason == IMPORT_ERROR_REASON
            })
}

/// Classifies a snapshot. Unexpected combinations fall through to
/// [`ImportState::InProgress`]; the caller's deadline bounds the wait.
#[must_use]
pub fn evaluate(data_volume: &DataVolume) -> ImportState {
    if is_import_succeeded(data_volume) {
        ImportState::Succeeded
    } else if has_import_failed(data_volume) {
        ImportState::ImportFailed
    } else if data_volume.phase() == Some(&DataVolumePhase::Failed) {
        ImportState::PhaseFailed
    } else {
        ImportState::InProgress
    }
}
