//! Shared fixtures for create BDD scenarios.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use create_datavolume::test_support::{DataVolumeBuilder, FixedNamespace, ScriptedClient};
use create_datavolume::{CreateError, DataVolume};
use rstest::fixture;

/// Poll interval used by scenarios that wait, kept short so real-time
/// waits stay fast.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);
/// Wait deadline used by scenarios that wait.
pub const WAIT_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
pub struct CreateWorld {
    pub client: ScriptedClient,
    pub namespaces: RefCell<FixedNamespace>,
    pub manifest: RefCell<Option<DataVolumeBuilder>>,
    pub requested_namespace: RefCell<Option<String>>,
    pub wait_for_success: Cell<bool>,
    pub outcome: RefCell<Option<Result<DataVolume, CreateError>>>,
}

impl CreateWorld {
    pub fn builder(&self) -> DataVolumeBuilder {
        self.manifest
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("a manifest step must run first"))
    }

    pub fn created(&self) -> DataVolume {
        match self.outcome.borrow().as_ref() {
            Some(Ok(data_volume)) => data_volume.clone(),
            Some(Err(err)) => panic!("expected success, got failure: {err}"),
            None => panic!("the create step must run first"),
        }
    }

    pub fn failure(&self) -> CreateError {
        match self.outcome.borrow().as_ref() {
            Some(Err(err)) => err.clone(),
            Some(Ok(data_volume)) => {
                panic!("expected failure, created {}", data_volume.name())
            }
            None => panic!("the create step must run first"),
        }
    }
}

#[fixture]
pub fn create_world() -> CreateWorld {
    CreateWorld {
        namespaces: RefCell::new(FixedNamespace::undetected()),
        ..CreateWorld::default()
    }
}
