//! BDD step definitions for DataVolume creation.

use create_datavolume::test_support::{
    DataVolumeBuilder, FixedNamespace, api_error, import_failed, importing, succeeded,
};
use create_datavolume::{CreateRequest, DataVolumeCreator, ImportState, Severity};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::{CreateWorld, POLL_INTERVAL, WAIT_TIMEOUT};

#[given("a blank DataVolume manifest in namespace \"{namespace}\"")]
fn manifest_in_namespace(create_world: &CreateWorld, namespace: String) {
    *create_world.manifest.borrow_mut() =
        Some(DataVolumeBuilder::blank("disk").namespace(&namespace));
}

#[given("a blank DataVolume manifest without a namespace")]
fn manifest_without_namespace(create_world: &CreateWorld) {
    *create_world.manifest.borrow_mut() = Some(DataVolumeBuilder::blank("disk"));
}

#[given("a DataVolume manifest without kind or apiVersion")]
fn manifest_without_type_meta(create_world: &CreateWorld) {
    *create_world.manifest.borrow_mut() = Some(
        DataVolumeBuilder::blank("disk")
            .namespace("team-a")
            .without_type_meta(),
    );
}

#[given("the namespace \"{namespace}\" is requested")]
fn namespace_requested(create_world: &CreateWorld, namespace: String) {
    *create_world.requested_namespace.borrow_mut() = Some(namespace);
}

#[given("the active namespace is \"{namespace}\"")]
fn active_namespace(create_world: &CreateWorld, namespace: String) {
    *create_world.namespaces.borrow_mut() = FixedNamespace::new(&namespace);
}

#[given("the API rejects the create call with status \"{code}\"")]
fn create_rejected(create_world: &CreateWorld, code: u16) {
    create_world
        .client
        .fail_create(api_error(code, "AlreadyExists"));
}

#[given("waiting for success is enabled")]
fn waiting_enabled(create_world: &CreateWorld) {
    create_world.wait_for_success.set(true);
}

#[given("the import reports progress \"{polls}\" times before succeeding")]
fn import_succeeds_after(create_world: &CreateWorld, polls: usize) {
    let builder = create_world.builder();
    for _ in 0..polls {
        create_world.client.push_get(importing(builder.clone().build()));
    }
    create_world.client.push_get(succeeded(builder.build()));
}

#[given("the importer fails")]
fn importer_fails(create_world: &CreateWorld) {
    let builder = create_world.builder();
    create_world.client.push_get(importing(builder.clone().build()));
    create_world.client.push_get(import_failed(builder.build()));
}

#[given("the import never finishes")]
fn import_never_finishes(create_world: &CreateWorld) {
    let builder = create_world.builder();
    create_world.client.push_get(importing(builder.build()));
}

#[when("I create the DataVolume")]
fn create_data_volume(create_world: &CreateWorld) {
    let runtime = Runtime::new().unwrap_or_else(|err| panic!("tokio runtime: {err}"));
    let manifest = create_world
        .builder()
        .to_yaml()
        .unwrap_or_else(|err| panic!("render manifest: {err}"));
    let mut request =
        CreateRequest::new(manifest).wait_for_success(create_world.wait_for_success.get());
    if let Some(namespace) = create_world.requested_namespace.borrow().clone() {
        request = request.namespace(namespace);
    }
    let creator = DataVolumeCreator::new(
        create_world.client.clone(),
        create_world.namespaces.borrow().clone(),
    )
    .with_poll_interval(POLL_INTERVAL)
    .with_wait_timeout(WAIT_TIMEOUT);

    let result = runtime.block_on(async { creator.create(&request).await });
    *create_world.outcome.borrow_mut() = Some(result);
}

#[then("the DataVolume is created in namespace \"{namespace}\"")]
fn created_in_namespace(create_world: &CreateWorld, namespace: String) {
    assert_eq!(create_world.created().namespace(), namespace);
    let submitted = create_world.client.created();
    assert_eq!(submitted.len(), 1, "create should be called exactly once");
    assert!(
        submitted
            .iter()
            .all(|data_volume| data_volume.namespace() == namespace)
    );
}

#[then("the import succeeded")]
fn import_succeeded(create_world: &CreateWorld) {
    assert_eq!(
        create_datavolume::datavolume::evaluate(&create_world.created()),
        ImportState::Succeeded
    );
}

#[then("the status is polled \"{count}\" times")]
fn status_polled(create_world: &CreateWorld, count: usize) {
    assert_eq!(create_world.client.get_count(), count);
}

#[then("creation fails with \"{message}\"")]
fn creation_fails_with(create_world: &CreateWorld, message: String) {
    assert_eq!(create_world.failure().to_string(), message);
}

#[then("the failure message starts with \"{prefix}\"")]
fn failure_starts_with(create_world: &CreateWorld, prefix: String) {
    let message = create_world.failure().to_string();
    assert!(
        message.starts_with(&prefix),
        "expected '{message}' to start with '{prefix}'"
    );
}

#[then("the failure is soft")]
fn failure_is_soft(create_world: &CreateWorld) {
    assert_eq!(create_world.failure().severity(), Severity::Soft);
}

#[then("the failure is fatal")]
fn failure_is_fatal(create_world: &CreateWorld) {
    assert_eq!(create_world.failure().severity(), Severity::Fatal);
}

#[then("nothing is created")]
fn nothing_created(create_world: &CreateWorld) {
    assert_eq!(create_world.client.create_count(), 0);
}
