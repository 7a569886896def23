//! Unit tests for the create workflow.

use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::exit::Severity;
use crate::namespace::NamespaceError;
use crate::test_support::{
    DataVolumeBuilder, FixedNamespace, ScriptedClient, api_error, import_failed, importing,
    phase_failed, succeeded,
};

const INTERVAL: Duration = Duration::from_secs(1);
const TIMEOUT: Duration = Duration::from_secs(5);

type Creator = DataVolumeCreator<ScriptedClient, FixedNamespace>;

fn manifest(builder: &DataVolumeBuilder) -> String {
    builder
        .to_yaml()
        .unwrap_or_else(|err| panic!("render manifest: {err}"))
}

fn creator_with(namespaces: FixedNamespace) -> (Creator, ScriptedClient) {
    let client = ScriptedClient::new();
    let creator = DataVolumeCreator::new(client.clone(), namespaces)
        .with_poll_interval(INTERVAL)
        .with_wait_timeout(TIMEOUT);
    (creator, client)
}

#[fixture]
fn creator() -> (Creator, ScriptedClient) {
    creator_with(FixedNamespace::new("active-ns"))
}

#[fixture]
fn disk() -> DataVolumeBuilder {
    DataVolumeBuilder::blank("disk").namespace("manifest-ns")
}

#[rstest]
#[tokio::test]
async fn create_without_wait_never_polls(
    creator: (Creator, ScriptedClient),
    disk: DataVolumeBuilder,
) {
    let (creator, client) = creator;

    let created = creator
        .create(&CreateRequest::new(manifest(&disk)))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));

    assert_eq!(client.create_count(), 1);
    assert_eq!(client.get_count(), 0);
    assert_eq!(created, disk.build());
}

#[rstest]
#[tokio::test]
async fn explicit_namespace_overrides_manifest(disk: DataVolumeBuilder) {
    let namespaces = FixedNamespace::new("active-ns");
    let (creator, client) = creator_with(namespaces.clone());

    let created = creator
        .create(&CreateRequest::new(manifest(&disk)).namespace("explicit-ns"))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));

    assert_eq!(created.namespace(), "explicit-ns");
    let submitted = client.created();
    let first = submitted
        .first()
        .unwrap_or_else(|| panic!("create should have been called"));
    assert_eq!(first.namespace(), "explicit-ns");
    assert_eq!(namespaces.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn active_namespace_fills_missing_namespace() {
    let namespaces = FixedNamespace::new("active-ns");
    let (creator, _client) = creator_with(namespaces.clone());
    let request = CreateRequest::new(manifest(&DataVolumeBuilder::blank("disk")));

    let created = creator
        .create(&request)
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));

    assert_eq!(created.namespace(), "active-ns");
    assert_eq!(namespaces.calls(), 1);
}

#[tokio::test]
async fn undetected_namespace_is_fatal_and_creates_nothing() {
    let (creator, client) = creator_with(FixedNamespace::undetected());
    let request = CreateRequest::new(manifest(&DataVolumeBuilder::blank("disk")));

    let err = creator
        .create(&request)
        .await
        .expect_err("namespace resolution should fail");

    assert_eq!(err, CreateError::Namespace(NamespaceError::Undetected));
    assert_eq!(
        err.to_string(),
        "can't get active namespace: could not detect active namespace"
    );
    assert_eq!(err.severity(), Severity::Fatal);
    assert_eq!(client.create_count(), 0);
}

#[rstest]
#[tokio::test]
async fn manifest_without_type_meta_is_rejected(creator: (Creator, ScriptedClient)) {
    let (creator, client) = creator;
    let builder = DataVolumeBuilder::blank("disk")
        .namespace("ns")
        .without_type_meta();

    let err = creator
        .create(&CreateRequest::new(manifest(&builder)))
        .await
        .expect_err("decode should fail");

    assert_eq!(
        err.to_string(),
        "could not read DV manifest: kind or apiVersion missing"
    );
    assert_eq!(err.severity(), Severity::Soft);
    assert_eq!(client.create_count(), 0);
}

#[rstest]
#[case::conflict(409, "AlreadyExists", Severity::Soft)]
#[case::invalid(422, "Invalid", Severity::Soft)]
#[case::not_found(404, "NotFound", Severity::Soft)]
#[case::server(500, "InternalError", Severity::Fatal)]
#[case::forbidden(403, "Forbidden", Severity::Fatal)]
#[tokio::test]
async fn create_failure_is_classified(
    creator: (Creator, ScriptedClient),
    disk: DataVolumeBuilder,
    #[case] code: u16,
    #[case] reason: &str,
    #[case] severity: Severity,
) {
    let (creator, client) = creator;
    client.fail_create(api_error(code, reason));

    let err = creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .expect_err("create should fail");

    assert!(matches!(err, CreateError::Create(_)), "unexpected: {err:?}");
    assert!(err.to_string().starts_with("could not create DV: "));
    assert_eq!(err.severity(), severity);
    assert_eq!(client.get_count(), 0, "failed creates are not polled");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_polls_until_import_succeeds(
    creator: (Creator, ScriptedClient),
    disk: DataVolumeBuilder,
) {
    let (creator, client) = creator;
    for _ in 0..3 {
        client.push_get(importing(disk.clone().build()));
    }
    client.push_get(succeeded(disk.clone().build()));

    let result = creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));

    assert_eq!(result, succeeded(disk.build()));
    let gets = client.gets();
    assert_eq!(gets.len(), 4);
    assert!(
        gets.iter()
            .all(|call| call.namespace == "manifest-ns" && call.name == "disk")
    );
    for pair in gets.windows(2) {
        if let [earlier, later] = pair {
            assert_eq!(later.at - earlier.at, INTERVAL);
        }
    }
}

#[rstest]
#[case::import_failed(
    import_failed,
    "Failed to wait for success of DV: Import of DV failed: phase ImportInProgress, \
     reason Error: Unable to connect to http data source"
)]
#[case::phase_failed(
    phase_failed,
    "Failed to wait for success of DV: DV is in phase failed: phase Failed"
)]
#[tokio::test(start_paused = true)]
async fn wait_stops_on_failure(
    creator: (Creator, ScriptedClient),
    disk: DataVolumeBuilder,
    #[case] failure: fn(DataVolume) -> DataVolume,
    #[case] message: &str,
) {
    let (creator, client) = creator;
    client.push_get(importing(disk.clone().build()));
    client.push_get(failure(disk.clone().build()));

    let err = creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .expect_err("wait should fail");

    assert_eq!(err.to_string(), message);
    assert_eq!(err.severity(), Severity::Soft);
    assert_eq!(client.get_count(), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_times_out_when_never_terminal(
    creator: (Creator, ScriptedClient),
    disk: DataVolumeBuilder,
) {
    let (creator, client) = creator;
    client.push_get(importing(disk.clone().build()));
    let started = tokio::time::Instant::now();

    let err = creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .expect_err("wait should time out");

    assert_eq!(err, CreateError::Wait(WaitError::Timeout(TIMEOUT)));
    assert_eq!(err.severity(), Severity::Soft);
    let gets = client.gets();
    assert!(gets.len() > 1);
    assert!(gets.iter().all(|call| call.at - started <= TIMEOUT));
    for pair in gets.windows(2) {
        if let [earlier, later] = pair {
            assert!(later.at - earlier.at <= INTERVAL);
        }
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_does_not_outlive_deadline_with_long_interval(disk: DataVolumeBuilder) {
    let client = ScriptedClient::new();
    let creator = DataVolumeCreator::new(client.clone(), FixedNamespace::new("active-ns"))
        .with_poll_interval(Duration::from_secs(30))
        .with_wait_timeout(TIMEOUT);
    client.push_get(importing(disk.clone().build()));
    let started = tokio::time::Instant::now();

    let err = creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .expect_err("wait should time out");

    let elapsed = started.elapsed();
    assert_eq!(err, CreateError::Wait(WaitError::Timeout(TIMEOUT)));
    assert!(
        elapsed >= TIMEOUT && elapsed < TIMEOUT + Duration::from_millis(5),
        "wait returned after {elapsed:?}"
    );
    assert_eq!(client.get_count(), 1);
}

#[rstest]
#[case::not_found(404, "NotFound", Severity::Soft)]
#[case::unavailable(503, "ServiceUnavailable", Severity::Fatal)]
#[tokio::test(start_paused = true)]
async fn fetch_error_ends_wait_immediately(
    creator: (Creator, ScriptedClient),
    disk: DataVolumeBuilder,
    #[case] code: u16,
    #[case] reason: &str,
    #[case] severity: Severity,
) {
    let (creator, client) = creator;
    client.push_get_error(api_error(code, reason));

    let err = creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .expect_err("wait should fail");

    assert!(
        matches!(err, CreateError::Wait(WaitError::Fetch(_))),
        "unexpected: {err:?}"
    );
    assert_eq!(err.severity(), severity);
    assert_eq!(client.get_count(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn wait_uses_namespace_reported_by_create() {
    let (creator, client) = creator_with(FixedNamespace::new("active-ns"));
    let disk = DataVolumeBuilder::blank("disk");
    client.push_get(succeeded(disk.clone().namespace("active-ns").build()));

    creator
        .create(&CreateRequest::new(manifest(&disk)).wait_for_success(true))
        .await
        .unwrap_or_else(|err| panic!("create: {err}"));

    let gets = client.gets();
    assert_eq!(gets.len(), 1);
    let first = gets
        .first()
        .unwrap_or_else(|| panic!("status should have been polled"));
    assert_eq!(first.namespace, "active-ns");
}
