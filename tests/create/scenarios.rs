//! BDD scenarios for DataVolume creation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{CreateWorld, create_world};

#[scenario(
    path = "tests/features/create.feature",
    name = "Create a DataVolume without waiting"
)]
fn scenario_create_without_wait(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "An explicit namespace overrides the manifest"
)]
fn scenario_explicit_namespace(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Fall back to the active namespace"
)]
fn scenario_active_namespace(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Fail when no namespace can be determined"
)]
fn scenario_undetected_namespace(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Reject a manifest without type metadata"
)]
fn scenario_missing_type_meta(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Report a conflicting DataVolume as a soft failure"
)]
fn scenario_conflict(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Wait until the import succeeds"
)]
fn scenario_wait_success(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Stop waiting when the importer fails"
)]
fn scenario_import_failure(create_world: CreateWorld) {
    drop(create_world);
}

#[scenario(
    path = "tests/features/create.feature",
    name = "Give up when the import never finishes"
)]
fn scenario_timeout(create_world: CreateWorld) {
    drop(create_world);
}
