//! BDD step definitions for the admin reload feature

use std::sync::Arc;

use cucumber::{given, then, when};

use hall_client::admin::AdminReloader;
use hall_client::status::ReloadResult;
use hall_client::HallError;

use crate::common::{count, entries, RecordingOperator, ScriptedService};
use crate::world::HallWorld;

fn admin_service(world: &mut HallWorld) -> Arc<ScriptedService> {
    let journal = Arc::clone(&world.journal);
    Arc::clone(
        world
            .service
            .get_or_insert_with(|| Arc::new(ScriptedService::new(journal))),
    )
}

#[given(expr = "the gateway answers the reload with success and message {string}")]
fn reload_succeeds(world: &mut HallWorld, message: String) {
    admin_service(world).set_reload(Ok(ReloadResult {
        success: true,
        message,
    }));
}

#[given(expr = "the gateway answers the reload with failure and message {string}")]
fn reload_refused(world: &mut HallWorld, message: String) {
    admin_service(world).set_reload(Ok(ReloadResult {
        success: false,
        message,
    }));
}

#[given("the gateway cannot be reached for the reload")]
fn reload_unreachable(world: &mut HallWorld) {
    admin_service(world).set_reload(Err(HallError::Network("connection refused".to_string())));
}

#[given("the gateway answers the reload with a login page")]
fn reload_login_page(world: &mut HallWorld) {
    admin_service(world).set_reload(Err(HallError::Protocol(
        "expected value at line 1 column 1".to_string(),
    )));
}

#[when("the operator reloads the configuration")]
async fn operator_reloads(world: &mut HallWorld) {
    let service = admin_service(world);
    let operator = Arc::new(RecordingOperator {
        journal: Arc::clone(&world.journal),
    });
    let reloader = AdminReloader::new(service, operator);
    world.reload_result = Some(reloader.reload().await);
}

#[then(expr = "the operator sees {string}")]
fn operator_sees(world: &mut HallWorld, message: String) {
    assert!(
        entries(&world.journal).contains(&format!("message:{}", message)),
        "{:?}",
        entries(&world.journal)
    );
}

#[then("the page is refreshed after the message")]
fn page_refreshed(world: &mut HallWorld) {
    let log = entries(&world.journal);
    let message = log
        .iter()
        .position(|e| e.starts_with("message:"))
        .expect("no message shown");
    let refresh = log
        .iter()
        .position(|e| e == "refresh")
        .expect("page not refreshed");
    assert!(message < refresh, "{log:?}");
}

#[then("the page is not refreshed")]
fn page_not_refreshed(world: &mut HallWorld) {
    assert_eq!(count(&world.journal, "refresh"), 0);
}

#[then("the reload fails with a network error")]
fn reload_network_error(world: &mut HallWorld) {
    match world.reload_result.as_ref().expect("no reload attempted") {
        Err(HallError::Network(_)) => {}
        other => panic!("expected network error, got {other:?}"),
    }
}

#[then("the reload fails with a protocol error")]
fn reload_protocol_error(world: &mut HallWorld) {
    match world.reload_result.as_ref().expect("no reload attempted") {
        Err(HallError::Protocol(_)) => {}
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[then("no message is shown")]
fn no_message(world: &mut HallWorld) {
    assert_eq!(count(&world.journal, "message:"), 0);
}
