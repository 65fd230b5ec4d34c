//! End-to-end error-recovery behavior through the router → dispatcher path:
//! exact-kind and ancestor-kind dispatch, unmatched propagation, override,
//! and response-finalization precedence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::Method;
use mulligan::dispatcher::HeaderVec;
use mulligan::error::{ErrorKind, Failure, FAILURE};
use mulligan::server::{AppService, Response};
use mulligan::App;
use serde_json::{json, Value};

mod common;

static APP_ERROR: ErrorKind = ErrorKind::new("AppError", &FAILURE);
static NOT_FOUND: ErrorKind = ErrorKind::new("NotFoundError", &APP_ERROR);
static SPECIFIC_NOT_FOUND: ErrorKind = ErrorKind::new("SpecificNotFoundError", &NOT_FOUND);
static MUST_USE_RESPONSE: ErrorKind = ErrorKind::new("MustUseResponseError", &APP_ERROR);
static RUNTIME: ErrorKind = ErrorKind::new("RuntimeError", &APP_ERROR);
// A separate branch: shares no ancestry with AppError below the root.
static UNKNOWN: ErrorKind = ErrorKind::new("UnknownError", &FAILURE);

fn build_service() -> AppService {
    let mut app = App::new();

    app.get("/", |_req, _res| Ok(json!("hello")));
    app.get("/raises", |_req, _res| {
        Err(Failure::new(&RUNTIME, "runtime gave up"))
    });
    app.get("/other_raises", |_req, _res| Err(Failure::of(&NOT_FOUND)));
    app.get("/same_other_raises", |_req, _res| {
        Err(Failure::of(&SPECIFIC_NOT_FOUND))
    });
    app.get("/must_use_response", |_req, _res| {
        Err(Failure::of(&MUST_USE_RESPONSE))
    });
    app.get("/uncaught", |_req, _res| {
        Err(Failure::new(&UNKNOWN, "nobody handles this"))
    });

    app.error(&NOT_FOUND, |_ctx| Ok(json!("Not Found")));
    app.error(&MUST_USE_RESPONSE, |ctx| {
        ctx.response.redirect("/");
        Ok(json!("not this"))
    });
    app.error(&APP_ERROR, |ctx| Ok(json!(ctx.failure.message())));

    app.into_service()
}

fn dispatch(service: &AppService, path: &str) -> Option<Result<Response, Failure>> {
    let route_match = service
        .router
        .route(Method::GET, path)
        .expect("route should match");
    service
        .dispatcher
        .dispatch(route_match, None, HeaderVec::new(), HeaderVec::new())
}

fn body(outcome: Option<Result<Response, Failure>>) -> Value {
    outcome
        .expect("handler registered")
        .expect("dispatch should recover")
        .body()
        .clone()
}

#[test]
fn test_success_passes_through_unchanged() {
    common::init();
    let service = build_service();

    let response = dispatch(&service, "/")
        .expect("handler registered")
        .expect("no failure");
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), &json!("hello"));
}

#[test]
fn test_exact_kind_dispatches_to_its_handler() {
    common::init();
    let service = build_service();
    assert_eq!(body(dispatch(&service, "/other_raises")), json!("Not Found"));
}

#[test]
fn test_child_kind_resolves_to_parent_handler() {
    common::init();
    let service = build_service();

    // SpecificNotFoundError has no handler of its own; NotFoundError is the
    // nearest registered ancestor.
    assert_eq!(
        body(dispatch(&service, "/same_other_raises")),
        json!("Not Found")
    );
}

#[test]
fn test_generic_ancestor_handler_sees_failure_message() {
    common::init();
    let service = build_service();

    // RuntimeError resolves to the broad AppError handler, which reads the
    // message off the context's failure.
    assert_eq!(body(dispatch(&service, "/raises")), json!("runtime gave up"));
}

#[test]
fn test_handler_return_value_becomes_the_body() {
    common::init();
    let service = build_service();

    let response = dispatch(&service, "/other_raises")
        .expect("handler registered")
        .expect("recovered");
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), &json!("Not Found"));
    assert_ne!(response.body(), &json!("not this"));
}

#[test]
fn test_unmatched_failure_propagates_unchanged() {
    common::init();
    let service = build_service();

    let failure = dispatch(&service, "/uncaught")
        .expect("handler registered")
        .expect_err("nothing in the ancestry chain is registered");

    // Identity preserved: same kind, same message, nothing wrapped.
    assert_eq!(failure.kind(), &UNKNOWN);
    assert_eq!(failure.message(), "nobody handles this");
    assert_eq!(failure, Failure::new(&UNKNOWN, "nobody handles this"));
}

#[test]
fn test_reregistration_overrides_previous_handler() {
    common::init();
    let service = build_service();
    assert_eq!(body(dispatch(&service, "/raises")), json!("runtime gave up"));

    service
        .dispatcher
        .recovery()
        .register(&APP_ERROR, |_ctx| Ok(json!("other handler!")));

    assert_eq!(body(dispatch(&service, "/raises")), json!("other handler!"));
}

#[test]
fn test_finalized_response_beats_returned_body() {
    common::init();
    let service = build_service();

    let response = dispatch(&service, "/must_use_response")
        .expect("handler registered")
        .expect("recovered");

    assert_eq!(response.status(), 302);
    assert_eq!(response.get_header("location"), Some("/"));
    // The handler's returned value is ignored once the response is final.
    assert_ne!(response.body(), &json!("not this"));
}

#[test]
fn test_recovery_handler_runs_exactly_once_per_failure() {
    common::init();
    let calls = Arc::new(AtomicUsize::new(0));

    let mut app = App::new();
    app.get("/boom", |_req, _res| Err(Failure::of(&RUNTIME)));
    let counter = Arc::clone(&calls);
    app.error(&RUNTIME, move |_ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(json!("counted"))
    });
    let service = app.into_service();

    assert_eq!(body(dispatch(&service, "/boom")), json!("counted"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failing_recovery_handler_propagates_without_redispatch() {
    common::init();
    let unknown_calls = Arc::new(AtomicUsize::new(0));

    let mut app = App::new();
    app.get("/boom", |_req, _res| Err(Failure::of(&RUNTIME)));
    app.error(&RUNTIME, |_ctx| {
        Err(Failure::new(&UNKNOWN, "recovery blew up"))
    });
    let counter = Arc::clone(&unknown_calls);
    app.error(&UNKNOWN, move |_ctx| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(json!("should never run"))
    });
    let service = app.into_service();

    let failure = dispatch(&service, "/boom")
        .expect("handler registered")
        .expect_err("recovery failure propagates");

    // The new failure is unmatched with respect to this dispatch even
    // though UnknownError has a handler: no recursive self-catching.
    assert_eq!(failure.kind(), &UNKNOWN);
    assert_eq!(failure.message(), "recovery blew up");
    assert_eq!(unknown_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_recovery_handler_can_set_status_and_body() {
    common::init();
    let mut app = App::new();
    app.get("/boom", |_req, _res| Err(Failure::of(&NOT_FOUND)));
    app.error(&NOT_FOUND, |ctx| {
        ctx.response.set_status(404);
        Ok(json!({ "error": ctx.failure.message() }))
    });
    let service = app.into_service();

    let response = dispatch(&service, "/boom")
        .expect("handler registered")
        .expect("recovered");
    assert_eq!(response.status(), 404);
    assert_eq!(response.body(), &json!({ "error": "NotFoundError" }));
}

#[test]
fn test_env_exposes_failure_under_reserved_key() {
    common::init();
    let mut app = App::new();
    app.get("/boom", |_req, _res| {
        Err(Failure::new(&RUNTIME, "introspect me").with_payload(json!({ "attempt": 2 })))
    });
    app.error(&RUNTIME, |ctx| {
        let mirrored = &ctx.env[mulligan::ENV_ERROR_KEY];
        Ok(json!({
            "kind": mirrored["kind"],
            "message": mirrored["message"],
            "attempt": mirrored["payload"]["attempt"],
        }))
    });
    let service = app.into_service();

    assert_eq!(
        body(dispatch(&service, "/boom")),
        json!({ "kind": "RuntimeError", "message": "introspect me", "attempt": 2 })
    );
}
