//! Tests for route declaration and matching.

use http::Method;
use mulligan::router::Router;
use mulligan::server::parse_query_params;

mod common;

fn table() -> Router {
    let mut router = Router::new();
    router.add_route(Method::GET, "/", "root");
    router.add_route(Method::GET, "/pets", "list_pets");
    router.add_route(Method::POST, "/pets", "add_pet");
    router.add_route(Method::GET, "/pets/{id}", "get_pet");
    router.add_route(Method::GET, "/users/{user_id}/posts/{post_id}", "get_post");
    router
}

#[test]
fn test_matches_root() {
    common::init();
    let router = table();
    let m = router.route(Method::GET, "/").expect("match");
    assert_eq!(m.handler_name, "root");
    assert!(m.path_params.is_empty());
}

#[test]
fn test_matches_literal_path() {
    common::init();
    let router = table();
    let m = router.route(Method::GET, "/pets").expect("match");
    assert_eq!(m.handler_name, "list_pets");
}

#[test]
fn test_method_disambiguates() {
    common::init();
    let router = table();
    assert_eq!(
        router.route(Method::POST, "/pets").expect("match").handler_name,
        "add_pet"
    );
    assert!(router.route(Method::DELETE, "/pets").is_none());
}

#[test]
fn test_extracts_single_param() {
    common::init();
    let router = table();
    let m = router.route(Method::GET, "/pets/12345").expect("match");
    assert_eq!(m.handler_name, "get_pet");
    assert_eq!(m.get_path_param("id"), Some("12345"));
}

#[test]
fn test_extracts_multiple_params() {
    common::init();
    let router = table();
    let m = router
        .route(Method::GET, "/users/abc-123/posts/post1")
        .expect("match");
    assert_eq!(m.get_path_param("user_id"), Some("abc-123"));
    assert_eq!(m.get_path_param("post_id"), Some("post1"));
    assert_eq!(m.get_path_param("missing"), None);
}

#[test]
fn test_no_match_for_unknown_path() {
    common::init();
    let router = table();
    assert!(router.route(Method::GET, "/nope").is_none());
    // A param segment never spans a slash.
    assert!(router.route(Method::GET, "/pets/1/extra").is_none());
}

#[test]
fn test_first_declared_route_wins() {
    common::init();
    let mut router = Router::new();
    router.add_route(Method::GET, "/pets/{id}", "by_param");
    router.add_route(Method::GET, "/pets/special", "literal");

    // Declaration order is match order.
    let m = router.route(Method::GET, "/pets/special").expect("match");
    assert_eq!(m.handler_name, "by_param");
}

#[test]
fn test_query_params_last_write_wins() {
    common::init();
    let router = table();
    let mut m = router.route(Method::GET, "/pets").expect("match");
    m.query_params = parse_query_params("/pets?limit=10&limit=20&offset=0");

    assert_eq!(m.get_query_param("limit"), Some("20"));
    assert_eq!(m.get_query_param("offset"), Some("0"));
    assert_eq!(m.get_query_param("order"), None);
}

#[test]
fn test_path_patterns_in_declaration_order() {
    common::init();
    let router = table();
    assert_eq!(
        router.path_patterns(),
        vec!["/", "/pets", "/pets", "/pets/{id}", "/users/{user_id}/posts/{post_id}"]
    );
}
