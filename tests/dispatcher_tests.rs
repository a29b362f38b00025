//! Tests for the request dispatcher
//!
//! # Test Coverage
//!
//! - the demo request scenarios (add, sub, mul, greet)
//! - path normalization and context prefix handling
//! - parameter binding: unmapped names, multi-valued names, pass-through types
//! - not-found, conversion failure, handler failure and handler panic responses
//! - legacy and hardened error bodies
//! - concurrent dispatch over one context

mod common;

use std::sync::Arc;
use std::thread;

use brrtmvc::dispatcher::{DispatchOutcome, INTERNAL_ERROR_BODY, LEGACY_ERROR_PREFIX};
use brrtmvc::scan::{InventoryClassPath, StaticClassPath};
use brrtmvc::server::{Request, Response, NOT_FOUND_BODY};
use brrtmvc::{demo, AppConfig, CompatMode, DispatchContext, DispatchError};
use common::*;
use http::StatusCode;

#[test]
fn test_add_writes_sum_through_response() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, outcome) = call(&ctx, "/app/add?a=2&b=3");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body(), "2+3=5");
    match outcome {
        DispatchOutcome::Completed { handler, returned } => {
            assert!(handler.ends_with("CalcController::add(Request, Response, i32, i32)"));
            assert!(!returned);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_sub_uses_float_conversion() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/app/sub?a=5.0&b=1.5");
    assert_eq!(resp.body(), "5.0-1.5=3.5");
    let (resp, _) = call(&ctx, "/app/sub?a=5&b=1.5");
    assert_eq!(resp.body(), "5.0-1.5=3.5");
}

#[test]
fn test_sub_rejects_infinity_shorthand() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, outcome) = call(&ctx, "/app/sub?a=inf&b=1");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(outcome.error(), Some(DispatchError::Conversion { .. })));
}

#[test]
fn test_returned_value_becomes_body() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, outcome) = call(&ctx, "/app/mul?a=4&b=5");
    assert_eq!(resp.body(), "20");
    assert!(matches!(outcome, DispatchOutcome::Completed { returned: true, .. }));
}

#[test]
fn test_interface_wired_service_is_used() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/greet/query?name=ada");
    assert_eq!(resp.body(), "hello, ada");
    let (resp, _) = call(&ctx, "/greet/query");
    assert_eq!(resp.body(), "hello, stranger");
}

#[test]
fn test_unknown_path_is_not_found() {
    let ctx = demo_context(CompatMode::Legacy);
    let (resp, outcome) = call(&ctx, "/nope");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.body(), NOT_FOUND_BODY);
    assert!(matches!(outcome, DispatchOutcome::NotFound { ref path } if path == "/nope"));
    assert_eq!(outcome.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_partial_match_is_not_found() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/app/add/extra?a=1&b=2");
    assert_eq!(resp.body(), NOT_FOUND_BODY);
    let (resp, _) = call(&ctx, "/app");
    assert_eq!(resp.body(), NOT_FOUND_BODY);
}

#[test]
fn test_repeated_separators_are_collapsed() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "//app///add?a=1&b=1");
    assert_eq!(resp.body(), "1+1=2");
}

#[test]
fn test_context_prefix_is_stripped() {
    let ctx = demo_context(CompatMode::Hardened);
    let req = Request::from_uri("/shop/app/add?a=1&b=2").with_context_path("/shop");
    let (resp, _) = ctx.serve(&req);
    assert_eq!(resp.body(), "1+2=3");

    let configured = DispatchContext::initialize(
        AppConfig::new(demo::DEMO_PACKAGE).with_context_path("/shop"),
        &StaticClassPath::new(demo::classes()),
    )
    .unwrap();
    let (resp, _) = call(&configured, "/shop/app/mul?a=3&b=3");
    assert_eq!(resp.body(), "9");
    let (resp, _) = call(&configured, "/app/mul?a=3&b=3");
    assert_eq!(resp.body(), "9");
}

#[test]
fn test_unmapped_parameters_are_ignored() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/app/mul?c=9&a=2&b=3&debug=true");
    assert_eq!(resp.body(), "6");
}

#[test]
fn test_multi_valued_parameters_are_joined() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/greet/tags?tag=red&tag=blue");
    assert_eq!(resp.body(), "tags=[red, blue]");

    let (resp, outcome) = call(&ctx, "/app/mul?a=1&a=2&b=3");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    match outcome.error() {
        Some(DispatchError::Conversion { param, value, .. }) => {
            assert_eq!(param, "a");
            assert_eq!(value, "1, 2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unbound_slots_stay_unset() {
    let ctx = shop_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/orders/total?a=1&b=2");
    assert_eq!(resp.body(), "1|2.0|true");
}

#[test]
fn test_request_object_and_passthrough_text_are_bound() {
    let ctx = shop_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/orders//echo?msg=hi%20there");
    assert_eq!(resp.body(), "/orders//echo:hi there");
}

#[test]
fn test_conversion_failure_legacy_body_carries_detail() {
    let ctx = demo_context(CompatMode::Legacy);
    let (resp, outcome) = call(&ctx, "/app/add?a=abc&b=1");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.body().starts_with(LEGACY_ERROR_PREFIX), "{}", resp.body());
    assert!(resp.body().contains("abc"));
    assert!(matches!(outcome.error(), Some(DispatchError::Conversion { .. })));
}

#[test]
fn test_conversion_failure_hardened_body_is_generic() {
    let ctx = demo_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/app/add?a=abc&b=1");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body(), INTERNAL_ERROR_BODY);
}

#[test]
fn test_missing_parameter_fails_in_handler() {
    let ctx = demo_context(CompatMode::Legacy);
    let (resp, outcome) = call(&ctx, "/app/add?a=1");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.body().contains("parameter `b` is missing"), "{}", resp.body());
    assert!(matches!(outcome.error(), Some(DispatchError::Invocation { .. })));
}

#[test]
fn test_unresolved_dependency_only_breaks_its_route() {
    let ctx = demo_context(CompatMode::Hardened);
    assert_eq!(ctx.injection_report().unresolved.len(), 1);

    let (resp, outcome) = call(&ctx, "/reports/latest");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(outcome.error(), Some(DispatchError::Invocation { .. })));

    let (resp, _) = call(&ctx, "/reports/ping");
    assert_eq!(resp.body(), "pong");
    let (resp, _) = call(&ctx, "/app/add?a=2&b=2");
    assert_eq!(resp.body(), "2+2=4");
}

#[test]
fn test_handler_panic_becomes_error_response() {
    let ctx = shop_context(CompatMode::Legacy);
    let (resp, outcome) = call(&ctx, "/orders/boom");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.body().contains("kaboom"), "{}", resp.body());
    assert!(matches!(outcome.error(), Some(DispatchError::Invocation { .. })));

    let (resp, _) = call(&ctx, "/orders/stock?sku=ab");
    assert_eq!(resp.body(), "ab=2");
}

#[test]
fn test_partial_writes_are_not_rolled_back() {
    let ctx = shop_context(CompatMode::Hardened);
    let (resp, _) = call(&ctx, "/orders/partial");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body(), format!("partial;{INTERNAL_ERROR_BODY}"));
}

#[test]
fn test_dispatch_into_caller_response() {
    let ctx = demo_context(CompatMode::Hardened);
    let mut resp = Response::new();
    let outcome = ctx.dispatch(&Request::new("/reports/ping"), &mut resp);
    assert!(outcome.is_completed());
    assert_eq!(resp.into_body(), "pong");
}

#[test]
fn test_concurrent_dispatch_shares_one_context() {
    let ctx = Arc::new(demo_context(CompatMode::Hardened));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                for i in 0..50 {
                    let (resp, _) = call(&ctx, &format!("/app/add?a={t}&b={i}"));
                    assert_eq!(resp.body(), format!("{t}+{i}={}", t + i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_inventory_discovers_demo_components() {
    assert_eq!(demo::classes().len(), 6);
    let ctx = DispatchContext::initialize(AppConfig::new(demo::DEMO_PACKAGE), &InventoryClassPath)
        .unwrap();
    assert_eq!(ctx.table().len(), 7);
    let (resp, _) = call(&ctx, "/app/add?a=20&b=22");
    assert_eq!(resp.body(), "20+22=42");
}
