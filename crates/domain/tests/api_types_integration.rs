//! Integration tests for the wire types
//!
//! Walks real backend bodies through envelope parsing and into the error
//! taxonomy the UI relies on.

use gamelink_domain::constants::{codes, AUTH_ERROR_MESSAGE, SERVER_ERROR_MESSAGE};
use gamelink_domain::{ApiError, Envelope, ErrorCategory, PageResult};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Order {
    id: u64,
    status: String,
}

/// Classification of the two canonical status codes
#[test]
fn test_status_classification_scenario() {
    let unauthorized = ApiError::from_status(401);
    assert!(unauthorized.is_auth_error());
    assert!(!unauthorized.is_server_error());
    assert_eq!(unauthorized.friendly_message(), AUTH_ERROR_MESSAGE);

    let unavailable = ApiError::from_status(503);
    assert!(unavailable.is_server_error());
    assert!(!unavailable.is_auth_error());
    assert_eq!(unavailable.friendly_message(), SERVER_ERROR_MESSAGE);
}

/// A paged list response as sent by the order service
#[test]
fn test_paged_orders_envelope() {
    let body = br#"{
        "success": true,
        "code": 0,
        "message": "ok",
        "data": {
            "list": [{"id": 1, "status": "paid"}, {"id": 2, "status": "pending"}],
            "total": 12,
            "page": 1,
            "page_size": 2
        }
    }"#;

    let page = Envelope::<PageResult<Order>>::from_slice(body)
        .expect("valid envelope")
        .into_result()
        .expect("success payload");

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1], Order { id: 2, status: "pending".to_string() });
    assert_eq!(page.total_pages(), 6);
    assert!(page.has_next);
    assert!(!page.has_prev);
}

/// Business failures keep their own message for display
#[test]
fn test_business_failure_surfaces_server_message() {
    let body = br#"{"success": false, "code": 5002, "message": "insufficient balance", "data": null}"#;

    let err = Envelope::<Order>::from_slice(body)
        .expect("valid envelope")
        .into_result()
        .expect_err("failure payload");

    assert_eq!(err.code, codes::INSUFFICIENT_BALANCE);
    assert_eq!(err.category(), ErrorCategory::Business);
    assert_eq!(err.friendly_message(), "insufficient balance");
    assert_eq!(err.to_string(), "[5002] insufficient balance");
}
