//! Assertions over response envelopes
//!
//! Each helper checks the status code and the `success` flag, then hands
//! back the part of the body the test cares about.

use axum::http::StatusCode;
use axum_test::TestResponse;
use serde_json::Value;

/// Assert a success envelope with `status` and return its `data`
pub fn expect_data(response: &TestResponse, status: StatusCode) -> Value {
    let body = expect_body(response, status);
    assert_eq!(body["success"], Value::Bool(true), "body: {body}");
    body["data"].clone()
}

/// Assert a failure envelope with `status` and return its `error` message
pub fn expect_error(response: &TestResponse, status: StatusCode) -> String {
    let body = expect_body(response, status);
    assert_eq!(body["success"], Value::Bool(false), "body: {body}");
    body["error"]
        .as_str()
        .expect("error envelope without an error message")
        .to_string()
}

/// Assert the status code and return the whole JSON body
pub fn expect_body(response: &TestResponse, status: StatusCode) -> Value {
    assert_eq!(
        response.status_code(),
        status,
        "unexpected status, body: {}",
        response.text()
    );
    response.json::<Value>()
}
