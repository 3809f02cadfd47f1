//! Helpers for checking HTTP responses in tests.

use axum::{http::StatusCode, response::Response};

/// Assert that the response has status 200 OK.
#[track_caller]
pub fn assert_status_ok(response: &Response) {
    assert_eq!(response.status(), StatusCode::OK);
}

/// Get a response header as a string, panicking if it is missing or not
/// valid UTF-8.
#[track_caller]
pub fn get_header(response: &Response, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("missing header {header_name}"))
        .to_str()
        .unwrap_or_else(|_| panic!("header {header_name} is not valid UTF-8"))
        .to_owned()
}

/// Assert that the response redirects htmx to `endpoint` via the
/// `HX-Redirect` header.
#[track_caller]
pub fn assert_hx_redirect(response: &Response, endpoint: &str) {
    assert_eq!(get_header(response, "hx-redirect"), endpoint);
}
