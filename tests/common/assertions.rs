//! Custom assertion macros and utilities
//!
//! Provides assertion macros for JSON error bodies with more descriptive
//! failure messages.

/// Assert that an `axum_test` response has the given status and an
/// `{"error": <message>}` body
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr, $message:expr) => {{
        let response = &$response;
        assert_eq!(response.status_code(), $status, "unexpected status");
        let body: serde_json::Value = response.json();
        assert_eq!(
            body,
            serde_json::json!({ "error": $message }),
            "unexpected error body"
        );
    }};
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
