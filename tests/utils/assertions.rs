//! Test assertion helpers - fluent API for verifying navigation outcomes
#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{header, Response, StatusCode},
};

use super::setup::body_text;

// ============================================================================
// Assertion Helpers
// ============================================================================

pub struct NavigationAssertion {
    response: Response<Body>,
}

impl NavigationAssertion {
    pub fn new(response: Response<Body>) -> Self {
        Self { response }
    }

    /// Assert the guard let the navigation through to the page handler
    pub fn allowed(self) -> Self {
        assert_eq!(
            self.response.status(),
            StatusCode::OK,
            "navigation should be allowed"
        );
        self
    }

    /// Assert the guard redirected to `location`
    pub fn redirected_to(self, location: &str) -> Self {
        assert_eq!(
            self.response.status(),
            StatusCode::SEE_OTHER,
            "navigation should be redirected"
        );
        assert_eq!(self.location(), Some(location), "wrong redirect target");
        self
    }

    pub fn failed_with(self, status: StatusCode) -> Self {
        assert_eq!(self.response.status(), status);
        self
    }

    pub async fn body_contains(self, needle: &str) {
        let body = body_text(self.response).await;
        assert!(body.contains(needle), "body should contain {:?}: {}", needle, body);
    }

    fn location(&self) -> Option<&str> {
        self.response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}
