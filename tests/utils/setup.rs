#![allow(dead_code)] // Test utilities may not all be used in every test

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

use routeguard::{
    auth::{InMemorySessionRepository, SessionResponse, TokenConfig},
    build_router, AppState, AuthProvider, GuardConfig, SessionAuthProvider,
};

use super::mocks::MockAuthProvider;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub router: Router,
    pub session_provider: Option<Arc<SessionAuthProvider>>,
    pub mock_provider: Option<Arc<MockAuthProvider>>,
}

pub struct TestSetupBuilder {
    guard_config: GuardConfig,
    mock_provider: Option<Arc<MockAuthProvider>>,
    restore: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            guard_config: GuardConfig {
                auth_wait_timeout: Duration::from_millis(200),
                ..GuardConfig::default()
            },
            mock_provider: None,
            restore: true,
        }
    }

    pub fn with_guard_config(mut self, guard_config: GuardConfig) -> Self {
        self.guard_config = guard_config;
        self
    }

    pub fn with_auth_wait(mut self, wait: Duration) -> Self {
        self.guard_config.auth_wait_timeout = wait;
        self
    }

    /// Uses a scripted provider instead of the in-process session provider
    pub fn with_mock_provider(mut self, provider: Arc<MockAuthProvider>) -> Self {
        self.mock_provider = Some(provider);
        self
    }

    /// Leaves the session provider unsettled so navigations have to wait
    pub fn without_restore(mut self) -> Self {
        self.restore = false;
        self
    }

    pub async fn build(self) -> TestSetup {
        let (provider, session_provider) = match &self.mock_provider {
            Some(mock) => (mock.clone() as Arc<dyn AuthProvider>, None),
            None => {
                let session_provider = Arc::new(SessionAuthProvider::new(
                    Arc::new(InMemorySessionRepository::new()),
                    TokenConfig::new("integration-test-secret", 7),
                ));
                if self.restore {
                    session_provider.restore().await.unwrap();
                }
                (
                    session_provider.clone() as Arc<dyn AuthProvider>,
                    Some(session_provider),
                )
            }
        };

        let state = AppState::new(provider, self.guard_config).unwrap();

        TestSetup {
            router: build_router(state),
            session_provider,
            mock_provider: self.mock_provider,
        }
    }
}

impl TestSetup {
    /// Navigates to `path`, optionally carrying a session cookie
    pub async fn navigate(&self, path: &str, token: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            request = request.header(header::COOKIE, format!("session={}", token));
        }

        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Signs in through the HTTP API and returns the issued session
    pub async fn sign_in(&self) -> SessionResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/session")
            .body(Body::empty())
            .unwrap();

        let response = self.send(request).await;
        assert!(response.status().is_success(), "sign-in should succeed");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    pub async fn sign_out(&self, token: &str) -> Response<Body> {
        let request = Request::builder()
            .method("DELETE")
            .uri("/session")
            .header(header::COOKIE, format!("session={}", token))
            .body(Body::empty())
            .unwrap();

        self.send(request).await
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}
