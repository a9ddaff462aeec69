#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::sync::Mutex;

use routeguard::{
    auth::{AuthSubscription, ListenerRegistry, SessionResponse},
    AppError, AuthProvider, AuthState, AuthUser,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Provider whose auth state is scripted by the test.
///
/// Credentials are ignored: every request sees the same state. `None` means
/// the provider has not settled yet.
pub struct MockAuthProvider {
    state: Mutex<Option<AuthState>>,
    listeners: ListenerRegistry,
}

impl MockAuthProvider {
    pub fn unsettled() -> Self {
        Self {
            state: Mutex::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn signed_out() -> Self {
        let provider = Self::unsettled();
        provider.settle(AuthState::SignedOut);
        provider
    }

    pub fn signed_in(username: &str) -> Self {
        let provider = Self::unsettled();
        provider.settle(AuthState::SignedIn(test_user(username)));
        provider
    }

    /// Sets the state and fires pending listeners, like a provider finishing its restore
    pub fn settle(&self, state: AuthState) -> usize {
        *self.state.lock().unwrap() = Some(state.clone());
        self.listeners.notify_all(|_| state.clone())
    }

    pub fn close(&self) -> usize {
        self.listeners.close_all()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    fn current_user(&self, _credential: Option<&str>) -> Option<AuthState> {
        self.state.lock().unwrap().clone()
    }

    fn subscribe(&self, credential: Option<&str>) -> AuthSubscription {
        let subscription = self.listeners.register(credential);
        if let Some(state) = self.current_user(credential) {
            self.listeners.notify_all(|_| state.clone());
        }
        subscription
    }

    async fn sign_in(&self) -> Result<SessionResponse, AppError> {
        let user = test_user("mock-user");
        self.settle(AuthState::SignedIn(user.clone()));

        Ok(SessionResponse {
            token: "mock.token.value".to_string(),
            username: user.username,
            user_id: user.user_id,
        })
    }

    async fn sign_out(&self, _credential: &str) -> Result<(), AppError> {
        self.settle(AuthState::SignedOut);
        Ok(())
    }
}

pub fn test_user(username: &str) -> AuthUser {
    AuthUser {
        user_id: format!("id-{}", username),
        username: username.to_string(),
        session_id: format!("session-{}", username),
    }
}
