use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthProvider;
use crate::config::GuardConfig;
use crate::guard::RouteTable;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub auth_provider: Arc<dyn AuthProvider>,
    pub routes: Arc<RouteTable>,
    pub guard_config: GuardConfig,
}

impl AppState {
    /// Builds the state, checking the route table against the redirect targets
    pub fn new(
        auth_provider: Arc<dyn AuthProvider>,
        guard_config: GuardConfig,
    ) -> Result<Self, AppError> {
        let routes = RouteTable::from_config(&guard_config)?;

        Ok(Self {
            auth_provider,
            routes: Arc::new(routes),
            guard_config,
        })
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Auth provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Auth state did not settle within {0:?}")]
    AuthStateTimeout(Duration),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Configuration error: {}", msg),
            ),
            AppError::ProviderUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Auth provider unavailable: {}", msg),
            ),
            AppError::AuthStateTimeout(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Authentication state is not available yet".to_string(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
