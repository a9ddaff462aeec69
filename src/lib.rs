// Library crate for the route guard server
// This file exposes the public API for integration tests

pub mod app;
pub mod auth;
pub mod config;
pub mod guard;
pub mod pages;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use auth::{AuthProvider, AuthState, AuthUser, SessionAuthProvider};
pub use config::{AppConfig, GuardConfig, SessionConfig};
pub use guard::{evaluate, GuardDecision, RouteClass, RouteTable};
pub use shared::{AppError, AppState};
