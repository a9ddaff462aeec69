// Public API - what other modules can use
pub use cleanup_task::start_cleanup_task;
pub use credential::{credential_from_headers, session_cookie, SESSION_COOKIE};
pub use handlers::{current_session, sign_in, sign_out};
pub use listeners::{AuthSubscription, ListenerRegistry};
pub use provider::{AuthProvider, SessionAuthProvider};
pub use repository::{InMemorySessionRepository, SessionRepository};
pub use token::TokenConfig;
pub use types::{AuthClaims, AuthState, AuthUser, SessionResponse};

// Internal modules
mod cleanup_task;
mod credential;
pub mod generators;
mod handlers;
mod listeners;
pub mod models;
mod provider;
pub mod repository;
mod token;
mod types;
