// Public API - what other modules can use
pub use handlers::{dashboard, index, login, login_submit};

// Internal modules
mod handlers;
