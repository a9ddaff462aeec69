use serde::Serialize;

use super::route::RouteClass;
use crate::auth::AuthState;

/// Where the guard sends visitors who may not stay on the requested route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTargets {
    /// Public landing page for signed-out visitors
    pub unauthenticated: String,
    /// Dashboard for signed-in users
    pub authenticated: String,
}

impl Default for RedirectTargets {
    fn default() -> Self {
        Self {
            unauthenticated: "/".to_string(),
            authenticated: "/dashboard".to_string(),
        }
    }
}

/// Outcome of guarding a single navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "location", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Decides a navigation from the route class and the current auth state alone
pub fn evaluate(class: RouteClass, state: &AuthState, targets: &RedirectTargets) -> GuardDecision {
    match (class, state.is_signed_in()) {
        (RouteClass::Public, _) => GuardDecision::Allow,
        (RouteClass::AuthOnly, true) => GuardDecision::Allow,
        (RouteClass::AuthOnly, false) => GuardDecision::Redirect(targets.unauthenticated.clone()),
        (RouteClass::GuestOnly, true) => GuardDecision::Redirect(targets.authenticated.clone()),
        (RouteClass::GuestOnly, false) => GuardDecision::Allow,
    }
}
