// Public API - what other modules can use
pub use decision::{evaluate, GuardDecision, RedirectTargets};
pub use middleware::route_guard;
pub use presence::resolve_auth_state;
pub use route::{normalize_path, RouteClass, RouteDefinition, RouteMatch, RouteTable};

// Internal modules
mod decision;
mod middleware;
mod presence;
mod route;
