use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, instrument};

use super::{
    decision::{evaluate, GuardDecision},
    presence::resolve_auth_state,
};
use crate::auth::credential_from_headers;
use crate::shared::{AppError, AppState};

/// Route guard middleware - decides every page navigation before the handler runs.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), guard::route_guard))
/// Applied with `layer` rather than `route_layer` so the router's fallback is guarded too.
/// Allowed requests carry the resolved `AuthState` as an extension for handlers to use.
#[instrument(skip(state, req, next), fields(destination = %req.uri().path()))]
pub async fn route_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let destination = req.uri().path().to_string();
    let route = state.routes.classify(&destination);

    let credential = credential_from_headers(req.headers());
    let auth_state = resolve_auth_state(
        state.auth_provider.as_ref(),
        credential.as_deref(),
        state.guard_config.auth_wait_timeout,
    )
    .await?;

    let decision = evaluate(route.class, &auth_state, &state.guard_config.redirects());

    info!(
        route_name = route.name.unwrap_or("<unregistered>"),
        route_class = %route.class,
        signed_in = auth_state.is_signed_in(),
        decision = ?decision,
        "Navigation guarded"
    );

    match decision {
        GuardDecision::Allow => {
            req.extensions_mut().insert(auth_state);
            Ok(next.run(req).await)
        }
        GuardDecision::Redirect(location) => Ok(Redirect::to(&location).into_response()),
    }
}
