use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use super::{
    credential::{credential_from_headers, removal_cookie, session_cookie},
    types::{AuthState, SessionResponse},
};
use crate::guard::resolve_auth_state;
use crate::shared::{AppError, AppState};

/// HTTP handler for anonymous sign-in
///
/// POST /session
/// Sets the session cookie and returns the JWT credential with the generated username
#[instrument(name = "sign_in", skip(state, jar))]
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    info!("Creating new session");

    let session = state.auth_provider.sign_in().await?;

    info!(
        username = %session.username,
        token_length = session.token.len(),
        "Session created successfully"
    );

    let jar = jar.add(session_cookie(session.token.clone()));
    Ok((jar, Json(session)))
}

/// DELETE /session
/// A rejected or already revoked credential still has its cookie cleared
#[instrument(name = "sign_out", skip(state, headers, jar))]
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), (CookieJar, AppError)> {
    let jar = jar.remove(removal_cookie());

    let Some(credential) = credential_from_headers(&headers) else {
        warn!("Sign-out without a session credential");
        return Err((
            jar,
            AppError::Unauthorized("Missing session credential".to_string()),
        ));
    };

    match state.auth_provider.sign_out(&credential).await {
        Ok(()) => Ok((jar, StatusCode::NO_CONTENT)),
        Err(e) => Err((jar, e)),
    }
}

/// GET /session
/// Reports the auth state the guard would see for this request
#[instrument(name = "current_session", skip(state, headers))]
pub async fn current_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthState>, AppError> {
    let credential = credential_from_headers(&headers);

    let auth_state = resolve_auth_state(
        state.auth_provider.as_ref(),
        credential.as_deref(),
        state.guard_config.auth_wait_timeout,
    )
    .await?;

    Ok(Json(auth_state))
}
