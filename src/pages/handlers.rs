use axum::{
    extract::{Extension, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info, instrument};

use crate::auth::{session_cookie, AuthState};
use crate::shared::{AppError, AppState};

/// GET / - public landing page
#[instrument(name = "index_page", skip(state, auth_state))]
pub async fn index(
    State(state): State<AppState>,
    Extension(auth_state): Extension<AuthState>,
) -> Html<String> {
    let config = &state.guard_config;
    let action = match auth_state.user() {
        Some(user) => format!(
            r#"<p>Signed in as {}. <a href="{}">Open dashboard</a></p>"#,
            escape(&user.username),
            escape(&config.dashboard_path)
        ),
        None => format!(
            r#"<p><a href="{}">Sign in</a></p>"#,
            escape(&config.login_path)
        ),
    };

    Html(page("Welcome", &action))
}

/// GET /login - only reachable while signed out
#[instrument(name = "login_page", skip(state))]
pub async fn login(State(state): State<AppState>) -> Html<String> {
    let form = format!(
        r#"<form method="post" action="{}"><button type="submit">Continue as guest</button></form>"#,
        escape(&state.guard_config.login_path)
    );

    Html(page("Sign in", &form))
}

/// POST /login - browser sign-in, lands on the dashboard with the session cookie set
#[instrument(name = "login_submit", skip(state, jar))]
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let session = state.auth_provider.sign_in().await?;
    info!(username = %session.username, "Signed in from login form");

    Ok((
        jar.add(session_cookie(session.token)),
        Redirect::to(&state.guard_config.dashboard_path),
    ))
}

/// GET /dashboard - only reachable while signed in
#[instrument(name = "dashboard_page", skip(auth_state))]
pub async fn dashboard(Extension(auth_state): Extension<AuthState>) -> Html<String> {
    let greeting = match auth_state.user() {
        Some(user) => {
            debug!(username = %user.username, "Rendering dashboard");
            format!("<p>Hello, {}.</p>", escape(&user.username))
        }
        // Only reachable if the route is reclassified as public
        None => "<p>Hello, guest.</p>".to_string(),
    };

    Html(page("Dashboard", &greeting))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{title}</title></head><body><h1>{title}</h1>{body}</body></html>"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
