use axum::{
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::auth::{current_session, sign_in, sign_out};
use crate::guard::route_guard;
use crate::pages;
use crate::shared::AppState;

/// Assembles the application router.
///
/// Every page, and the fallback for unknown paths, sits behind the route guard;
/// the session API and health check do not.
pub fn build_router(state: AppState) -> Router {
    let config = &state.guard_config;

    let guarded_pages = Router::new()
        .route(&config.public_path, get(pages::index))
        .route(&config.login_path, get(pages::login).post(pages::login_submit))
        .route(&config.dashboard_path, get(pages::dashboard))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), route_guard));

    let api = Router::new()
        .route(
            "/session",
            post(sign_in).delete(sign_out).get(current_session),
        )
        .route("/health", get(health));

    Router::new()
        .merge(api)
        .merge(guarded_pages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html("<!doctype html><html><body><h1>Not found</h1></body></html>"),
    )
}
