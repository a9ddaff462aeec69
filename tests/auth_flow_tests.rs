use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use std::time::Duration;

use routeguard::AuthState;

mod utils;

use utils::*;

fn set_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_sign_in_then_navigate() {
    let setup = TestSetupBuilder::new().build().await;

    // Signed out: only the public pages are reachable
    NavigationAssertion::new(setup.navigate("/dashboard", None).await).redirected_to("/");
    NavigationAssertion::new(setup.navigate("/login", None).await).allowed();

    let session = setup.sign_in().await;

    NavigationAssertion::new(setup.navigate("/dashboard", Some(&session.token)).await)
        .allowed()
        .body_contains(&session.username)
        .await;
    NavigationAssertion::new(setup.navigate("/login", Some(&session.token)).await)
        .redirected_to("/dashboard");
}

#[tokio::test]
async fn test_sign_out_closes_dashboard() {
    let setup = TestSetupBuilder::new().build().await;
    let session = setup.sign_in().await;

    let response = setup.sign_out(&session.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("session="));

    NavigationAssertion::new(setup.navigate("/dashboard", Some(&session.token)).await)
        .redirected_to("/");
}

#[tokio::test]
async fn test_sign_out_with_dead_credential_clears_cookie() {
    let setup = TestSetupBuilder::new().build().await;
    let session = setup.sign_in().await;

    // Tampered credentials are rejected outright
    let response = setup.sign_out(&format!("{}x", session.token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).contains("Max-Age=0"));

    // A credential whose session is already gone
    assert_eq!(setup.sign_out(&session.token).await.status(), StatusCode::NO_CONTENT);
    let response = setup.sign_out(&session.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(set_cookie(&response).contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_form_lands_on_dashboard() {
    let setup = TestSetupBuilder::new().build().await;

    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap();
    let response = setup.send(request).await;

    let cookie = set_cookie(&response);
    NavigationAssertion::new(response).redirected_to("/dashboard");

    let token = cookie
        .strip_prefix("session=")
        .and_then(|rest| rest.split(';').next())
        .unwrap();
    NavigationAssertion::new(setup.navigate("/dashboard", Some(token)).await).allowed();

    // Signed-in users posting the form again are sent on without a second session
    let request = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::COOKIE, format!("session={}", token))
        .body(Body::empty())
        .unwrap();
    NavigationAssertion::new(setup.send(request).await).redirected_to("/dashboard");
    assert_eq!(setup.session_provider.as_ref().unwrap().cached_sessions(), 1);
}

#[tokio::test]
async fn test_bearer_credential_is_accepted() {
    let setup = TestSetupBuilder::new().build().await;
    let session = setup.sign_in().await;

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {}", session.token))
        .body(Body::empty())
        .unwrap();

    NavigationAssertion::new(setup.send(request).await).allowed();
}

#[tokio::test]
async fn test_tampered_credential_is_signed_out() {
    let setup = TestSetupBuilder::new().build().await;
    let session = setup.sign_in().await;

    let tampered = format!("{}x", session.token);
    NavigationAssertion::new(setup.navigate("/dashboard", Some(&tampered)).await)
        .redirected_to("/");
}

#[tokio::test]
async fn test_navigation_before_restore_waits() {
    let setup = TestSetupBuilder::new()
        .without_restore()
        .with_auth_wait(Duration::from_secs(2))
        .build()
        .await;
    let provider = setup.session_provider.clone().unwrap();

    let restorer = provider.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        restorer.restore().await.unwrap();
    });

    NavigationAssertion::new(setup.navigate("/dashboard", None).await).redirected_to("/");
    assert!(provider.is_ready());
    assert_eq!(provider.listener_count(), 0);
}

#[tokio::test]
async fn test_navigation_before_restore_times_out() {
    let setup = TestSetupBuilder::new()
        .without_restore()
        .with_auth_wait(Duration::from_millis(30))
        .build()
        .await;
    let provider = setup.session_provider.clone().unwrap();

    NavigationAssertion::new(setup.navigate("/", None).await)
        .failed_with(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(provider.listener_count(), 0);
}

#[tokio::test]
async fn test_current_session_reports_state() {
    let setup = TestSetupBuilder::new().build().await;
    let session = setup.sign_in().await;

    let request = Request::builder()
        .uri("/session")
        .header(header::COOKIE, format!("session={}", session.token))
        .body(Body::empty())
        .unwrap();
    let response = setup.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let state: AuthState = serde_json::from_slice(&body).unwrap();

    let user = state.user().unwrap();
    assert_eq!(user.username, session.username);
    assert_eq!(user.user_id, session.user_id);
}
