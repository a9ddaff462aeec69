use routeguard::{
    auth::{start_cleanup_task, InMemorySessionRepository, SessionAuthProvider, TokenConfig},
    build_router, AppConfig, AppState,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routeguard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting route guard server");

    let config = AppConfig::from_env();

    let session_repository = Arc::new(InMemorySessionRepository::new());
    let provider = Arc::new(SessionAuthProvider::new(
        session_repository,
        TokenConfig::from_session_config(&config.session),
    ));

    // Navigations arriving before restore completes wait for it
    let restorer = Arc::clone(&provider);
    tokio::spawn(async move {
        if let Err(e) = restorer.restore().await {
            error!(error = %e, "Session restore failed");
            restorer.shutdown();
        }
    });

    tokio::spawn(start_cleanup_task(
        Arc::clone(&provider),
        config.session.cleanup_interval,
    ));

    let app_state = AppState::new(provider, config.guard.clone())?;
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
