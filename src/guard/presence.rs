use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::auth::{AuthProvider, AuthState};
use crate::shared::AppError;

/// Auth state for one navigation.
///
/// Uses the provider's cached read when it has settled, otherwise waits for the
/// first auth-state notification for at most `wait`. The subscription is owned
/// by the wait, so it is released on notification, timeout and cancellation alike.
#[instrument(skip(provider, credential), fields(has_credential = credential.is_some()))]
pub async fn resolve_auth_state(
    provider: &dyn AuthProvider,
    credential: Option<&str>,
    wait: Duration,
) -> Result<AuthState, AppError> {
    if let Some(state) = provider.current_user(credential) {
        debug!(signed_in = state.is_signed_in(), "Using cached auth state");
        return Ok(state);
    }

    debug!(wait_ms = wait.as_millis() as u64, "Auth state not settled, waiting for notification");
    let subscription = provider.subscribe(credential);

    match timeout(wait, subscription.first()).await {
        Ok(Ok(state)) => {
            debug!(signed_in = state.is_signed_in(), "Auth state notification received");
            Ok(state)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Auth state notification failed");
            Err(e)
        }
        Err(_) => {
            warn!(wait_ms = wait.as_millis() as u64, "Timed out waiting for auth state");
            Err(AppError::AuthStateTimeout(wait))
        }
    }
}
