use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

use super::{
    generators::{PetNameUsernameGenerator, UserIdGenerator, UsernameGenerator, UuidUserIdGenerator},
    listeners::{AuthSubscription, ListenerRegistry},
    models::SessionModel,
    repository::SessionRepository,
    token::TokenConfig,
    types::{AuthState, AuthUser, SessionResponse},
};
use crate::shared::AppError;

/// Identity provider capability consumed by the route guard
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Cached read of the user behind `credential`.
    ///
    /// Returns `None` while the provider has not settled yet; a settled provider
    /// always answers, with [`AuthState::SignedOut`] for missing or invalid credentials.
    fn current_user(&self, credential: Option<&str>) -> Option<AuthState>;

    /// One-shot listener fired with the first settled state for `credential`
    fn subscribe(&self, credential: Option<&str>) -> AuthSubscription;

    /// Anonymous sign-in, returning the credential for the new session
    async fn sign_in(&self) -> Result<SessionResponse, AppError>;

    async fn sign_out(&self, credential: &str) -> Result<(), AppError>;
}

/// In-process identity provider backed by JWT credentials and a session repository
pub struct SessionAuthProvider {
    token_config: TokenConfig,
    repository: Arc<dyn SessionRepository + Send + Sync>,
    username_generator: Arc<dyn UsernameGenerator>,
    user_id_generator: Arc<dyn UserIdGenerator>,
    cache: RwLock<HashMap<String, AuthUser>>, // session_id -> user
    ready: AtomicBool,
    listeners: ListenerRegistry,
}

impl SessionAuthProvider {
    pub fn new(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
    ) -> Self {
        Self::with_generators(
            repository,
            token_config,
            Arc::new(PetNameUsernameGenerator::new()),
            Arc::new(UuidUserIdGenerator::new()),
        )
    }

    pub fn with_generators(
        repository: Arc<dyn SessionRepository + Send + Sync>,
        token_config: TokenConfig,
        username_generator: Arc<dyn UsernameGenerator>,
        user_id_generator: Arc<dyn UserIdGenerator>,
    ) -> Self {
        Self {
            token_config,
            repository,
            username_generator,
            user_id_generator,
            cache: RwLock::new(HashMap::new()),
            ready: AtomicBool::new(false),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Loads unexpired sessions into the cache, settles the provider and wakes waiting listeners
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<usize, AppError> {
        info!("Restoring sessions");

        let expired = self.repository.cleanup_expired_sessions().await?;
        let sessions = self.repository.list_sessions().await?;

        let restored = {
            let mut cache = self.write_cache();
            for session in sessions.iter().filter(|s| !s.is_expired()) {
                cache.insert(session.id.clone(), session.to_user());
            }
            cache.len()
        };

        self.ready.store(true, Ordering::SeqCst);
        let notified = self.listeners.notify_all(|credential| self.resolve(credential));

        info!(
            restored_sessions = restored,
            expired_sessions = expired.len(),
            notified_listeners = notified,
            "Auth provider settled"
        );
        Ok(restored)
    }

    /// Fails every pending listener; used when restoration cannot complete
    pub fn shutdown(&self) -> usize {
        let closed = self.listeners.close_all();
        warn!(closed_listeners = closed, "Auth provider shut down");
        closed
    }

    /// Removes expired sessions from the repository and the cache
    #[instrument(skip(self))]
    pub async fn cleanup_expired_sessions(&self) -> Result<usize, AppError> {
        let expired = self.repository.cleanup_expired_sessions().await?;

        let mut cache = self.write_cache();
        for session_id in &expired {
            cache.remove(session_id);
        }

        debug!(removed_sessions = expired.len(), "Expired sessions evicted");
        Ok(expired.len())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.listener_count()
    }

    pub fn cached_sessions(&self) -> usize {
        self.read_cache().len()
    }

    /// Settled state for a credential; anything that fails validation is signed out
    fn resolve(&self, credential: Option<&str>) -> AuthState {
        let Some(token) = credential else {
            return AuthState::SignedOut;
        };

        let claims = match self.token_config.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Credential rejected");
                return AuthState::SignedOut;
            }
        };

        match self.read_cache().get(&claims.session_id) {
            Some(user) => AuthState::SignedIn(user.clone()),
            None => {
                debug!(session_id = %claims.session_id, "Credential refers to an unknown session");
                AuthState::SignedOut
            }
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, HashMap<String, AuthUser>> {
        self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, HashMap<String, AuthUser>> {
        self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AuthProvider for SessionAuthProvider {
    fn current_user(&self, credential: Option<&str>) -> Option<AuthState> {
        if !self.is_ready() {
            return None;
        }
        Some(self.resolve(credential))
    }

    fn subscribe(&self, credential: Option<&str>) -> AuthSubscription {
        let subscription = self.listeners.register(credential);

        // Settled between the caller's cached read and registration
        if self.is_ready() {
            self.listeners.notify_all(|credential| self.resolve(credential));
        }

        subscription
    }

    #[instrument(skip(self))]
    async fn sign_in(&self) -> Result<SessionResponse, AppError> {
        let username = self.username_generator.generate().await;
        let user_id = self.user_id_generator.generate().await;

        let session = SessionModel::new(
            user_id.clone(),
            username.clone(),
            self.token_config.expiration_days,
        )?;
        self.repository.create_session(&session).await?;

        let token = self
            .token_config
            .create_token(&session.id, &user_id, &username)?;

        self.write_cache().insert(session.id.clone(), session.to_user());

        info!(
            username = %username,
            session_id = %session.id,
            "User signed in"
        );

        Ok(SessionResponse {
            token,
            username,
            user_id,
        })
    }

    #[instrument(skip(self, credential))]
    async fn sign_out(&self, credential: &str) -> Result<(), AppError> {
        let claims = self.token_config.validate_token(credential).map_err(|e| {
            warn!(error = %e, "Sign-out with invalid credential");
            AppError::Unauthorized("Invalid session credential".to_string())
        })?;

        self.repository.delete_session(&claims.session_id).await?;
        self.write_cache().remove(&claims.session_id);

        info!(session_id = %claims.session_id, "User signed out");
        Ok(())
    }
}
