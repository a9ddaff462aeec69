use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::models::SessionModel;
use crate::shared::AppError;

/// Trait for session repository operations
#[async_trait]
pub trait SessionRepository {
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError>;
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError>;
    async fn list_sessions(&self) -> Result<Vec<SessionModel>, AppError>;
    async fn cleanup_expired_sessions(&self) -> Result<Vec<String>, AppError>;
}

/// In-memory implementation of SessionRepository
///
/// Data is stored in memory and will be lost when the application restarts.
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<String, SessionModel>>,
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SessionModel>>, AppError> {
        self.sessions.lock().map_err(|_| {
            warn!("Session map lock poisoned");
            AppError::Internal
        })
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    #[instrument(skip(self, session))]
    async fn create_session(&self, session: &SessionModel) -> Result<(), AppError> {
        debug!(session_id = %session.id, username = %session.username, "Creating session in memory");

        let mut sessions = self.lock()?;
        if sessions.contains_key(&session.id) {
            warn!(session_id = %session.id, "Session already exists in memory");
            return Err(AppError::Internal);
        }
        sessions.insert(session.id.clone(), session.clone());

        debug!(session_id = %session.id, "Session created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_session(&self, session_id: &str) -> Result<(), AppError> {
        debug!(session_id = %session_id, "Deleting session from memory");

        if self.lock()?.remove(session_id).is_none() {
            warn!(session_id = %session_id, "Session not found for deletion in memory");
            return Err(AppError::NotFound("Session not found".to_string()));
        }

        debug!(session_id = %session_id, "Session deleted successfully from memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_sessions(&self) -> Result<Vec<SessionModel>, AppError> {
        let sessions: Vec<SessionModel> = self.lock()?.values().cloned().collect();
        debug!(count = sessions.len(), "Listed sessions from memory");
        Ok(sessions)
    }

    #[instrument(skip(self))]
    async fn cleanup_expired_sessions(&self) -> Result<Vec<String>, AppError> {
        debug!("Cleaning up expired sessions from memory");

        let mut sessions = self.lock()?;
        let now = Utc::now();

        let expired: Vec<String> = sessions
            .values()
            .filter(|session| session.expires_at <= now)
            .map(|session| session.id.clone())
            .collect();

        for id in &expired {
            sessions.remove(id);
        }

        debug!(
            expired_sessions_removed = expired.len(),
            "Expired sessions cleaned up from memory"
        );
        Ok(expired)
    }
}
