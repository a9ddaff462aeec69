use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::AuthUser;
use crate::shared::AppError;

/// Provider-side record of a signed-in session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionModel {
    pub id: String,       // UUID v4 as string
    pub user_id: String,
    pub username: String, // Auto-generated pet name
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionModel {
    /// Creates a new session model with generated ID and timestamps
    pub fn new(user_id: String, username: String, expiration_days: i64) -> Result<Self, AppError> {
        let now = Utc::now();
        let expires_at = expires_after(now, expiration_days)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            username,
            created_at: now,
            expires_at,
        })
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn to_user(&self) -> AuthUser {
        AuthUser {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            session_id: self.id.clone(),
        }
    }
}

/// `now` plus `days`, or a config error when the result leaves chrono's range
pub fn expires_after(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>, AppError> {
    chrono::Duration::try_days(days)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::Config(format!("session lifetime of {} days is out of range", days)))
}
