use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::guard::{RedirectTargets, RouteClass};

/// Guard configuration: where redirects point and how long to wait for the provider
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub public_path: String,
    pub login_path: String,
    pub dashboard_path: String,
    /// Class applied to routes missing from the route table
    pub fallback_class: RouteClass,
    pub auth_wait_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            public_path: "/".to_string(),
            login_path: "/login".to_string(),
            dashboard_path: "/dashboard".to_string(),
            fallback_class: RouteClass::AuthOnly,
            auth_wait_timeout: Duration::from_secs(5),
        }
    }
}

impl GuardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Reads settings through `lookup`; absent or unparsable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            public_path: lookup("GUARD_PUBLIC_PATH").unwrap_or(defaults.public_path),
            login_path: lookup("GUARD_LOGIN_PATH").unwrap_or(defaults.login_path),
            dashboard_path: lookup("GUARD_DASHBOARD_PATH").unwrap_or(defaults.dashboard_path),
            fallback_class: parse_with(&lookup, "GUARD_FALLBACK_CLASS")
                .unwrap_or(defaults.fallback_class),
            auth_wait_timeout: parse_with(&lookup, "GUARD_AUTH_WAIT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.auth_wait_timeout),
        }
    }

    pub fn redirects(&self) -> RedirectTargets {
        RedirectTargets {
            unauthenticated: self.public_path.clone(),
            authenticated: self.dashboard_path.clone(),
        }
    }
}

/// Session settings for the in-process identity provider
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub expiration_days: i64,
    pub cleanup_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "your-secret-key-change-in-production".to_string(),
            expiration_days: 7,
            cleanup_interval: Duration::from_secs(30 * 60), // 30 minutes
        }
    }
}

/// Longest session lifetime accepted from the environment
pub const MAX_EXPIRATION_DAYS: i64 = 3650;

impl SessionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Reads settings through `lookup`. Expiration must be 1..=MAX_EXPIRATION_DAYS days
    /// and the cleanup interval at least one second, otherwise the default applies.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            expiration_days: parse_with(&lookup, "SESSION_EXPIRATION_DAYS")
                .filter(|days: &i64| (1..=MAX_EXPIRATION_DAYS).contains(days))
                .unwrap_or(defaults.expiration_days),
            cleanup_interval: parse_with(&lookup, "SESSION_CLEANUP_INTERVAL_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}

/// Top-level configuration for the binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub guard: GuardConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            guard: GuardConfig::from_env(),
            session: SessionConfig::from_env(),
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_with<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = %key, value = %raw, "Ignoring unparsable setting, using default");
            None
        }
    }
}
