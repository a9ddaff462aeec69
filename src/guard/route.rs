use serde::Serialize;
use std::collections::HashMap;
use strum_macros::{Display, EnumString};
use tracing::debug;

use super::decision::RedirectTargets;
use crate::config::GuardConfig;
use crate::shared::AppError;

/// How a route reacts to the presence of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Reachable with or without a session
    Public,
    /// Requires a session, signed-out visitors go to the public page
    AuthOnly,
    /// Only for signed-out visitors, signed-in users go to the dashboard
    GuestOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub name: String,
    pub path: String,
    pub class: RouteClass,
}

/// Result of classifying a destination path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// `None` when the path is not registered and the fallback class applied
    pub name: Option<&'a str>,
    pub class: RouteClass,
}

/// Maps destination paths to their route class
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, RouteDefinition>,
    fallback: RouteClass,
}

impl RouteTable {
    pub fn new(fallback: RouteClass) -> Self {
        Self {
            routes: HashMap::new(),
            fallback,
        }
    }

    /// Builds the index / login / dashboard table and checks it for redirect loops.
    ///
    /// Login is registered `GuestOnly`, so signed-out visitors may open it. Every
    /// `AuthOnly` route, unregistered paths included under the default fallback,
    /// still sends them to the public page.
    pub fn from_config(config: &GuardConfig) -> Result<Self, AppError> {
        let paths = [
            &config.public_path,
            &config.login_path,
            &config.dashboard_path,
        ];
        for (i, path) in paths.iter().enumerate() {
            if !path.starts_with('/') {
                return Err(AppError::Config(format!("route path {} must start with /", path)));
            }
            if paths[..i]
                .iter()
                .any(|other| normalize_path(other) == normalize_path(path))
            {
                return Err(AppError::Config(format!("route path {} is used twice", path)));
            }
        }

        let table = Self::new(config.fallback_class)
            .with_route("index", &config.public_path, RouteClass::Public)
            .with_route("login", &config.login_path, RouteClass::GuestOnly)
            .with_route("dashboard", &config.dashboard_path, RouteClass::AuthOnly);

        table.validate(&config.redirects())?;
        debug!(
            routes = table.len(),
            fallback = %table.fallback,
            "Route table built"
        );
        Ok(table)
    }

    pub fn with_route(mut self, name: &str, path: &str, class: RouteClass) -> Self {
        self.register(name, path, class);
        self
    }

    /// Registers a route, replacing any previous registration for the same path
    pub fn register(&mut self, name: &str, path: &str, class: RouteClass) {
        let path = normalize_path(path).to_string();
        debug!(name = %name, path = %path, class = %class, "Registering route");

        self.routes.insert(
            path.clone(),
            RouteDefinition {
                name: name.to_string(),
                path,
                class,
            },
        );
    }

    pub fn classify(&self, path: &str) -> RouteMatch<'_> {
        match self.routes.get(normalize_path(path)) {
            Some(route) => RouteMatch {
                name: Some(route.name.as_str()),
                class: route.class,
            },
            None => RouteMatch {
                name: None,
                class: self.fallback,
            },
        }
    }

    fn len(&self) -> usize {
        self.routes.len()
    }

    /// Rejects tables where a redirect target would send the visitor back to itself
    pub fn validate(&self, targets: &RedirectTargets) -> Result<(), AppError> {
        let public = self.classify(&targets.unauthenticated);
        if public.class == RouteClass::AuthOnly {
            return Err(AppError::Config(format!(
                "public path {} is classified auth_only",
                targets.unauthenticated
            )));
        }

        let dashboard = self.classify(&targets.authenticated);
        if dashboard.class == RouteClass::GuestOnly {
            return Err(AppError::Config(format!(
                "dashboard path {} is classified guest_only",
                targets.authenticated
            )));
        }

        Ok(())
    }
}

/// Strips the query string and trailing slashes, keeping `/` for the root
pub fn normalize_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
