use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::debug;

use super::types::AuthState;
use crate::shared::AppError;

struct Listener {
    credential: Option<String>,
    sender: oneshot::Sender<AuthState>,
}

type Listeners = Arc<Mutex<HashMap<u64, Listener>>>;

/// Pending one-shot auth-state listeners, keyed by registration id
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    listeners: Listeners,
    next_id: Arc<AtomicU64>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener for `credential`; it is removed again when the subscription drops
    pub fn register(&self, credential: Option<&str>) -> AuthSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();

        lock(&self.listeners).insert(
            id,
            Listener {
                credential: credential.map(str::to_string),
                sender,
            },
        );
        debug!(listener_id = id, "Auth state listener registered");

        AuthSubscription {
            id,
            receiver,
            listeners: Arc::clone(&self.listeners),
        }
    }

    /// Fires every pending listener once with the state `resolve` computes for its credential
    pub fn notify_all<F>(&self, resolve: F) -> usize
    where
        F: Fn(Option<&str>) -> AuthState,
    {
        let drained: Vec<(u64, Listener)> = lock(&self.listeners).drain().collect();
        let count = drained.len();

        for (id, listener) in drained {
            let state = resolve(listener.credential.as_deref());
            if listener.sender.send(state).is_err() {
                debug!(listener_id = id, "Auth state listener went away before notification");
            }
        }

        if count > 0 {
            debug!(notified = count, "Auth state listeners notified");
        }
        count
    }

    /// Drops every pending listener without a notification
    pub fn close_all(&self) -> usize {
        let mut listeners = lock(&self.listeners);
        let count = listeners.len();
        listeners.clear();
        count
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

/// One-shot subscription to the next settled auth state
pub struct AuthSubscription {
    id: u64,
    receiver: oneshot::Receiver<AuthState>,
    listeners: Listeners,
}

impl AuthSubscription {
    /// Waits for the first notification; the listener is released when this returns or is dropped
    pub async fn first(mut self) -> Result<AuthState, AppError> {
        (&mut self.receiver).await.map_err(|_| {
            AppError::ProviderUnavailable("auth state stream closed".to_string())
        })
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if lock(&self.listeners).remove(&self.id).is_some() {
            debug!(listener_id = self.id, "Auth state listener unsubscribed");
        }
    }
}

// Entries are inserted and removed whole, so a poisoned map is still consistent
fn lock(listeners: &Mutex<HashMap<u64, Listener>>) -> MutexGuard<'_, HashMap<u64, Listener>> {
    listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
