use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::types::AdminError;

use super::store::{MemoryTokenStore, TokenPair, TokenStore};

const EVENT_CAPACITY: usize = 16;

/// Lifecycle notifications for whoever hosts the session (the CLI shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    Refreshed,
    /// Credentials were dropped; the user must log in again.
    LoggedOut { reason: String },
}

/// Holds the token store and serializes access-token refreshes.
pub struct Session {
    store: Arc<dyn TokenStore>,
    refresh_gate: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            refresh_gate: Mutex::new(()),
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn tokens(&self) -> Result<TokenPair, AdminError> {
        self.store.get_tokens()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Held while a refresh is in flight so concurrent callers wait for it.
    pub(crate) fn refresh_gate(&self) -> &Mutex<()> {
        &self.refresh_gate
    }

    pub fn establish(&self, access: &str, refresh: &str) -> Result<(), AdminError> {
        self.store.set_tokens(access, refresh)?;
        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    pub(crate) fn replace_access(&self, access: &str) -> Result<(), AdminError> {
        self.store.set_access(access)?;
        self.emit(SessionEvent::Refreshed);
        Ok(())
    }

    /// Drop both tokens and tell subscribers the session is over.
    pub fn end(&self, reason: &str) {
        info!(reason = %reason, "Closing session");
        if let Err(err) = self.store.clear_tokens() {
            warn!(error = %err, "Failed to clear stored tokens");
        }
        self.emit(SessionEvent::LoggedOut {
            reason: reason.to_string(),
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
