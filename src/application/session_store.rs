// Session store - Single owner of persisted identity
use crate::domain::route::Route;
use crate::domain::session::{Session, UserProfile};
use std::sync::Arc;
use tokio::sync::watch;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Keyed string persistence that survives restarts.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write all entries in one step
    fn set_entries(&self, entries: &[(&str, &str)]) -> anyhow::Result<()>;

    fn remove_entries(&self, keys: &[&str]) -> anyhow::Result<()>;
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    session: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Load a previously persisted session. Missing or corrupt data means
    /// no session; it is never an error.
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let session = Self::read_persisted(storage.as_ref());
        match &session {
            Some(s) => tracing::info!("Restored session for {}", s.user.name),
            None => tracing::debug!("No persisted session"),
        }
        Self {
            storage,
            session: watch::Sender::new(session),
        }
    }

    fn read_persisted(storage: &dyn SessionStorage) -> Option<Session> {
        let read = |key: &str| match storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read persisted {}: {:#}", key, e);
                None
            }
        };

        let user_json = read(USER_KEY)?;
        let token = read(TOKEN_KEY)?;
        match serde_json::from_str::<UserProfile>(&user_json) {
            Ok(user) => Some(Session::new(user, token)),
            Err(e) => {
                tracing::warn!("Discarding corrupt persisted user: {}", e);
                None
            }
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Record a successful login. Returns the route to transition to.
    pub fn establish(&self, user: UserProfile, token: impl Into<String>) -> Route {
        let session = Session::new(user, token);
        match serde_json::to_string(&session.user) {
            Ok(user_json) => {
                let entries = [(TOKEN_KEY, session.token.as_str()), (USER_KEY, user_json.as_str())];
                if let Err(e) = self.storage.set_entries(&entries) {
                    tracing::warn!("Session will not survive a restart: {:#}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize user profile: {}", e),
        }

        tracing::info!("Session established for {}", session.user.name);
        self.session.send_replace(Some(session));
        Route::Dashboard
    }

    /// Log out. Returns the route to transition to.
    pub fn clear(&self) -> Route {
        if let Err(e) = self.storage.remove_entries(&[TOKEN_KEY, USER_KEY]) {
            tracing::warn!("Failed to remove persisted session: {:#}", e);
        }
        if self.session.send_replace(None).is_some() {
            tracing::info!("Session cleared");
        }
        Route::Login
    }
}
