//! Process-wide table of active sessions, keyed by username.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tokio::sync::{Mutex, RwLock};
use untis_config::{CacheConfig, ServiceConfig, UntisConfig};

use crate::error::RpcError;
use crate::session::Session;

/// Handle to a registered session. Every lookup of the same username returns
/// a clone of the same `Arc`, so state changes made through one handle are
/// seen through all of them.
pub type SharedSession = Arc<Mutex<Session>>;

static GLOBAL: OnceLock<ClientRegistry> = OnceLock::new();

/// Username → session table shared between concurrent callers.
#[derive(Debug)]
pub struct ClientRegistry {
    service: ServiceConfig,
    cache: CacheConfig,
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl ClientRegistry {
    /// Registry whose [`Self::create`] builds sessions for `service`.
    #[must_use]
    pub fn new(service: ServiceConfig, cache: CacheConfig) -> Self {
        Self {
            service,
            cache,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: &UntisConfig) -> Self {
        Self::new(config.service.clone(), config.cache.clone())
    }

    /// The process-wide registry. Built from default configuration unless
    /// [`Self::init_global`] ran first.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| Self::new(ServiceConfig::default(), CacheConfig::default()))
    }

    /// Install `registry` as the process-wide instance.
    ///
    /// # Errors
    ///
    /// Hands `registry` back if the global instance already exists.
    pub fn init_global(registry: Self) -> Result<&'static Self, Self> {
        GLOBAL.set(registry)?;
        Ok(Self::global())
    }

    /// Build a fresh unauthenticated session for `username` and register it,
    /// replacing any session already registered under that name.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::Network`] if the HTTP client cannot be built.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SharedSession, RpcError> {
        let session = Session::from_config(&self.service, &self.cache, username, password)?;
        Ok(self.put(session).await)
    }

    /// Register `session` under its username, replacing any previous entry.
    pub async fn put(&self, session: Session) -> SharedSession {
        let username = session.username().to_owned();
        let handle = Arc::new(Mutex::new(session));
        let previous = self
            .sessions
            .write()
            .await
            .insert(username.clone(), Arc::clone(&handle));
        if previous.is_some() {
            tracing::debug!(%username, "replaced registered session");
        }
        handle
    }

    pub async fn get(&self, username: &str) -> Option<SharedSession> {
        self.sessions.read().await.get(username).cloned()
    }

    pub async fn remove(&self, username: &str) -> Option<SharedSession> {
        self.sessions.write().await.remove(username)
    }

    pub async fn contains(&self, username: &str) -> bool {
        self.sessions.read().await.contains_key(username)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Registered usernames, sorted.
    pub async fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
