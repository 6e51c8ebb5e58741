pub mod machine;
pub mod session;
mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{config::AppConfig, dao::store::RemoteStore, error::ServiceError};

pub use self::sse::SseHub;
use self::session::ActiveSession;

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;
/// Handle to one session; the mutex serializes guesses, ticks, and
/// finalization for that session.
pub type SharedSession = Arc<Mutex<ActiveSession>>;

/// Default capacity of the SSE broadcast channel.
const SSE_CAPACITY: usize = 32;

/// Central application state: the installed store backend, the session
/// registry, and the SSE hub.
pub struct AppState {
    config: AppConfig,
    store: RwLock<Option<Arc<dyn RemoteStore>>>,
    sse: SseHub,
    // TODO: evict completed sessions after a grace period instead of keeping
    // them for the process lifetime.
    sessions: DashMap<Uuid, SharedSession>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`].
    ///
    /// The application starts in degraded mode until a store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            store: RwLock::new(None),
            sse: SseHub::new(SSE_CAPACITY),
            sessions: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn RemoteStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the store or fail with a degraded-mode error.
    pub async fn require_store(&self) -> Result<Arc<dyn RemoteStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a store backend and leave degraded mode.
    pub async fn set_store(&self, store: Arc<dyn RemoteStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Flip the degraded flag, notifying watchers when the value changes.
    pub fn update_degraded(&self, value: bool) {
        if self.is_degraded() == value {
            return;
        }
        let _ = self.degraded.send(value);
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub for the public SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Register a freshly started session and return its shared handle.
    pub fn insert_session(&self, session: ActiveSession) -> SharedSession {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(id, handle.clone());
        handle
    }

    /// Look up a session handle. The returned `Arc` is cloned out so no map
    /// guard is held across await points.
    pub fn session(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    /// Number of sessions currently registered.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
