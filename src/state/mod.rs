/// Game and shot clock arithmetic.
pub mod clock;
/// Session tokens.
pub mod identity;
/// Per-game actors serialising actions and clock ticks.
pub mod live;
/// Scores, fouls, periods and status rules.
pub mod scoreboard;
/// Static sport rule table.
pub mod sport;
mod sse;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::record_store::RecordStore, error::ServiceError};

pub use self::identity::IdentityProvider;
pub use self::live::LiveGameHandle;
pub use self::sse::SseHub;

/// State handle cloned into every handler and background task.
pub type SharedState = Arc<AppState>;

/// Central application state: storage handle, sessions and live games.
pub struct AppState {
    record_store: RwLock<Option<Arc<dyn RecordStore>>>,
    degraded: watch::Sender<bool>,
    config: AppConfig,
    identity: IdentityProvider,
    live_games: DashMap<String, LiveGameHandle>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a record store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            record_store: RwLock::new(None),
            degraded: degraded_tx,
            config,
            identity: IdentityProvider::new(),
            live_games: DashMap::new(),
        })
    }

    /// Obtain a handle to the current record store, if one is installed.
    pub async fn record_store(&self) -> Option<Arc<dyn RecordStore>> {
        let guard = self.record_store.read().await;
        guard.as_ref().cloned()
    }

    /// Record store usable for a request, or [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn RecordStore>, ServiceError> {
        if self.is_degraded() {
            return Err(ServiceError::Degraded);
        }
        self.record_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a record store implementation and leave degraded mode.
    pub async fn set_record_store(&self, store: Arc<dyn RecordStore>) {
        {
            let mut guard = self.record_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update the degraded flag; returns whether it changed.
    pub fn update_degraded(&self, value: bool) -> bool {
        self.degraded.send_replace(value) != value
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Loaded application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session registry.
    pub fn identity(&self) -> &IdentityProvider {
        &self.identity
    }

    /// Registry of running live games keyed by game id.
    pub fn live_games(&self) -> &DashMap<String, LiveGameHandle> {
        &self.live_games
    }
}
