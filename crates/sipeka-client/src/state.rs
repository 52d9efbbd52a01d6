//! Application state shared by every command.
//!
//! [`AppState`] bundles the API client with the status tracker so that the
//! CLI (or any other front end) can hand one reference to each command.

use std::sync::{Arc, Mutex, PoisonError};

use sipeka_shared::status::StatusTracker;
use sipeka_shared::Session;
use sipeka_store::SqliteSession;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;

pub struct AppState {
    /// HTTP client carrying the injected session.
    pub api: ApiClient,

    /// Last known status per submission, updated by list/detail fetches and
    /// optimistically after a successful submit.
    tracker: Mutex<StatusTracker>,
}

impl AppState {
    pub fn new(config: ClientConfig, session: Arc<dyn Session>) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(config, session)?,
            tracker: Mutex::new(StatusTracker::new()),
        })
    }

    /// State backed by the persistent session in the configured data directory.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let data_dir = config.resolve_data_dir()?;
        let session = SqliteSession::open_in(&data_dir)?;
        Self::new(config, Arc::new(session))
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Run `f` with the tracker locked. Never hold the lock across an await.
    pub fn with_tracker<T>(&self, f: impl FnOnce(&mut StatusTracker) -> T) -> T {
        let mut guard = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
