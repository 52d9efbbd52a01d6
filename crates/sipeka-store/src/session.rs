//! Persistent session backed by the key-value table.

use std::path::Path;
use std::sync::Mutex;

use sipeka_shared::constants::TOKEN_STORAGE_KEY;
use sipeka_shared::{Session, SessionError};

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Keeps the bearer token under [`TOKEN_STORAGE_KEY`] so it survives restarts.
pub struct SqliteSession {
    db: Mutex<Database>,
}

impl SqliteSession {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Open the session stored in `data_dir`.
    pub fn open_in(data_dir: &Path) -> Result<Self> {
        Ok(Self::new(Database::open_in(data_dir)?))
    }

    fn with_db<T>(
        &self,
        f: impl FnOnce(&Database) -> Result<T>,
    ) -> std::result::Result<T, SessionError> {
        let guard = self.db.lock().map_err(|_| SessionError::Poisoned)?;
        f(&guard).map_err(storage_error)
    }
}

fn storage_error(e: StoreError) -> SessionError {
    SessionError::Storage(e.to_string())
}

impl Session for SqliteSession {
    fn token(&self) -> std::result::Result<Option<String>, SessionError> {
        self.with_db(|db| db.get_value(TOKEN_STORAGE_KEY))
            .map(|token| token.filter(|t| !t.is_empty()))
    }

    fn set_token(&self, token: &str) -> std::result::Result<(), SessionError> {
        self.with_db(|db| db.set_value(TOKEN_STORAGE_KEY, token))?;
        tracing::debug!("session token stored");
        Ok(())
    }

    fn clear(&self) -> std::result::Result<(), SessionError> {
        let removed = self.with_db(|db| db.delete_value(TOKEN_STORAGE_KEY))?;
        tracing::debug!(removed, "session token cleared");
        Ok(())
    }
}
