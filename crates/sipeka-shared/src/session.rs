//! The bearer-token capability handed to everything that talks to the API.

use std::sync::Mutex;

use crate::error::SessionError;

/// Where the login token lives between runs.
///
/// Implementations must be safe to share across tasks; the API client holds
/// one behind an `Arc`.
pub trait Session: Send + Sync {
    fn token(&self) -> Result<Option<String>, SessionError>;

    fn set_token(&self, token: &str) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;

    fn is_logged_in(&self) -> Result<bool, SessionError> {
        Ok(self.token()?.is_some())
    }
}

/// In-memory session, forgotten when dropped.
#[derive(Debug, Default)]
pub struct MemorySession {
    token: Mutex<Option<String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl Session for MemorySession {
    fn token(&self) -> Result<Option<String>, SessionError> {
        let guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_logout_lifecycle() {
        let session = MemorySession::new();
        assert!(!session.is_logged_in().unwrap());

        session.set_token("abc|123").unwrap();
        assert_eq!(session.token().unwrap().as_deref(), Some("abc|123"));

        session.clear().unwrap();
        assert_eq!(session.token().unwrap(), None);
    }
}
