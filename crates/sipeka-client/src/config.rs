//! Client configuration loaded from environment variables.
//!
//! Everything has a default so the client runs against a local backend with
//! zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use sipeka_shared::constants::{DEFAULT_API_URL, STORAGE_PATH};
use url::Url;

use crate::error::{ClientError, Result};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL, always ending in `/`.
    /// Env: `SIPEKA_API_URL`
    /// Default: `http://127.0.0.1:8000/api`
    pub api_url: Url,

    /// Base URL under which uploaded files are served, always ending in `/`.
    /// Env: `SIPEKA_STORAGE_URL`
    /// Default: `<api origin>/storage`
    pub storage_url: Url,

    /// Directory holding `sipeka.db`.
    /// Env: `SIPEKA_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Where downloaded letters are written.
    /// Env: `SIPEKA_DOWNLOAD_DIR`
    /// Default: the user's download directory, else the data directory.
    pub download_dir: Option<PathBuf>,

    /// Per-request timeout.
    /// Env: `SIPEKA_TIMEOUT_SECS`
    /// Default: none.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        // Checked by `default_api_url_is_a_valid_base`.
        let api_url = parse_base(DEFAULT_API_URL).expect("DEFAULT_API_URL is a valid base URL");
        let storage_url = storage_url_for(&api_url);
        Self {
            api_url,
            storage_url,
            data_dir: None,
            download_dir: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at `api_url`, other settings at their defaults.
    pub fn for_api_url(api_url: &str) -> Result<Self> {
        let api_url = parse_base(api_url)?;
        Ok(Self {
            storage_url: storage_url_for(&api_url),
            api_url,
            ..Self::default()
        })
    }

    /// Point at another API. A storage URL derived from the old API follows
    /// the new one; an explicitly configured one is kept.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let api_url = parse_base(api_url)?;
        if self.storage_url == storage_url_for(&self.api_url) {
            self.storage_url = storage_url_for(&api_url);
        }
        self.api_url = api_url;
        Ok(self)
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("SIPEKA_API_URL") {
            match parse_base(&raw) {
                Ok(url) => {
                    config.storage_url = storage_url_for(&url);
                    config.api_url = url;
                }
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "Invalid SIPEKA_API_URL, using default"
                ),
            }
        }

        if let Some(raw) = lookup("SIPEKA_STORAGE_URL") {
            match parse_base(&raw) {
                Ok(url) => config.storage_url = url,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "Invalid SIPEKA_STORAGE_URL, using default"
                ),
            }
        }

        if let Some(dir) = lookup("SIPEKA_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(dir) = lookup("SIPEKA_DOWNLOAD_DIR").filter(|d| !d.is_empty()) {
            config.download_dir = Some(PathBuf::from(dir));
        }

        if let Some(raw) = lookup("SIPEKA_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(secs) => config.timeout = Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid SIPEKA_TIMEOUT_SECS, using no timeout")
                }
            }
        }

        config
    }

    /// Absolute URL of an API endpoint such as `pengajuan/12`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("bad endpoint '{path}': {e}")))
    }

    /// Public URL of a stored file path as reported in submission details.
    pub fn storage_file_url(&self, stored_path: &str) -> String {
        match self.storage_url.join(stored_path.trim_start_matches('/')) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.storage_url, stored_path.trim_start_matches('/')),
        }
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(sipeka_store::database::default_data_dir()?),
        }
    }

    pub fn resolve_download_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        let user_downloads = directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(PathBuf::from));
        if let Some(dir) = user_downloads {
            return Ok(dir);
        }
        self.resolve_data_dir()
    }
}

fn with_trailing_slash(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(&with_trailing_slash(raw))
        .map_err(|e| ClientError::Config(format!("invalid URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!("'{raw}' is not an http(s) base URL")));
    }
    Ok(url)
}

fn storage_url_for(api_url: &Url) -> Url {
    api_url
        .join(&format!("/{STORAGE_PATH}/"))
        .unwrap_or_else(|_| api_url.clone())
}
