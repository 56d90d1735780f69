//! Run configuration, persisted as TOML.
//!
//! ```toml
//! [store]
//! url = "https://vivo.example.edu"
//! email = "vivo_root@example.edu"
//! password = "…"
//!
//! [sync]
//! batch_size = 500
//! on_fetch_failure = "degrade"
//! ```
//!
//! Environment variables `VIVO_URL`, `VIVO_EMAIL`, `VIVO_PASSWORD` and
//! `NGSYNC_BATCH_SIZE` override the file.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::error::{ConfigError, ConfigResult};
use crate::store::HttpStoreConfig;
use crate::sync::FetchFailurePolicy;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Remote store connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// VIVO base URL; query and update endpoints are derived from it.
    #[serde(default)]
    pub url: Option<String>,
    /// Explicit query endpoint, overriding the derived one.
    #[serde(default)]
    pub query_endpoint: Option<String>,
    /// Explicit update endpoint, overriding the derived one.
    #[serde(default)]
    pub update_endpoint: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSettings")
            .field("url", &self.url)
            .field("query_endpoint", &self.query_endpoint)
            .field("update_endpoint", &self.update_endpoint)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sync behavior settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Dispatch batches on a thread pool.
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub on_fetch_failure: FetchFailurePolicy,
    /// Where to dump desired sets before each run. Unset disables dumps.
    #[serde(default)]
    pub audit_dir: Option<PathBuf>,
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE.get()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            query_endpoint: None,
            update_endpoint: None,
            email: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            parallel: false,
            on_fetch_failure: FetchFailurePolicy::default(),
            audit_dir: None,
        }
    }
}

impl SyncSettings {
    pub fn batch_size(&self) -> ConfigResult<NonZeroUsize> {
        NonZeroUsize::new(self.batch_size).ok_or(ConfigError::InvalidBatchSize)
    }
}

impl SyncConfig {
    /// Load a config file. A missing file at the default location is not an
    /// error; see [`SyncConfig::load_or_default`].
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text, &path.display().to_string())
    }

    /// Load `path` if it exists, otherwise start from defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(text: &str, origin: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".into(),
            message: e.to_string(),
        })
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(url) = lookup("VIVO_URL") {
            self.store.url = Some(url);
        }
        if let Some(email) = lookup("VIVO_EMAIL") {
            self.store.email = Some(email);
        }
        if let Some(password) = lookup("VIVO_PASSWORD") {
            self.store.password = Some(password);
        }
        if let Some(size) = lookup("NGSYNC_BATCH_SIZE") {
            self.sync.batch_size = size.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "NGSYNC_BATCH_SIZE".into(),
                message: format!("{e}"),
            })?;
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> ConfigResult<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Check the settings every run needs.
    pub fn validate(&self) -> ConfigResult<()> {
        self.sync.batch_size()?;
        Ok(())
    }

    /// Connection settings for the remote store.
    pub fn http_store(&self) -> ConfigResult<HttpStoreConfig> {
        self.validate()?;
        let store = &self.store;
        let mut config = match (&store.url, &store.query_endpoint, &store.update_endpoint) {
            (_, Some(query), Some(update)) => HttpStoreConfig {
                query_endpoint: query.clone(),
                update_endpoint: update.clone(),
                ..HttpStoreConfig::vivo("")
            },
            (Some(url), query, update) => {
                let mut config = HttpStoreConfig::vivo(url);
                if let Some(query) = query {
                    config.query_endpoint = query.clone();
                }
                if let Some(update) = update {
                    config.update_endpoint = update.clone();
                }
                config
            }
            (None, _, _) => {
                return Err(ConfigError::Missing {
                    key: "store.url (or VIVO_URL)".into(),
                });
            }
        };
        for endpoint in [&config.query_endpoint, &config.update_endpoint] {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "store.url".into(),
                    message: format!("\"{endpoint}\" must start with http:// or https://"),
                });
            }
        }
        match (&store.email, &store.password) {
            (Some(email), Some(password)) => {
                config = config.with_credentials(email.clone(), password.clone());
            }
            (Some(_), None) => {
                return Err(ConfigError::Missing {
                    key: "store.password (or VIVO_PASSWORD)".into(),
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing {
                    key: "store.email (or VIVO_EMAIL)".into(),
                });
            }
            (None, None) => {}
        }
        Ok(config.with_timeout(Duration::from_secs(store.timeout_secs)))
    }
}
