//! Directory configuration and backend selection.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the user directory.
///
/// The remote record store is used only when both its URL and access key are
/// present and valid-looking. Otherwise the local fallback is used.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub remote: RemoteStoreConfig,
    #[serde(default)]
    pub local: LocalStoreConfig,
    /// bcrypt cost factor for password hashes
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            remote: RemoteStoreConfig::default(),
            local: LocalStoreConfig::default(),
            password_cost: default_password_cost(),
        }
    }
}

/// Remote record store credentials (PostgREST-style table API).
#[derive(Clone, Deserialize)]
pub struct RemoteStoreConfig {
    /// Project endpoint, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,
    /// Access key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteStoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for RemoteStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStoreConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalStoreConfig {
    /// SQLite database path (`:memory:` for a throwaway store)
    #[serde(default = "default_local_path")]
    pub path: String,
}

impl Default for LocalStoreConfig {
    fn default() -> Self {
        Self {
            path: default_local_path(),
        }
    }
}

/// Which backend the directory talks to. Decided once at construction.
#[derive(Clone, PartialEq)]
pub enum StoreSelection {
    Remote {
        base_url: String,
        api_key: String,
        timeout: Duration,
    },
    Local {
        path: String,
    },
}

impl std::fmt::Debug for StoreSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreSelection::Remote { base_url, timeout, .. } => f
                .debug_struct("Remote")
                .field("base_url", base_url)
                .field("timeout", timeout)
                .finish_non_exhaustive(),
            StoreSelection::Local { path } => f.debug_struct("Local").field("path", path).finish(),
        }
    }
}

// Default values
fn default_password_cost() -> u32 {
    bcrypt::DEFAULT_COST
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_local_path() -> String {
    "./data/directory.db".to_string()
}

impl DirectoryConfig {
    /// Pick the backend from the configured credentials.
    pub fn selection(&self) -> StoreSelection {
        let url = self.remote.url.as_deref().map(str::trim).unwrap_or_default();
        let api_key = self.remote.api_key.as_deref().map(str::trim).unwrap_or_default();

        if url.is_empty() || api_key.is_empty() {
            if !url.is_empty() || !api_key.is_empty() {
                tracing::warn!("Remote store partially configured (need both url and api_key), using local fallback");
            }
            return self.local_selection();
        }

        match reqwest::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => StoreSelection::Remote {
                base_url: url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
                timeout: Duration::from_secs(self.remote.timeout_secs.max(1)),
            },
            _ => {
                tracing::warn!("Remote store url '{}' is not a valid http(s) URL, using local fallback", url);
                self.local_selection()
            }
        }
    }

    fn local_selection(&self) -> StoreSelection {
        StoreSelection::Local {
            path: self.local.path.clone(),
        }
    }
}
