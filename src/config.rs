use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_COLLECTION: &str = "stats";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .statcard.toml.
///
/// All fields are optional — the tool works with zero config against the
/// public GitHub API. Sharing requires a configured document store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// GitHub API settings
    #[serde(default)]
    pub github: GithubConfig,

    /// Document store settings for shared snapshots
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubConfig {
    /// API base URL. Overridden by the GITHUB_API_URL env var; falls back
    /// to the public endpoint.
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Document store endpoint. Required for `share` and `view`.
    pub base_url: Option<String>,
    /// API key sent with every store request. Never compiled into source.
    pub api_key: Option<String>,
    /// Collection under which snapshots are filed. Defaults to "stats".
    pub collection: Option<String>,
    /// Base URL for generated share links, e.g. "https://statcard.example.com".
    pub share_base: Option<String>,
}

impl Config {
    /// Load configuration from .statcard.toml in the current directory.
    /// Returns default config if the file doesn't exist. Environment
    /// variables override file values: GITHUB_API_URL, STATCARD_STORE_URL,
    /// STATCARD_STORE_API_KEY, STATCARD_SHARE_BASE.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".statcard.toml");
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if let Ok(base) = std::env::var("GITHUB_API_URL") {
            config.github.api_base = Some(base);
        }
        if let Ok(url) = std::env::var("STATCARD_STORE_URL") {
            config.store.base_url = Some(url);
        }
        if let Ok(key) = std::env::var("STATCARD_STORE_API_KEY") {
            config.store.api_key = Some(key);
        }
        if let Ok(base) = std::env::var("STATCARD_SHARE_BASE") {
            config.store.share_base = Some(base);
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }
}

impl GithubConfig {
    /// Resolve the API base URL, falling back to the public endpoint.
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

impl StoreConfig {
    /// Collection name under which snapshots are stored.
    pub fn collection(&self) -> &str {
        self.collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    /// Build a shareable link for a snapshot id, if a share base is configured.
    pub fn share_url(&self, id: &str) -> Option<String> {
        self.share_base
            .as_deref()
            .map(|base| format!("{}/share/{}", base.trim_end_matches('/'), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_base(), "https://api.github.com");
        assert!(config.store.base_url.is_none());
        assert_eq!(config.store.collection(), "stats");
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
api_base = "https://github.internal/api/v3"

[store]
base_url = "https://docs.example.com/v1"
api_key = "k-123"
collection = "cards"
share_base = "https://statcard.example.com/"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.github.api_base(), "https://github.internal/api/v3");
        assert_eq!(config.store.collection(), "cards");
        assert_eq!(
            config.store.share_url("abc123").as_deref(),
            Some("https://statcard.example.com/share/abc123")
        );
    }

    #[test]
    fn test_share_url_requires_share_base() {
        let config = Config::default();
        assert!(config.store.share_url("abc123").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statcard.toml");
        std::fs::write(&path, "[store]\nbase_url = \"https://docs.example.com\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.store.base_url.as_deref(), Some("https://docs.example.com"));
    }
}
