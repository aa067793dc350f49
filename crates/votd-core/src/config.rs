use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

use crate::sources::{DEFAULT_CANONICAL_BASE_URL, DEFAULT_RANDOM_VERSE_URL};
use crate::translation::Translation;

/// Environment variable that supplies the API.Bible credential.
pub const API_KEY_ENV: &str = "BIBLE_API_KEY";

/// API.Bible credential. Never printed; `Debug` shows a placeholder.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        Self(key.trim().to_string())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<ApiKey>,
    pub default_translation: Translation,
    pub request_timeout_secs: u64,
    pub random_verse_url: String,
    pub canonical_base_url: String,
    /// Program and arguments that receive the share message on stdin.
    pub share_command: Option<Vec<String>>,
    /// Link appended to shared verses.
    pub share_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            api_key: None,
            default_translation: Translation::default(),
            request_timeout_secs: 10,
            random_verse_url: DEFAULT_RANDOM_VERSE_URL.to_string(),
            canonical_base_url: DEFAULT_CANONICAL_BASE_URL.to_string(),
            share_command: None,
            share_url: None,
        }
    }

    /// Load `<config_dir>/votd/config.json`, falling back to defaults when it
    /// does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = serde_json::from_str(&config_content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        Ok(config)
    }

    /// Let an environment value take precedence over the file's `api_key`.
    pub fn with_env_api_key(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(ApiKey::new(&key));
        }
        self
    }

    pub fn api_key(&self) -> Result<ApiKey> {
        self.api_key
            .as_ref()
            .map(|k| ApiKey::new(k.expose()))
            .filter(|k| !k.expose().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API.Bible key configured. Set {} or add \"api_key\" to {}",
                    API_KEY_ENV,
                    Self::get_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("votd").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.default_translation, Translation::Web);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.random_verse_url, DEFAULT_RANDOM_VERSE_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"default_translation":"KJV","share_command":["wl-copy"]}}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.default_translation, Translation::Kjv);
        assert_eq!(config.share_command, Some(vec!["wl-copy".to_string()]));
        assert_eq!(config.canonical_base_url, DEFAULT_CANONICAL_BASE_URL);
    }

    #[test]
    fn test_unknown_translation_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_translation":"NIV"}}"#).unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_env_key_overrides_file_key() {
        let mut config = Config::new();
        config.api_key = Some(ApiKey::new("from-file"));

        let config = config.with_env_api_key(Some("from-env".to_string()));
        assert_eq!(config.api_key().unwrap().expose(), "from-env");
    }

    #[test]
    fn test_blank_env_key_is_ignored() {
        let mut config = Config::new();
        config.api_key = Some(ApiKey::new("from-file"));

        let config = config.with_env_api_key(Some("  ".to_string()));
        assert_eq!(config.api_key().unwrap().expose(), "from-file");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let err = Config::new().with_env_api_key(None).api_key().unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn test_api_key_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_key":"abc123"}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.api_key().unwrap().expose(), "abc123");
        assert!(!format!("{:?}", config).contains("abc123"));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("secret-value");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");
        assert!(!format!("{:?}", key).contains("secret"));
    }
}
