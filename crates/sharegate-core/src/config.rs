//! Application configuration management.
//!
//! Configuration is read from `~/.config/sharegate/config.json` when that
//! file exists, then overridden from the environment (a `.env` file in the
//! working directory is loaded first):
//!
//! - `SHAREGATE_BASE_URL`
//! - `SHAREGATE_STORAGE` (`memory`, `file` or `keyring`)
//! - `SHAREGATE_STORAGE_PATH`
//! - `SHAREGATE_REQUEST_TIMEOUT_SECS`

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{FileStorage, KeyValueStorage, KeyringStorage, MemoryStorage};
use crate::controller::{SessionSettings, DEFAULT_LOGOUT_REDIRECT_MS};
use crate::notify::{NotificationTiming, DEFAULT_DISPLAY_MS, DEFAULT_FADE_MS};

/// Application name used for config/data directory paths and the keychain service
const APP_NAME: &str = "sharegate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// File backend storage file name
const STORAGE_FILE: &str = "storage.json";

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// HTTP request timeout in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upper bound for any configured timer (one day)
pub const MAX_TIMER_MS: i64 = 24 * 60 * 60 * 1000;

const ENV_BASE_URL: &str = "SHAREGATE_BASE_URL";
const ENV_STORAGE: &str = "SHAREGATE_STORAGE";
const ENV_STORAGE_PATH: &str = "SHAREGATE_STORAGE_PATH";
const ENV_REQUEST_TIMEOUT: &str = "SHAREGATE_REQUEST_TIMEOUT_SECS";

/// Where the credential slots live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
    Keyring,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "keyring" => Ok(StorageBackend::Keyring),
            other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub storage: StorageBackend,
    /// Overrides the file backend location
    pub storage_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    /// Where logout navigates to
    pub root_path: String,
    pub notification_display_ms: i64,
    pub notification_fade_ms: i64,
    pub logout_redirect_ms: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            storage: StorageBackend::default(),
            storage_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            root_path: "/".to_string(),
            notification_display_ms: DEFAULT_DISPLAY_MS,
            notification_fade_ms: DEFAULT_FADE_MS,
            logout_redirect_ms: DEFAULT_LOGOUT_REDIRECT_MS,
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply `.env` and environment overrides.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config: Self = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `SHAREGATE_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(storage) = lookup(ENV_STORAGE) {
            self.storage = storage
                .parse()
                .with_context(|| format!("Invalid {}", ENV_STORAGE))?;
        }
        if let Some(path) = lookup(ENV_STORAGE_PATH) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_REQUEST_TIMEOUT, secs))?;
        }
        self.validate()
    }

    /// Check that every timer lies in `0..=MAX_TIMER_MS`.
    pub fn validate(&self) -> Result<()> {
        let timers = [
            ("notification_display_ms", self.notification_display_ms),
            ("notification_fade_ms", self.notification_fade_ms),
            ("logout_redirect_ms", self.logout_redirect_ms),
        ];
        for (name, ms) in timers {
            if !(0..=MAX_TIMER_MS).contains(&ms) {
                anyhow::bail!("{} must be between 0 and {}, got {}", name, MAX_TIMER_MS, ms);
            }
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Location of the file storage backend
    pub fn storage_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.storage_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(STORAGE_FILE))
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> Result<Arc<dyn KeyValueStorage>> {
        let storage: Arc<dyn KeyValueStorage> = match self.storage {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            StorageBackend::File => Arc::new(FileStorage::new(self.storage_path()?)),
            StorageBackend::Keyring => Arc::new(KeyringStorage::new(APP_NAME)),
        };
        debug!(backend = ?self.storage, "Opened credential storage");
        Ok(storage)
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_timing(&self) -> NotificationTiming {
        NotificationTiming {
            display: timer(self.notification_display_ms),
            fade: timer(self.notification_fade_ms),
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            root_path: self.root_path.clone(),
            logout_redirect: timer(self.logout_redirect_ms),
            notifications: self.notification_timing(),
        }
    }
}

/// Timer duration, clamped for configs built in code without `validate`
fn timer(ms: i64) -> Duration {
    Duration::milliseconds(ms.clamp(0, MAX_TIMER_MS))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(30));

        let settings = config.session_settings();
        assert_eq!(settings.root_path, "/");
        assert_eq!(settings.logout_redirect, Duration::milliseconds(1000));
        assert_eq!(settings.notifications, NotificationTiming::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let config = Config {
            base_url: "https://share.example.com".to_string(),
            storage: StorageBackend::Keyring,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);

        std::fs::write(&path, r#"{"storage":"memory"}"#).unwrap();
        let partial = Config::load_from(&path).unwrap();
        assert_eq!(partial.storage, StorageBackend::Memory);
        assert_eq!(partial.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "https://files.example.org"),
            (ENV_STORAGE, "Keyring"),
            (ENV_STORAGE_PATH, "/tmp/sharegate.json"),
            (ENV_REQUEST_TIMEOUT, " 5 "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "https://files.example.org");
        assert_eq!(config.storage, StorageBackend::Keyring);
        assert_eq!(config.storage_path().unwrap(), PathBuf::from("/tmp/sharegate.json"));
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_bad_override_is_error() {
        let mut config = Config::default();
        assert!(config
            .apply_overrides(|k| (k == ENV_STORAGE).then(|| "cloud".to_string()))
            .is_err());
        assert!(config
            .apply_overrides(|k| (k == ENV_REQUEST_TIMEOUT).then(|| "soon".to_string()))
            .is_err());
    }

    #[test]
    fn test_out_of_range_timers_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        for contents in [
            r#"{"logout_redirect_ms": 9223372036854775807}"#,
            r#"{"notification_display_ms": 9223372036854775807}"#,
            r#"{"notification_fade_ms": -1}"#,
            r#"{"logout_redirect_ms": -9223372036854775808}"#,
        ] {
            std::fs::write(&path, contents).unwrap();
            let err = Config::load_from(&path).unwrap_err();
            assert!(format!("{:#}", err).contains("must be between 0"), "{}", contents);
        }

        std::fs::write(&path, r#"{"logout_redirect_ms": 0, "notification_fade_ms": 86400000}"#)
            .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.logout_redirect_ms, 0);
        assert_eq!(config.notification_fade_ms, MAX_TIMER_MS);
    }

    #[test]
    fn test_overrides_revalidate_timers() {
        let mut config = Config {
            notification_display_ms: -5,
            ..Config::default()
        };
        assert!(config.apply_overrides(|_| None).is_err());

        config.notification_display_ms = DEFAULT_DISPLAY_MS;
        assert!(config.apply_overrides(|_| None).is_ok());
    }

    #[test]
    fn test_unvalidated_timers_are_clamped() {
        let config = Config {
            notification_display_ms: i64::MAX,
            notification_fade_ms: i64::MIN,
            logout_redirect_ms: -1000,
            ..Config::default()
        };
        let settings = config.session_settings();
        assert_eq!(settings.logout_redirect, Duration::zero());
        assert_eq!(settings.notifications.display, Duration::milliseconds(MAX_TIMER_MS));
        assert_eq!(settings.notifications.fade, Duration::zero());
    }

    #[test]
    fn test_open_file_storage_at_override_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            storage_path: Some(dir.path().join("slots.json")),
            ..Config::default()
        };
        let storage = config.open_storage().unwrap();
        storage.set("token", "abc").unwrap();
        assert!(dir.path().join("slots.json").exists());
    }
}
