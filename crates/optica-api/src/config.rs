//! # Admin Configuration
//!
//! Configuration for the admin client: where the API lives, how long an
//! idle session survives, and how the store presents itself.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     OPTICA_API_URL=https://api.otica.com.br                            │
//! │     OPTICA_IDLE_TIMEOUT_MINS=30                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/optica/admin.toml (Linux)                                │
//! │     ~/Library/Application Support/optica/admin.toml (macOS)            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8080/api, 30s timeout, 15 min idle                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # admin.toml
//! [api]
//! base_url = "https://api.otica.com.br"
//! timeout_secs = 30
//!
//! [session]
//! idle_timeout_mins = 15
//! # token_path = "/var/lib/optica/session.json"
//!
//! [store]
//! name = "Ótica Central"
//! currency_symbol = "R$"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use optica_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::token_store::FileTokenStore;

// =============================================================================
// API Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Minutes without a request before the operator is logged out.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_mins: u64,

    /// Where the token is kept between runs. Defaults to the platform
    /// data directory.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_idle_timeout() -> u64 {
    15
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            idle_timeout_mins: default_idle_timeout(),
            token_path: None,
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Optica".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Admin Configuration
// =============================================================================

/// Complete configuration of the admin client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub store: StoreSettings,
}

impl AdminConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Read the TOML file (explicit path or the default location) if it exists
    /// 3. Apply environment variable overrides
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_path) {
            if path.exists() {
                info!(?path, "Loading admin config from file");
                config = Self::read_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> ApiResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&contents).map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))
    }

    /// `admin.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "optica").map(|dirs| dirs.config_dir().join("admin.toml"))
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: &Path) -> ApiResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::Config(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(path, self.to_toml()?)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))?;
        info!(?path, "Admin config saved");
        Ok(())
    }

    pub fn to_toml(&self) -> ApiResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApiError::Config(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        let url = self.api.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ApiError::Config("Request timeout must be at least 1 second".into()));
        }
        if self.session.idle_timeout_mins == 0 {
            return Err(ApiError::Config("Idle timeout must be at least 1 minute".into()));
        }
        Ok(())
    }

    /// Applies `OPTICA_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable numbers are
    /// ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("OPTICA_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(secs) = lookup("OPTICA_API_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.api.timeout_secs = secs;
        }

        if let Some(mins) = lookup("OPTICA_IDLE_TIMEOUT_MINS").and_then(|v| v.trim().parse().ok()) {
            debug!(mins, "Overriding idle timeout from environment");
            self.session.idle_timeout_mins = mins;
        }

        if let Some(path) = lookup("OPTICA_TOKEN_PATH") {
            self.session.token_path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("OPTICA_STORE_NAME") {
            self.store.name = name;
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session.idle_timeout_mins * 60)
    }

    /// Configured token path, or the platform default.
    pub fn token_path(&self) -> Option<PathBuf> {
        self.session
            .token_path
            .clone()
            .or_else(FileTokenStore::default_path)
    }

    /// Renders an amount with the store's currency symbol (`R$ 1,250.00`).
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let cents = amount.cents().unsigned_abs();
        let major = (cents / 100).to_string();

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!("{sign}{} {grouped}.{:02}", self.store.currency_symbol, cents % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AdminConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.idle_timeout(), Duration::from_secs(15 * 60));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_validation() {
        let mut config = AdminConfig::default();
        config.api.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://api.otica.com.br/".into();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "https://api.otica.com.br");

        config.session.idle_timeout_mins = 0;
        assert!(config.validate().is_err());

        config.session.idle_timeout_mins = 5;
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AdminConfig = toml::from_str(
            r#"
            [store]
            name = "Ótica Central"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.name, "Ótica Central");
        assert_eq!(config.store.currency_symbol, "R$");
        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("OPTICA_API_URL", "https://staging.otica.com.br"),
            ("OPTICA_IDLE_TIMEOUT_MINS", "30"),
            ("OPTICA_API_TIMEOUT_SECS", "soon"),
            ("OPTICA_TOKEN_PATH", "/tmp/optica/session.json"),
        ]
        .into_iter()
        .collect();

        let mut config = AdminConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url(), "https://staging.otica.com.br");
        assert_eq!(config.session.idle_timeout_mins, 30);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.token_path(), Some(PathBuf::from("/tmp/optica/session.json")));
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin.toml");

        let mut config = AdminConfig::default();
        config.store.name = "Ótica Norte".into();
        config.session.idle_timeout_mins = 20;
        config.save(&path).unwrap();

        let loaded = AdminConfig::read_file(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::write(&path, "[api]\nbase_url = 12").unwrap();
        assert!(matches!(AdminConfig::read_file(&path), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_format_currency() {
        let config = AdminConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(125_000)), "R$ 1,250.00");
        assert_eq!(config.format_currency(Money::from_cents(5)), "R$ 0.05");
        assert_eq!(config.format_currency(Money::from_cents(-123_456_789)), "-R$ 1,234,567.89");
    }
}
