use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{accounts, session};

/// Environment variable that overrides `security.secret_key`.
pub const SECRET_KEY_ENV: &str = "SCANLEDGER_SECRET_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub security: SecurityConfig,

    pub accounts: AccountsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Emit logs as JSON lines instead of human readable text
    pub log_json: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/scanledger.db".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HS256 signing secret for session tokens.
    /// Read once at startup; `SCANLEDGER_SECRET_KEY` takes precedence.
    pub secret_key: String,

    /// Session token lifetime in seconds (default: 3600)
    pub token_ttl_seconds: i64,

    /// PBKDF2-SHA256 iteration count for new password hashes.
    /// Existing hashes keep the count they were created with.
    pub pbkdf2_rounds: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            token_ttl_seconds: session::DEFAULT_TTL_SECONDS,
            pbkdf2_rounds: 600_000,
        }
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("pbkdf2_rounds", &self.pbkdf2_rounds)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Scans granted to a newly registered user
    pub default_scan_quota: i32,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            default_scan_quota: accounts::DEFAULT_SCAN_QUOTA,
        }
    }
}

impl Config {
    /// First existing file on the config search path.
    #[must_use]
    pub fn find_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|path| path.exists())
    }

    /// Load `path`, or defaults when there is none, then apply environment
    /// overrides.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(SECRET_KEY_ENV)
            && !secret.is_empty()
        {
            self.security.secret_key = secret;
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("scanledger").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".scanledger").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default config with a freshly generated secret.
    /// Returns `false` when a config file is already present.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let mut config = Self::default();
            config.security.secret_key = generate_secret_key();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.secret_key.trim().is_empty() {
            anyhow::bail!(
                "security.secret_key is empty; set it in config.toml or via {SECRET_KEY_ENV}"
            );
        }

        if self.security.token_ttl_seconds <= 0 {
            anyhow::bail!("security.token_ttl_seconds must be > 0");
        }

        if self.security.pbkdf2_rounds == 0 {
            anyhow::bail!("security.pbkdf2_rounds must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed max_db_connections");
        }

        Ok(())
    }
}

/// Generate a random 64 character alphanumeric signing secret
#[must_use]
pub fn generate_secret_key() -> String {
    use rand::Rng;

    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
