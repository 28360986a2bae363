/**
 * config/mod.rs
 * Parser for .portal.yaml files
 *
 * Format:
 * ```yaml
 * apiVersion: portal/v1
 * session:
 *   storageDir: /home/me/.config/edu-portal/session
 *   storageKey: currentUser
 * auth:
 *   loginLatencyMs: 500
 * directory: users.yaml
 * routes:
 *   rules:
 *     - path: /reports
 *       roles: [admin, teacher]
 *       redirectTo: /unauthorized
 *   landing:
 *     admin: /admin/dashboard
 * audit:
 *   enabled: true
 * ```
 *
 * Every section and every field is optional; anything missing takes its
 * default. Rule paths ending in a slash-star suffix cover a whole prefix.
 */

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::access::RouteTable;
use crate::errors::{PortalError, Result};
use crate::session::SESSION_STORAGE_KEY;

/// Config file name looked up by [`PortalConfig::discover`]
pub const CONFIG_FILE_NAME: &str = ".portal.yaml";

pub const API_VERSION: &str = "portal/v1";

/// Base directory for per-user state: `~/.config/edu-portal`
///
/// Falls back to `./.edu-portal` when HOME is not set.
pub fn default_state_dir() -> PathBuf {
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".config").join("edu-portal"),
        Err(_) => PathBuf::from(".edu-portal"),
    }
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

/// Where the session lives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub storage_dir: PathBuf,
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            storage_dir: default_state_dir().join("session"),
            storage_key: SESSION_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    /// Simulated network delay before each login answer
    pub login_latency_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig { login_latency_ms: 500 }
    }
}

impl AuthConfig {
    pub fn login_latency(&self) -> Duration {
        Duration::from_millis(self.login_latency_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditConfig {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            enabled: true,
            log_path: None,
        }
    }
}

impl AuditConfig {
    pub fn resolved_log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| default_state_dir().join("audit.log"))
    }
}

/// .portal.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortalConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// YAML user file; the seed directory is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub routes: RouteTable,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            api_version: default_api_version(),
            session: SessionConfig::default(),
            auth: AuthConfig::default(),
            directory: None,
            routes: RouteTable::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl PortalConfig {
    /// Load from a YAML file
    ///
    /// A relative `directory` path is resolved against the config file's
    /// own directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PortalError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let mut config: PortalConfig = serde_yaml::from_str(&content)?;

        if config.api_version != API_VERSION {
            return Err(PortalError::Config(format!(
                "Unsupported apiVersion '{}' (expected '{}')",
                config.api_version, API_VERSION
            )));
        }

        if let (Some(dir), Some(base)) = (config.directory.as_ref(), path.parent()) {
            if dir.is_relative() {
                config.directory = Some(base.join(dir));
            }
        }

        Ok(config)
    }

    /// Save as YAML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// Read `.portal.yaml` in `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            tracing::debug!(path = %path.display(), "using portal config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
