//! Compliance module: audit trail of authentication and access events
//!
//! Entries are appended as JSON lines. Sensitive fields are replaced with
//! `[REDACTED]` before they reach the disk.
//!
//! # Example
//!
//! ```no_run
//! use portal_core::compliance::AuditLogger;
//! use std::path::PathBuf;
//!
//! let logger = AuditLogger::new(PathBuf::from("/var/lib/portal/audit.log"));
//! let data = serde_json::json!({"email": "eleve@gmail.com"});
//! logger.log_operation("auth.logout", Some("1"), data).unwrap();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::{PortalError, Result};

/// Operation names written by the portal
pub mod operations {
    pub const LOGIN: &str = "auth.login";
    pub const LOGIN_FAILED: &str = "auth.login_failed";
    pub const LOGOUT: &str = "auth.logout";
    pub const ACCESS_DENIED: &str = "access.denied";
}

const SENSITIVE_FIELDS: &[&str] = &["password", "token", "secret", "api_key"];

/// Audit logger for recording portal events
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
    max_log_size: u64, // bytes
}

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub data: JsonValue,
    pub redacted: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf) -> Self {
        Self {
            log_path,
            max_log_size: 10_000_000, // 10MB default
        }
    }

    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_log_size = bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Log an operation as given
    pub fn log_operation(
        &self,
        operation: &str,
        user_id: Option<&str>,
        data: JsonValue,
    ) -> Result<()> {
        self.write_entry(AuditEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            operation: operation.to_string(),
            user_id: user_id.map(|s| s.to_string()),
            data,
            redacted: false,
        })
    }

    /// Log with sensitive data redaction
    pub fn log_with_redaction(
        &self,
        operation: &str,
        user_id: Option<&str>,
        mut data: JsonValue,
    ) -> Result<()> {
        let mut redacted = false;
        if let Some(obj) = data.as_object_mut() {
            for field in SENSITIVE_FIELDS {
                if obj.contains_key(*field) {
                    obj.insert(field.to_string(), JsonValue::String("[REDACTED]".to_string()));
                    redacted = true;
                }
            }
        }

        self.write_entry(AuditEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            operation: operation.to_string(),
            user_id: user_id.map(|s| s.to_string()),
            data,
            redacted,
        })
    }

    /// Rotate log file if it exceeds max size
    pub fn rotate_if_needed(&self) -> Result<bool> {
        if !self.log_path.exists() {
            return Ok(false);
        }

        let metadata = fs::metadata(&self.log_path)
            .map_err(|e| {
                PortalError::Storage(format!("Failed to read audit log metadata: {}", e))
            })?;

        if metadata.len() <= self.max_log_size {
            return Ok(false);
        }

        let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
        let rotated_path = self.log_path.with_extension(format!("log.{}", timestamp));

        fs::rename(&self.log_path, &rotated_path)
            .map_err(|e| PortalError::Storage(format!("Failed to rotate audit log: {}", e)))?;

        tracing::info!(path = %rotated_path.display(), "audit log rotated");
        Ok(true)
    }

    /// All entries currently in the log, oldest first
    ///
    /// Lines that fail to parse are skipped.
    pub fn read_entries(&self) -> Result<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.log_path)?;
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(error = %e, "skipping malformed audit line"),
            }
        }

        Ok(entries)
    }

    fn write_entry(&self, entry: AuditEntry) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| {
                    PortalError::Storage(format!("Failed to create audit directory: {}", e))
                })?;
        }

        self.rotate_if_needed()?;

        let json = serde_json::to_string(&entry)?;

        // JSONL
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| PortalError::Storage(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| PortalError::Storage(format!("Failed to write audit entry: {}", e)))?;

        Ok(())
    }
}
