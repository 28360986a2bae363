//! Error types for the portal core

use thiserror::Error;

/// Message shown for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Error, Debug)]
pub enum PortalError {
    /// Unknown email, wrong password and empty input all collapse here
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(String),
}

impl PortalError {
    /// True for the only error kind a login attempt can surface to a user
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, PortalError::InvalidCredentials)
    }
}

impl From<regex::Error> for PortalError {
    fn from(err: regex::Error) -> Self {
        PortalError::RegexError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
