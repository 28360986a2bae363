//! Login outcome returned to the presentation layer

use serde::{Deserialize, Serialize};

use crate::directory::RedactedUser;
use crate::errors::Result;

/// `{success, user?, error?}`; `error` is a human-readable message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<RedactedUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginOutcome {
    pub fn succeeded(user: RedactedUser) -> Self {
        LoginOutcome {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        LoginOutcome {
            success: false,
            user: None,
            error: Some(message.into()),
        }
    }
}

impl From<Result<RedactedUser>> for LoginOutcome {
    fn from(result: Result<RedactedUser>) -> Self {
        match result {
            Ok(user) => LoginOutcome::succeeded(user),
            Err(e) => LoginOutcome::failed(e.to_string()),
        }
    }
}
