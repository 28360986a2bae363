//! Access Controller
//!
//! Decides, per page, whether the current session may see it. Each guarded
//! page owns one controller, which moves through three phases:
//!
//! ```text
//!            ┌──────────────┐
//!            │   Loading    │  initial
//!            └──────┬───────┘
//!        no session │ role not admitted      session present, role admitted
//!            ┌──────▼───────┐                ┌──────────────┐
//!            │ Unauthorized │ ◄────────────► │  Authorized  │
//!            └──────────────┘                └──────────────┘
//!             redirect fired once per entry   no side effect
//! ```
//!
//! The controller never errors. Denial is visible only through
//! `is_authorized == false` and the redirect.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use super::navigator::Navigator;
use super::routes::{RouteRule, DEFAULT_REDIRECT};
use crate::directory::RedactedUser;
use crate::rbac::RoleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessPhase {
    Loading,
    Unauthorized,
    Authorized,
}

/// Allow/deny plus the acting user, computed fresh from the session
#[derive(Debug, Clone, PartialEq)]
pub struct AccessDecision {
    pub authorized: bool,
    pub user: Option<RedactedUser>,
}

impl AccessDecision {
    pub fn evaluate(session: Option<&RedactedUser>, required: &RoleSet) -> Self {
        let authorized = session
            .map(|user| required.admits(user.role()))
            .unwrap_or(false);

        AccessDecision {
            authorized,
            user: session.cloned(),
        }
    }
}

/// What a guarded page renders from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCheck {
    pub user: Option<RedactedUser>,
    pub is_loading: bool,
    pub is_authorized: bool,
}

/// Role guard for one page
pub struct AccessController {
    session: watch::Receiver<Option<RedactedUser>>,
    navigator: Arc<dyn Navigator>,
    required: RoleSet,
    redirect_to: String,
    phase: AccessPhase,
    user: Option<RedactedUser>,
}

impl AccessController {
    /// Unrestricted guard redirecting to `/login`
    pub fn new(
        session: watch::Receiver<Option<RedactedUser>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        AccessController {
            session,
            navigator,
            required: RoleSet::any(),
            redirect_to: DEFAULT_REDIRECT.to_string(),
            phase: AccessPhase::Loading,
            user: None,
        }
    }

    /// Guard configured from a route rule
    pub fn for_route(
        rule: &RouteRule,
        session: watch::Receiver<Option<RedactedUser>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::new(session, navigator)
            .require(rule.roles.clone())
            .redirect_to(rule.redirect_target())
    }

    pub fn require(mut self, roles: RoleSet) -> Self {
        self.required = roles;
        self
    }

    pub fn redirect_to(mut self, path: &str) -> Self {
        self.redirect_to = path.to_string();
        self
    }

    pub fn phase(&self) -> AccessPhase {
        self.phase
    }

    pub fn required_roles(&self) -> &RoleSet {
        &self.required
    }

    pub fn redirect_target(&self) -> &str {
        &self.redirect_to
    }

    /// Current state without re-evaluating
    pub fn state(&self) -> AccessCheck {
        AccessCheck {
            user: self.user.clone(),
            is_loading: self.phase == AccessPhase::Loading,
            is_authorized: self.phase == AccessPhase::Authorized,
        }
    }

    /// Check access for `required_roles` (`None`: any signed-in user)
    ///
    /// Re-evaluates on first use, when the requirement differs from the
    /// previous call, or when the session changed since the last evaluation.
    pub fn check_access(&mut self, required_roles: Option<RoleSet>) -> AccessCheck {
        let required = required_roles.unwrap_or_default();
        let roles_changed = required != self.required;
        self.required = required;

        if self.phase == AccessPhase::Loading || roles_changed || self.session_changed() {
            self.evaluate();
        }

        self.state()
    }

    /// Re-check with the current requirement
    pub fn refresh(&mut self) -> AccessCheck {
        if self.phase == AccessPhase::Loading || self.session_changed() {
            self.evaluate();
        }

        self.state()
    }

    /// Wait for the next session mutation, then re-evaluate
    ///
    /// Returns `None` once the session store is gone.
    pub async fn watch_session(&mut self) -> Option<AccessCheck> {
        if self.session.changed().await.is_err() {
            return None;
        }

        self.evaluate();
        Some(self.state())
    }

    fn session_changed(&self) -> bool {
        self.session.has_changed().unwrap_or(false)
    }

    fn evaluate(&mut self) {
        let session = self.session.borrow_and_update().clone();
        let decision = AccessDecision::evaluate(session.as_ref(), &self.required);

        let next = if decision.authorized {
            AccessPhase::Authorized
        } else {
            AccessPhase::Unauthorized
        };

        tracing::debug!(
            required = %self.required,
            user = decision.user.as_ref().map(|u| u.email()).unwrap_or("-"),
            from = ?self.phase,
            to = ?next,
            "access evaluated"
        );

        let entering_denial =
            next == AccessPhase::Unauthorized && self.phase != AccessPhase::Unauthorized;
        self.phase = next;
        self.user = decision.user;

        if entering_denial {
            self.navigator.redirect(&self.redirect_to);
        }
    }
}
