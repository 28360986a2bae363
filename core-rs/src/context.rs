//! Application context
//!
//! Owns everything the portal needs for one client process: the user
//! directory, the credential validator, the single session store, the audit
//! trail and the navigator. Built once at start-up, mutated by login and
//! logout, torn down at exit.

use serde_json::json;
use std::sync::Arc;

use crate::access::{AccessCheck, AccessController, Navigator, RouteTable, TracingNavigator};
use crate::auth::{CredentialValidator, LoginOutcome};
use crate::compliance::{operations, AuditLogger};
use crate::config::PortalConfig;
use crate::directory::{RedactedUser, UserDirectory};
use crate::errors::Result;
use crate::rbac::{PermissionChecker, RoleSet};
use crate::session::{FileStorage, SessionStorage, SessionStore};

pub struct PortalContext {
    config: PortalConfig,
    validator: CredentialValidator,
    session: SessionStore,
    audit: Option<AuditLogger>,
    navigator: Arc<dyn Navigator>,
    permissions: PermissionChecker,
}

impl PortalContext {
    /// Start-up: load the directory, open session storage, restore any
    /// persisted session
    pub fn init(config: PortalConfig) -> Result<Self> {
        let directory = match &config.directory {
            Some(path) => Arc::new(UserDirectory::load(path)?),
            None => UserDirectory::seeded(),
        };
        let storage = FileStorage::open(&config.session.storage_dir)?;

        Ok(Self::with_parts(
            config,
            directory,
            Box::new(storage),
            Arc::new(TracingNavigator),
        ))
    }

    /// Assemble a context from explicit parts
    pub fn with_parts(
        config: PortalConfig,
        directory: Arc<UserDirectory>,
        storage: Box<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let validator =
            CredentialValidator::new(directory).with_latency(config.auth.login_latency());
        let session = SessionStore::with_key(storage, &config.session.storage_key);
        let audit = config
            .audit
            .enabled
            .then(|| AuditLogger::new(config.audit.resolved_log_path()));

        tracing::debug!(
            users = validator.directory().len(),
            signed_in = session.is_authenticated(),
            "portal context ready"
        );

        PortalContext {
            config,
            validator,
            session,
            audit,
            navigator,
            permissions: PermissionChecker::new(),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn directory(&self) -> &Arc<UserDirectory> {
        self.validator.directory()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.config.routes
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn current_user(&self) -> Option<RedactedUser> {
        self.session.get_current_user()
    }

    /// Authenticate and open a session
    pub async fn login(&mut self, email: &str, password: &str) -> LoginOutcome {
        let result = self.validator.authenticate(&mut self.session, email, password).await;

        match &result {
            Ok(user) => self.audit(operations::LOGIN, Some(user.id()), json!({
                "email": user.email(),
                "role": user.role(),
            })),
            Err(_) => self.audit(operations::LOGIN_FAILED, None, json!({
                "email": email,
                "password": password,
            })),
        }

        result.into()
    }

    /// End the session
    pub fn logout(&mut self) -> Result<()> {
        let previous = self.session.get_current_user();
        self.session.clear()?;

        if let Some(user) = previous {
            tracing::info!(email = user.email(), "logged out");
            self.audit(operations::LOGOUT, Some(user.id()), json!({ "email": user.email() }));
        }
        Ok(())
    }

    /// Guard for a page path, configured from the route table
    pub fn guard(&self, path: &str) -> AccessController {
        let rule = self.config.routes.rule_for(path);
        AccessController::for_route(&rule, self.session.subscribe(), Arc::clone(&self.navigator))
    }

    /// Guard requiring `roles`, redirecting to the default target
    pub fn access_controller(&self, roles: RoleSet) -> AccessController {
        AccessController::new(self.session.subscribe(), Arc::clone(&self.navigator)).require(roles)
    }

    /// One-shot check of a page, audited when denied
    pub fn check_route(&self, path: &str) -> AccessCheck {
        let mut guard = self.guard(path);
        let check = guard.refresh();

        if !check.is_authorized {
            let user_id = check.user.as_ref().map(|u| u.id().to_string());
            self.audit(operations::ACCESS_DENIED, user_id.as_deref(), json!({
                "path": path,
                "required": guard.required_roles(),
                "redirect": guard.redirect_target(),
            }));
        }

        check
    }

    /// Checker shared by every permission query of this context
    pub fn permissions(&mut self) -> &mut PermissionChecker {
        &mut self.permissions
    }

    /// Whether the signed-in user holds `permission`; false when signed out
    pub fn can(&mut self, permission: &str) -> Result<bool> {
        match self.session.get_current_user() {
            Some(user) => self.permissions.check_permission(&user, permission),
            None => Ok(false),
        }
    }

    /// Where a freshly signed-in user should land
    pub fn landing_page(&self) -> Option<String> {
        self.current_user()
            .map(|user| self.config.routes.landing_for(user.role()))
    }

    /// Shut down; the persisted session stays for the next start
    pub fn teardown(self) {
        tracing::debug!(signed_in = self.session.is_authenticated(), "portal context torn down");
    }

    fn audit(&self, operation: &str, user_id: Option<&str>, data: serde_json::Value) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log_with_redaction(operation, user_id, data) {
                tracing::warn!(operation, error = %e, "audit write failed");
            }
        }
    }
}
