//! Permission Checker for portal features
//!
//! Grants come from two places: the defaults of the user's role and, for
//! admins, the explicit patterns on the admin profile. Patterns are either
//! exact (`settings.manage`), wildcards (`grades.*`) or the catch-all `*`.

use regex::Regex;
use std::collections::HashMap;

use crate::directory::{RedactedUser, RoleProfile};
use crate::errors::Result;

/// Permission Checker - resolves and matches permission patterns
#[derive(Debug, Default)]
pub struct PermissionChecker {
    pattern_cache: HashMap<String, Regex>,
}

impl PermissionChecker {
    pub fn new() -> Self {
        PermissionChecker {
            pattern_cache: HashMap::new(),
        }
    }

    /// All permission patterns held by a user
    ///
    /// Inactive accounts hold none.
    pub fn permissions_for(user: &RedactedUser) -> Vec<String> {
        if !user.is_active() {
            return Vec::new();
        }

        let mut perms: Vec<String> = user
            .role()
            .default_permissions()
            .iter()
            .map(|p| p.to_string())
            .collect();

        if let RoleProfile::Admin(profile) = &user.profile {
            for perm in &profile.permissions {
                if !perms.contains(perm) {
                    perms.push(perm.clone());
                }
            }
        }

        perms
    }

    /// Check if user holds a permission
    ///
    /// # Arguments
    /// * `user` - Signed-in user
    /// * `permission` - Permission required (e.g., "grades.edit")
    ///
    /// # Returns
    /// true if permission granted, false otherwise
    pub fn check_permission(&mut self, user: &RedactedUser, permission: &str) -> Result<bool> {
        let user_perms = Self::permissions_for(user);

        if user_perms.iter().any(|p| p == "*") {
            return Ok(true);
        }

        for perm in &user_perms {
            if perm == permission {
                return Ok(true);
            }

            // "grades.*" matches "grades.edit" and "grades.view.own"
            if perm.contains('*') && self.matches_pattern(permission, perm)? {
                return Ok(true);
            }
        }

        tracing::debug!(
            user = user.email(),
            role = %user.role(),
            permission,
            "permission not granted"
        );
        Ok(false)
    }

    /// Number of compiled wildcard patterns held
    pub fn cached_patterns(&self) -> usize {
        self.pattern_cache.len()
    }

    fn matches_pattern(&mut self, value: &str, pattern: &str) -> Result<bool> {
        if !self.pattern_cache.contains_key(pattern) {
            let regex_pattern = regex::escape(pattern).replace("\\*", ".*");
            let regex = Regex::new(&format!("^{}$", regex_pattern))?;
            self.pattern_cache.insert(pattern.to_string(), regex);
        }

        Ok(self
            .pattern_cache
            .get(pattern)
            .map(|re| re.is_match(value))
            .unwrap_or(false))
    }
}
