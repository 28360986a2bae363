//! Route table: which roles each protected page admits, and where to send
//! visitors that do not qualify.
//!
//! Rule paths ending in `/*` cover every page below that prefix; other paths
//! match exactly. When several rules match, the longest path wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::rbac::{Role, RoleSet};

/// Fallback target for unauthenticated or unauthorized visitors
pub const DEFAULT_REDIRECT: &str = "/login";

/// Access rule for one page or page prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    pub path: String,
    /// Empty: any signed-in user
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl RouteRule {
    pub fn new(path: &str, roles: RoleSet) -> Self {
        RouteRule {
            path: path.to_string(),
            roles,
            redirect_to: None,
        }
    }

    pub fn with_redirect(mut self, target: &str) -> Self {
        self.redirect_to = Some(target.to_string());
        self
    }

    pub fn redirect_target(&self) -> &str {
        self.redirect_to.as_deref().unwrap_or(DEFAULT_REDIRECT)
    }

    /// Whether this rule covers `path`
    pub fn matches(&self, path: &str) -> bool {
        match self.path.strip_suffix("/*") {
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .map(|rest| rest.starts_with('/'))
                        .unwrap_or(false)
            }
            None => self.path == path,
        }
    }
}

/// All route rules plus the landing page of each role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub rules: Vec<RouteRule>,
    #[serde(default)]
    pub landing: BTreeMap<Role, String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        let mut rules: Vec<RouteRule> = Role::ALL
            .iter()
            .map(|&role| RouteRule::new(&format!("/{}/*", role.as_str()), RoleSet::only(role)))
            .collect();
        rules.push(RouteRule::new("/profile", RoleSet::any()));
        rules.push(RouteRule::new("/announcements/*", RoleSet::any()));
        rules.push(RouteRule::new(
            "/grades/*",
            RoleSet::from([Role::Student, Role::Parent, Role::Teacher, Role::Admin]),
        ));
        rules.push(
            RouteRule::new("/workgroups/*", RoleSet::from([Role::Technician, Role::Admin]))
                .with_redirect("/unauthorized"),
        );

        let landing = Role::ALL
            .iter()
            .map(|&role| (role, format!("/{}/dashboard", role.as_str())))
            .collect();

        RouteTable { rules, landing }
    }
}

impl RouteTable {
    /// Most specific rule covering `path`
    ///
    /// An exact rule beats any prefix rule; among the rest the longest wins.
    pub fn resolve(&self, path: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(path))
            .max_by_key(|rule| (rule.path == path, rule.path.len()))
    }

    /// Rule for `path`; unlisted paths get an unrestricted rule
    pub fn rule_for(&self, path: &str) -> RouteRule {
        self.resolve(path)
            .cloned()
            .unwrap_or_else(|| RouteRule::new(path, RoleSet::any()))
    }

    /// Page a role lands on after login
    pub fn landing_for(&self, role: Role) -> String {
        self.landing
            .get(&role)
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }
}
