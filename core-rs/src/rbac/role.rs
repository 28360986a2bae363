//! Portal roles and role sets
//!
//! A user holds exactly one [`Role`]. Pages declare the roles they admit as a
//! [`RoleSet`]; an empty set means "any signed-in user".

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::{PortalError, Result};

/// The fixed set of portal roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Parent,
    Teacher,
    Admin,
    Technician,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::Parent,
        Role::Teacher,
        Role::Admin,
        Role::Technician,
    ];

    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
            Role::Technician => "technician",
        }
    }

    /// Parse a role name
    ///
    /// Accepts the wire names plus the French labels used across the portal UI.
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "student" | "eleve" | "élève" => Ok(Role::Student),
            "parent" => Ok(Role::Parent),
            "teacher" | "enseignant" | "professeur" | "prof" => Ok(Role::Teacher),
            "admin" | "administrateur" => Ok(Role::Admin),
            "technician" | "technicien" => Ok(Role::Technician),
            other => Err(PortalError::InvalidRole(other.to_string())),
        }
    }

    /// Permission patterns every holder of this role gets
    ///
    /// Admin grants live on the admin profile itself.
    pub fn default_permissions(&self) -> &'static [&'static str] {
        match self {
            Role::Student => &[
                "grades.view.own",
                "assignments.view",
                "assignments.submit",
                "announcements.view",
                "schedule.view",
            ],
            Role::Parent => &[
                "grades.view.children",
                "assignments.view",
                "announcements.view",
                "schedule.view",
            ],
            Role::Teacher => &[
                "grades.*",
                "assignments.*",
                "announcements.*",
                "courses.view",
                "schedule.view",
            ],
            Role::Admin => &["announcements.*", "schedule.*"],
            Role::Technician => &["workgroups.*", "equipment.*", "announcements.view"],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        Role::parse(s)
    }
}

/// Set of roles admitted by a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// No restriction: any authenticated session passes
    pub fn any() -> Self {
        RoleSet(BTreeSet::new())
    }

    pub fn only(role: Role) -> Self {
        RoleSet(BTreeSet::from([role]))
    }

    /// Parse a comma-separated list such as `"admin,teacher"`
    pub fn parse(list: &str) -> Result<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Role::parse)
            .collect()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a holder of `role` passes this restriction
    pub fn admits(&self, role: Role) -> bool {
        self.is_unrestricted() || self.contains(role)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        RoleSet(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return write!(f, "any");
        }
        let names: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        write!(f, "{}", names.join(","))
    }
}
