//! User Directory
//!
//! Immutable, read-only table of user records keyed by email. The seed
//! directory is built once per process and shared through an `Arc`; a
//! directory can also be loaded from a YAML file:
//!
//! ```yaml
//! users:
//!   - id: "1"
//!     email: eleve@gmail.com
//!     password: eleve1234
//!     role: student
//!     ...
//! ```

pub mod seed;
pub mod user;

pub use seed::seed_users;
pub use user::{
    AdminProfile, ParentProfile, RedactedUser, RoleProfile, StudentProfile, TeacherProfile,
    TechnicianProfile, UserBase, UserRecord,
};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::errors::{PortalError, Result};
use crate::rbac::Role;

static SEED_DIRECTORY: Lazy<Arc<UserDirectory>> =
    Lazy::new(|| Arc::new(UserDirectory::index(seed_users())));

/// On-disk directory file layout
#[derive(Debug, Serialize, Deserialize)]
struct DirectoryFile {
    users: Vec<UserRecord>,
}

/// Read-only user table
#[derive(Debug)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
    by_email: HashMap<String, usize>,
}

impl UserDirectory {
    /// Build a directory, rejecting duplicate emails
    pub fn new(users: Vec<UserRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(users.len());
        for user in &users {
            if !seen.insert(user.email()) {
                return Err(PortalError::Directory(format!(
                    "Duplicate email in directory: {}",
                    user.email()
                )));
            }
        }

        Ok(Self::index(users))
    }

    fn index(users: Vec<UserRecord>) -> Self {
        let by_email = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.email().to_string(), i))
            .collect();

        UserDirectory { users, by_email }
    }

    /// Process-wide seed directory
    pub fn seeded() -> Arc<UserDirectory> {
        Arc::clone(&SEED_DIRECTORY)
    }

    /// Load a directory from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PortalError::Directory(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file: DirectoryFile = serde_yaml::from_str(&content)?;
        let directory = Self::new(file.users)?;

        tracing::debug!(path = %path.display(), users = directory.len(), "user directory loaded");
        Ok(directory)
    }

    /// Exact, case-sensitive email lookup
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.by_email.get(email).map(|&i| &self.users[i])
    }

    pub fn get(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.base.id == id)
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &UserRecord> + '_ {
        self.users.iter().filter(move |u| u.role() == role)
    }

    /// Student records followed by a parent; empty for any other role
    pub fn children_of(&self, parent: &RedactedUser) -> Vec<&UserRecord> {
        match &parent.profile {
            RoleProfile::Parent(profile) => profile
                .children
                .iter()
                .filter_map(|id| self.get(id))
                .filter(|u| u.role() == Role::Student)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
