//! User records
//!
//! A record is a [`UserBase`] shared by every role plus a [`RoleProfile`]
//! tagged by role. On the wire both are flattened into one camelCase object
//! with a `role` discriminator:
//!
//! ```json
//! {"id":"1","email":"eleve@gmail.com","firstName":"Lucas","lastName":"Martin",
//!  "createdAt":"2024-09-01T08:00:00Z","isActive":true,
//!  "role":"student","grade":"3ème","class":"3ème A","studentNumber":"ETU-2024-001"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rbac::Role;

/// Fields every user carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBase {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub grade: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub student_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentProfile {
    /// Ids of the student records this parent follows
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Permission patterns, e.g. `users.*`
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianProfile {
    pub specialization: String,
    #[serde(default)]
    pub work_groups: Vec<String>,
}

/// Role-specific payload; the variant is the user's one role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Student(StudentProfile),
    Parent(ParentProfile),
    Teacher(TeacherProfile),
    Admin(AdminProfile),
    Technician(TechnicianProfile),
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Parent(_) => Role::Parent,
            RoleProfile::Teacher(_) => Role::Teacher,
            RoleProfile::Admin(_) => Role::Admin,
            RoleProfile::Technician(_) => Role::Technician,
        }
    }
}

/// Directory entry, credential included
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub base: UserBase,
    pub password: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl UserRecord {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn email(&self) -> &str {
        &self.base.email
    }

    /// Exact comparison, no normalization
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Copy of the record without its credential
    pub fn redact(&self) -> RedactedUser {
        RedactedUser {
            base: self.base.clone(),
            profile: self.profile.clone(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("base", &self.base)
            .field("password", &"[REDACTED]")
            .field("profile", &self.profile)
            .finish()
    }
}

/// A user as held by the session and shown to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactedUser {
    #[serde(flatten)]
    pub base: UserBase,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl RedactedUser {
    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    pub fn email(&self) -> &str {
        &self.base.email
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.base.first_name, self.base.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.base.is_active
    }
}
