//! RBAC (Role-Based Access Control) module
//!
//! Roles, role sets and permission checking for the portal.

pub mod permission_checker;
pub mod role;

pub use permission_checker::PermissionChecker;
pub use role::{Role, RoleSet};
