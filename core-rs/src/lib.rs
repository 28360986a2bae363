//! # Portal Core - Edu Portal access layer
//!
//! Role-based access core of the school portal: who may sign in, who is
//! signed in, and which pages each role may open. Five roles share the
//! portal: student, parent, teacher, admin and technician.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   Presentation (dashboards, portal CLI)  │
//! └────────────────────┬─────────────────────┘
//!                      ▼
//!            ┌───────────────────┐
//!            │  AccessController │  per-page guard, redirects
//!            └─────────┬─────────┘
//!                      ▼
//!            ┌───────────────────┐
//!            │   SessionStore    │  currentUser.json + watch channel
//!            └─────────┬─────────┘
//!                      ▼
//!            ┌───────────────────┐
//!            │CredentialValidator│  email + password lookup
//!            └─────────┬─────────┘
//!                      ▼
//!            ┌───────────────────┐
//!            │   UserDirectory   │  immutable, one record per email
//!            └───────────────────┘
//! ```
//!
//! [`PortalContext`] wires these together for one client process.

pub mod access;
pub mod auth;
pub mod compliance;
pub mod config;
pub mod context;
pub mod directory;
pub mod errors;
pub mod rbac;
pub mod session;

pub use access::{
    AccessCheck, AccessController, AccessDecision, AccessPhase, Navigator, RecordingNavigator,
    RouteRule, RouteTable, TracingNavigator, DEFAULT_REDIRECT,
};
pub use auth::{CredentialValidator, LoginOutcome};
pub use compliance::{AuditEntry, AuditLogger};
pub use config::PortalConfig;
pub use context::PortalContext;
pub use directory::{RedactedUser, RoleProfile, UserBase, UserDirectory, UserRecord};
pub use errors::{PortalError, Result};
pub use rbac::{PermissionChecker, Role, RoleSet};
pub use session::{FileStorage, MemoryStorage, SessionStorage, SessionStore, SESSION_STORAGE_KEY};

/// Version of the portal core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
