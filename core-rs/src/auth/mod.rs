//! Authentication
//!
//! [`CredentialValidator`] checks credentials against the user directory and
//! opens the session; [`LoginOutcome`] is what the login page consumes.

pub mod outcome;
pub mod validator;

pub use outcome::LoginOutcome;
pub use validator::CredentialValidator;
