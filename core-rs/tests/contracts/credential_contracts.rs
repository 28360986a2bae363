//! Credential Contract Tests
//!
//! These tests verify INVARIANTS of sign-in that MUST NEVER BREAK regardless
//! of how the directory or the validator are reworked.
//!
//! **Problem**: A "helpful" error message or a serialized password leaks account data
//! **Solution**: Contract tests that fail with clear explanation of what's being sacrificed

use portal_core::{
    CredentialValidator, LoginOutcome, MemoryStorage, PortalError, SessionStore, UserDirectory,
};
use std::collections::HashSet;

fn validator() -> CredentialValidator {
    CredentialValidator::new(UserDirectory::seeded())
}

/// WHY: Every directory record must be able to sign in with its own password
/// REASON: The seed accounts are the only way into each role's area
/// BREAKS: A whole role becomes unreachable
/// SACRIFICES: If this fails, you're locking users out
#[tokio::test]
async fn every_record_authenticates() {
    let validator = validator();

    for record in validator.directory().users() {
        let mut store = SessionStore::new(Box::new(MemoryStorage::new()));
        let user = validator
            .authenticate(&mut store, record.email(), &record.password)
            .await
            .unwrap_or_else(|e| panic!("{} failed to sign in: {}", record.email(), e));

        assert_eq!(user, record.redact());
        assert_eq!(store.get_current_user(), Some(user));
    }
}

/// WHY: The authenticated user must never carry a password
/// REASON: The session is persisted in clear text and shown by the CLI
/// BREAKS: Password disclosure through currentUser.json
/// SACRIFICES: If this fails, every password on disk is readable
#[tokio::test]
async fn authenticated_user_has_no_password_field() {
    let validator = validator();

    for record in validator.directory().users() {
        let outcome = validator
            .login(
                &mut SessionStore::new(Box::new(MemoryStorage::new())),
                record.email(),
                &record.password,
            )
            .await;
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], true);
        assert!(json["user"].get("password").is_none(), "{} leaked", record.email());
        assert!(!json.to_string().contains(&record.password));
    }
}

/// WHY: Wrong password and unknown email produce the same error
/// REASON: Distinct messages reveal which emails have accounts
/// BREAKS: Account enumeration becomes possible
/// SACRIFICES: If this fails, you're confirming accounts to attackers
#[tokio::test]
async fn failures_are_indistinguishable() {
    let validator = validator();
    let mut store = SessionStore::new(Box::new(MemoryStorage::new()));

    let wrong_password = validator.login(&mut store, "eleve@gmail.com", "eleve12345").await;
    let unknown_email = validator.login(&mut store, "inconnu@gmail.com", "eleve1234").await;

    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password, LoginOutcome::failed(PortalError::InvalidCredentials.to_string()));
    assert_eq!(wrong_password.error.as_deref(), Some("Invalid email or password"));
    assert!(store.get_current_user().is_none());
}

/// WHY: Email and password comparisons are exact
/// REASON: The directory stores one canonical spelling per account
/// BREAKS: Near-miss credentials would open sessions
/// SACRIFICES: If this fails, you're widening who can sign in
#[test]
fn matching_is_exact() {
    let validator = validator();

    for (email, password) in [
        ("ELEVE@gmail.com", "eleve1234"),
        (" eleve@gmail.com", "eleve1234"),
        ("eleve@gmail.com", "ELEVE1234"),
        ("eleve@gmail.com", "eleve1234 "),
        ("eleve@gmail.com", ""),
        ("", "eleve1234"),
    ] {
        let err = validator.verify(email, password).unwrap_err();
        assert!(err.is_invalid_credentials(), "{:?}/{:?} accepted", email, password);
    }
}

/// WHY: Emails are unique across the directory
/// REASON: Lookup by email must resolve to one record
/// BREAKS: Which account signs in would depend on record order
/// SACRIFICES: If this fails, two people share one login
#[test]
fn directory_emails_are_unique() {
    let directory = UserDirectory::seeded();
    let emails: HashSet<&str> = directory.users().iter().map(|u| u.email()).collect();
    assert_eq!(emails.len(), directory.len());

    let mut users = directory.users().to_vec();
    users.push(users[0].clone());
    assert!(UserDirectory::new(users).is_err());
}
