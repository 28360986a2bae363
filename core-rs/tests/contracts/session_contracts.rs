//! Session Contract Tests
//!
//! These tests verify INVARIANTS of the persisted session that MUST NEVER
//! BREAK. Other clients read `currentUser.json` directly, so its layout is a
//! contract, not an implementation detail.

use portal_core::{FileStorage, SessionStore, UserDirectory, SESSION_STORAGE_KEY};
use std::fs;
use tempfile::TempDir;

fn open(temp: &TempDir) -> SessionStore {
    SessionStore::new(Box::new(FileStorage::open(temp.path()).unwrap()))
}

/// WHY: What is stored is exactly what is read back
/// REASON: Pages render from get_current_user after a reload
/// BREAKS: Dashboards show stale or partial profiles
/// SACRIFICES: If this fails, a reload changes who the user is
#[test]
fn set_then_get_is_identity() {
    let temp = TempDir::new().unwrap();

    for record in UserDirectory::seeded().users() {
        let user = record.redact();
        open(&temp).set_current_user(user.clone()).unwrap();

        assert_eq!(open(&temp).get_current_user(), Some(user));
    }
}

/// WHY: Clearing the session removes it from storage
/// REASON: Logout must survive a restart
/// BREAKS: A signed-out user is signed back in on next start
/// SACRIFICES: If this fails, logout is cosmetic
#[test]
fn clear_removes_persisted_session() {
    let temp = TempDir::new().unwrap();
    let user = UserDirectory::seeded()
        .find_by_email("parent@gmail.com")
        .unwrap()
        .redact();

    let mut store = open(&temp);
    store.set_current_user(user).unwrap();
    store.clear().unwrap();

    assert!(store.get_current_user().is_none());
    assert!(!temp.path().join("currentUser.json").exists());
    assert!(open(&temp).get_current_user().is_none());

    // Clearing twice is fine
    store.clear().unwrap();
}

/// WHY: The session lives in one JSON object under the key "currentUser"
/// REASON: The key and layout are shared with every client of the portal
/// BREAKS: Existing sessions vanish after an upgrade
/// SACRIFICES: If this fails, everyone is signed out
#[test]
fn persisted_layout_is_single_object() {
    let temp = TempDir::new().unwrap();
    let user = UserDirectory::seeded()
        .find_by_email("eleve@gmail.com")
        .unwrap()
        .redact();
    open(&temp).set_current_user(user).unwrap();

    assert_eq!(SESSION_STORAGE_KEY, "currentUser");
    let files: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files, vec!["currentUser.json"]);

    let raw = fs::read_to_string(temp.path().join("currentUser.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object["email"], "eleve@gmail.com");
    assert_eq!(object["role"], "student");
    assert_eq!(object["firstName"], "Lucas");
    assert_eq!(object["class"], "3ème A");
    assert!(!object.contains_key("password"));
}

/// WHY: Sessions have no expiry
/// REASON: The portal has no server to refresh tokens against
/// BREAKS: Users signed out at random after an added TTL
/// SACRIFICES: If this fails, someone added expiry metadata to the record
#[test]
fn session_carries_no_expiry() {
    let temp = TempDir::new().unwrap();
    let user = UserDirectory::seeded()
        .find_by_email("technicien@gmail.com")
        .unwrap()
        .redact();
    open(&temp).set_current_user(user).unwrap();

    let raw = fs::read_to_string(temp.path().join("currentUser.json")).unwrap();
    for field in ["expiresAt", "expires", "ttl", "token"] {
        assert!(!raw.contains(field), "unexpected {} in session", field);
    }
}
