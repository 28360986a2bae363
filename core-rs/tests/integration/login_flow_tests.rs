//! Integration tests for the complete sign-in lifecycle
//!
//! Tests the full lifecycle of a client session including:
//! - Login against the seed directory
//! - Persistence across a simulated page reload
//! - Logout
//! - Directory loaded from a config-referenced YAML file

use portal_core::{
    CredentialValidator, FileStorage, MemoryStorage, PortalConfig, PortalContext,
    RecordingNavigator, Role, SessionStorage, SessionStore, UserDirectory, SESSION_STORAGE_KEY,
};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn config_in(temp: &TempDir) -> PortalConfig {
    let mut config = PortalConfig::default();
    config.auth.login_latency_ms = 0;
    config.session.storage_dir = temp.path().join("session");
    config.audit.log_path = Some(temp.path().join("audit.log"));
    config
}

#[tokio::test]
async fn test_complete_login_lifecycle() {
    let temp = TempDir::new().unwrap();

    // 1. First start: nobody signed in
    let mut ctx = PortalContext::init(config_in(&temp)).unwrap();
    assert!(ctx.current_user().is_none());

    // 2. Sign in as the student
    let outcome = ctx.login("eleve@gmail.com", "eleve1234").await;
    assert!(outcome.success);
    let user = outcome.user.unwrap();
    assert_eq!(user.role(), Role::Student);
    assert_eq!(ctx.landing_page().as_deref(), Some("/student/dashboard"));
    ctx.teardown();

    // 3. Reload: session restored without re-authenticating
    let ctx = PortalContext::init(config_in(&temp)).unwrap();
    assert_eq!(ctx.current_user(), Some(user));
    ctx.teardown();

    // 4. Logout ends it for good
    let mut ctx = PortalContext::init(config_in(&temp)).unwrap();
    ctx.logout().unwrap();
    ctx.teardown();

    let ctx = PortalContext::init(config_in(&temp)).unwrap();
    assert!(ctx.current_user().is_none());
    assert!(!temp.path().join("session").join("currentUser.json").exists());
}

#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let temp = TempDir::new().unwrap();
    let mut ctx = PortalContext::init(config_in(&temp)).unwrap();

    let outcome = ctx.login("eleve@gmail.com", "wrong").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Invalid email or password"));
    assert!(ctx.current_user().is_none());

    let storage = FileStorage::open(temp.path().join("session")).unwrap();
    assert!(storage.read(SESSION_STORAGE_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_later_login_overwrites_session() {
    let validator = CredentialValidator::new(UserDirectory::seeded());
    let mut store = SessionStore::new(Box::new(MemoryStorage::new()));

    validator.authenticate(&mut store, "eleve@gmail.com", "eleve1234").await.unwrap();
    validator.authenticate(&mut store, "technicien@gmail.com", "tech1234").await.unwrap();

    assert_eq!(store.get_current_user().unwrap().role(), Role::Technician);
}

#[tokio::test]
async fn test_directory_from_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("users.yaml"),
        r#"users:
  - id: "100"
    email: surveillant@college.fr
    password: vie-scolaire
    firstName: Karim
    lastName: Benali
    createdAt: 2024-09-01T07:30:00Z
    isActive: true
    role: admin
    permissions: ["attendance.*"]
    department: Vie scolaire
"#,
    )
    .unwrap();

    let config_path = temp.path().join(".portal.yaml");
    fs::write(
        &config_path,
        format!(
            "directory: users.yaml
auth:
  loginLatencyMs: 0
session:
  storageDir: {}
audit:
  enabled: false
",
            temp.path().join("session").display()
        ),
    )
    .unwrap();

    let config = PortalConfig::discover(temp.path()).unwrap();
    let mut ctx = PortalContext::init(config).unwrap();
    assert_eq!(ctx.directory().len(), 1);

    // Seed accounts do not exist in this directory
    assert!(!ctx.login("eleve@gmail.com", "eleve1234").await.success);

    let outcome = ctx.login("surveillant@college.fr", "vie-scolaire").await;
    assert!(outcome.success);

    let user = ctx.current_user().unwrap();
    assert!(ctx.permissions().check_permission(&user, "attendance.record").unwrap());
    assert!(!ctx.permissions().check_permission(&user, "users.create").unwrap());
}

#[tokio::test]
async fn test_session_shared_between_context_and_guard() {
    let temp = TempDir::new().unwrap();
    let nav = Arc::new(RecordingNavigator::new());
    let mut ctx = PortalContext::with_parts(
        config_in(&temp),
        UserDirectory::seeded(),
        Box::new(MemoryStorage::new()),
        nav.clone(),
    );

    let mut guard = ctx.guard("/teacher/grades");
    assert!(!guard.refresh().is_authorized);

    ctx.login("prof@gmail.com", "prof1234").await;
    let check = guard.watch_session().await.unwrap();
    assert!(check.is_authorized);
    assert_eq!(nav.redirects(), vec!["/login"]);
}
