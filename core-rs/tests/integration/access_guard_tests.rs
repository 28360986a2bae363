//! Integration tests for page guards
//!
//! Drives the access controller through the route table and the session
//! store the way a page would: mount, render, react to login and logout.

use portal_core::{
    AccessController, AccessPhase, MemoryStorage, PortalConfig, PortalContext, RecordingNavigator,
    Role, RoleSet, RouteRule, SessionStore, UserDirectory,
};
use std::sync::Arc;
use tempfile::TempDir;

fn context(temp: &TempDir) -> (PortalContext, Arc<RecordingNavigator>) {
    let mut config = PortalConfig::default();
    config.auth.login_latency_ms = 0;
    config.session.storage_dir = temp.path().join("session");
    config.audit.enabled = false;

    let nav = Arc::new(RecordingNavigator::new());
    let ctx = PortalContext::with_parts(
        config,
        UserDirectory::seeded(),
        Box::new(MemoryStorage::new()),
        nav.clone(),
    );
    (ctx, nav)
}

#[tokio::test]
async fn test_each_role_reaches_only_its_own_area() {
    for record in UserDirectory::seeded().users() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, _nav) = context(&temp);
        assert!(ctx.login(record.email(), &record.password).await.success);

        for area in Role::ALL {
            let path = format!("/{}/dashboard", area.as_str());
            let check = ctx.check_route(&path);
            assert_eq!(
                check.is_authorized,
                area == record.role(),
                "{} on {}",
                record.email(),
                path
            );
        }

        // Shared pages admit everybody signed in
        assert!(ctx.check_route("/profile").is_authorized);
        assert!(ctx.check_route("/announcements/rentree").is_authorized);
    }
}

#[tokio::test]
async fn test_route_specific_redirect_target() {
    let temp = TempDir::new().unwrap();
    let (mut ctx, nav) = context(&temp);
    ctx.login("parent@gmail.com", "parent1234").await;

    assert!(ctx.check_route("/grades/lucas").is_authorized);
    assert!(!ctx.check_route("/workgroups/maintenance").is_authorized);
    assert_eq!(nav.redirects(), vec!["/unauthorized"]);
}

#[test]
fn test_anonymous_visitor_sent_to_login() {
    let temp = TempDir::new().unwrap();
    let (ctx, nav) = context(&temp);

    for path in ["/admin/users", "/profile", "/help"] {
        let check = ctx.check_route(path);
        assert!(!check.is_authorized);
        assert!(!check.is_loading);
        assert!(check.user.is_none());
    }
    assert_eq!(nav.redirects(), vec!["/login", "/login", "/login"]);
}

#[tokio::test]
async fn test_custom_route_rules_from_config() {
    let temp = TempDir::new().unwrap();
    let mut config = PortalConfig::default();
    config.auth.login_latency_ms = 0;
    config.audit.enabled = false;
    config.session.storage_dir = temp.path().join("session");
    config.routes.rules.push(
        RouteRule::new("/admin/reports/*", RoleSet::from([Role::Admin, Role::Teacher]))
            .with_redirect("/teacher/dashboard"),
    );

    let nav = Arc::new(RecordingNavigator::new());
    let mut ctx = PortalContext::with_parts(
        config,
        UserDirectory::seeded(),
        Box::new(MemoryStorage::new()),
        nav.clone(),
    );
    ctx.login("prof@gmail.com", "prof1234").await;

    assert!(ctx.check_route("/admin/reports/trimestre-1").is_authorized);
    assert!(!ctx.check_route("/admin/users").is_authorized);
    assert_eq!(nav.last().as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_mounted_page_follows_login_and_logout() {
    let mut store = SessionStore::new(Box::new(MemoryStorage::new()));
    let nav = Arc::new(RecordingNavigator::new());
    let directory = UserDirectory::seeded();

    let mut page = AccessController::new(store.subscribe(), nav.clone())
        .require(RoleSet::only(Role::Admin))
        .redirect_to("/login?next=/admin");

    assert_eq!(page.phase(), AccessPhase::Loading);
    assert!(!page.refresh().is_authorized);
    assert_eq!(page.phase(), AccessPhase::Unauthorized);

    let admin = directory.find_by_email("admin@gmail.com").unwrap().redact();
    store.set_current_user(admin).unwrap();
    assert!(page.watch_session().await.unwrap().is_authorized);
    assert_eq!(page.phase(), AccessPhase::Authorized);

    store.clear().unwrap();
    assert!(!page.watch_session().await.unwrap().is_authorized);

    assert_eq!(nav.redirects(), vec!["/login?next=/admin", "/login?next=/admin"]);
}
