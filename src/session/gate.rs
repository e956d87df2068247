//! Authorization gate for protected admin views.
//!
//! Every admin page mounts a `SessionGate` around its content. The gate
//! validates the stored credential exactly once per mount, exposes a view
//! state for the embedding UI to render, and owns the inactivity monitor for
//! as long as the session is authorized. Dropping the gate tears the monitor
//! down with it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::auth::{CredentialStore, TokenValidator};
use crate::models::Role;

use super::monitor::{ActivityKind, InactivityMonitor, MonitorSnapshot};
use super::{Navigator, LOGIN_ROUTE};

/// Authorization state of the gate.
///
/// `Checking` is always the initial state; a gate never returns to it. The
/// only transitions are `Checking -> Denied` and `Checking -> Authorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Checking,
    Denied,
    Authorized(Role),
}

/// What the embedding UI should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Validation in flight: loading indicator only, never the children.
    Loading,
    /// Unauthenticated: silent redirect to login, nothing rendered.
    RedirectToLogin,
    /// Authenticated but the role does not satisfy the requirement: a
    /// visible access-denied panel with a way back to login.
    AccessDenied,
    /// Authorized: render the protected children (plus the warning modal
    /// whenever `warning()` returns a snapshot with `show_warning`).
    Content,
}

pub struct SessionGate {
    state: SessionState,
    require_admin: bool,
    client: ApiClient,
    store: CredentialStore,
    navigator: Arc<dyn Navigator>,
    monitor: Option<InactivityMonitor>,
}

impl SessionGate {
    /// Create a gate in the `Checking` state. Admin role is required by
    /// default; relax with [`require_admin`](Self::require_admin).
    pub fn new(client: ApiClient, store: CredentialStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: SessionState::Checking,
            require_admin: true,
            client,
            store,
            navigator,
            monitor: None,
        }
    }

    pub fn require_admin(mut self, require_admin: bool) -> Self {
        self.require_admin = require_admin;
        self
    }

    /// Create the gate and run the authorization check in one step.
    pub async fn mount(
        client: ApiClient,
        store: CredentialStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut gate = Self::new(client, store, navigator);
        gate.check().await;
        gate
    }

    /// Run the credential check and settle the gate's state.
    ///
    /// Validation happens at most once per gate: once the state has left
    /// `Checking`, further calls are no-ops. The inactivity monitor is only
    /// started after authorization is confirmed, never before.
    pub async fn check(&mut self) {
        if self.state != SessionState::Checking {
            debug!("Gate already settled, skipping re-validation");
            return;
        }

        let validator = TokenValidator::new(self.client.clone(), self.store.clone());
        let outcome = validator.validate().await;

        if !outcome.valid {
            self.state = SessionState::Denied;
            debug!("Unauthenticated, redirecting to login");
            self.navigator.redirect(LOGIN_ROUTE);
            return;
        }

        let role = outcome.role.unwrap_or(Role::Unknown);
        self.state = SessionState::Authorized(role);

        if self.role_satisfied(role) {
            info!(role = ?role, "Session authorized, starting inactivity monitor");
            self.monitor = Some(InactivityMonitor::spawn(
                self.store.clone(),
                Arc::clone(&self.navigator),
            ));
        } else {
            // Authenticated but not authorized: a visible denial, not a
            // silent redirect, and no monitor.
            warn!(role = ?role, "Insufficient role for this view");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Rendering decision for the current state. Never errors; every branch
    /// has a defined view.
    pub fn view(&self) -> GateView {
        match self.state {
            SessionState::Checking => GateView::Loading,
            SessionState::Denied => GateView::RedirectToLogin,
            SessionState::Authorized(role) => {
                if self.role_satisfied(role) {
                    GateView::Content
                } else {
                    GateView::AccessDenied
                }
            }
        }
    }

    fn role_satisfied(&self, role: Role) -> bool {
        !self.require_admin || role.is_admin()
    }

    /// Current warning-modal data, when the monitor is running.
    pub fn warning(&self) -> Option<MonitorSnapshot> {
        self.monitor.as_ref().map(|m| m.snapshot())
    }

    pub fn show_warning(&self) -> bool {
        self.monitor.as_ref().is_some_and(|m| m.show_warning())
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.monitor
            .as_ref()
            .map(|m| m.remaining_seconds())
            .unwrap_or(0)
    }

    /// Relay a user-activity signal to the monitor.
    pub fn record_activity(&self, kind: ActivityKind) {
        if let Some(monitor) = &self.monitor {
            monitor.record_activity(kind);
        }
    }

    /// The warning modal's "stay logged in" action.
    pub fn stay_logged_in(&self) {
        if let Some(monitor) = &self.monitor {
            monitor.stay_logged_in();
        }
    }

    /// The shared logout action: tear down the monitor, purge the credential,
    /// redirect to login. Safe to call in any state.
    pub fn logout(&mut self) {
        // Dropping the monitor aborts its timers before the redirect
        self.monitor = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear credential on logout");
        }
        info!("Logged out, redirecting to login");
        self.navigator.redirect(LOGIN_ROUTE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testutil::RecordingNavigator;
    use mockito::Server;
    use tempfile::TempDir;

    fn gate_parts(server: &Server) -> (TempDir, CredentialStore, Arc<RecordingNavigator>, ApiClient) {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().to_path_buf());
        let navigator = Arc::new(RecordingNavigator::default());
        let client = ApiClient::new(server.url()).unwrap();
        (dir, store, navigator, client)
    }

    #[tokio::test]
    async fn test_initial_state_is_checking_with_loading_view() {
        let server = Server::new_async().await;
        let (_dir, store, navigator, client) = gate_parts(&server);

        let gate = SessionGate::new(client, store, navigator);
        assert_eq!(gate.state(), SessionState::Checking);
        assert_eq!(gate.view(), GateView::Loading);
        // Children are never rendered before validation resolves
        assert_ne!(gate.view(), GateView::Content);
    }

    #[tokio::test]
    async fn test_no_credential_denies_without_network_call() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/auth/me")
            .expect(0)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);

        let gate = SessionGate::mount(client, store, navigator.clone()).await;

        m.assert_async().await;
        assert_eq!(gate.state(), SessionState::Denied);
        assert_eq!(gate.view(), GateView::RedirectToLogin);
        assert_eq!(navigator.redirect_count(), 1);
        assert_eq!(navigator.last_route().as_deref(), Some(LOGIN_ROUTE));
    }

    #[tokio::test]
    async fn test_valid_admin_renders_content_and_starts_monitor() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/auth/me")
            .match_header("authorization", "Bearer tok-123")
            .with_status(200)
            .with_body(r#"{"email": "a@b.com", "role": "admin"}"#)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);
        store.save("tok-123").unwrap();

        let gate = SessionGate::mount(client, store.clone(), navigator.clone()).await;

        assert_eq!(gate.state(), SessionState::Authorized(Role::Admin));
        assert_eq!(gate.view(), GateView::Content);
        assert!(gate.warning().is_some(), "monitor should be running");
        assert!(!gate.show_warning());
        assert_eq!(navigator.redirect_count(), 0);
        // A successful mount leaves the credential alone
        assert_eq!(store.load().as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_expired_credential_is_purged_and_redirected() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/auth/me")
            .with_status(401)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);
        store.save("tok-expired").unwrap();

        let gate = SessionGate::mount(client, store.clone(), navigator.clone()).await;

        assert_eq!(gate.state(), SessionState::Denied);
        assert!(store.load().is_none());
        assert_eq!(navigator.last_route().as_deref(), Some("/admin/login"));
    }

    #[tokio::test]
    async fn test_insufficient_role_shows_access_denied_without_monitor() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/auth/me")
            .with_status(200)
            .with_body(r#"{"email": "s@b.com", "role": "staff"}"#)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);
        store.save("tok-staff").unwrap();

        let gate = SessionGate::mount(client, store, navigator.clone()).await;

        assert_eq!(gate.state(), SessionState::Authorized(Role::Staff));
        assert_eq!(gate.view(), GateView::AccessDenied);
        // Visible denial, not a silent redirect; no inactivity monitor
        assert_eq!(navigator.redirect_count(), 0);
        assert!(gate.warning().is_none());
    }

    #[tokio::test]
    async fn test_relaxed_role_requirement_admits_staff() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/auth/me")
            .with_status(200)
            .with_body(r#"{"email": "s@b.com", "role": "staff"}"#)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);
        store.save("tok-staff").unwrap();

        let mut gate = SessionGate::new(client, store, navigator).require_admin(false);
        gate.check().await;

        assert_eq!(gate.view(), GateView::Content);
        assert!(gate.warning().is_some());
    }

    #[tokio::test]
    async fn test_check_runs_at_most_once_per_mount() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/auth/me")
            .with_status(200)
            .with_body(r#"{"email": "a@b.com", "role": "admin"}"#)
            .expect(1)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);
        store.save("tok-123").unwrap();

        let mut gate = SessionGate::mount(client, store, navigator).await;
        gate.check().await;
        gate.check().await;

        m.assert_async().await;
        assert_eq!(gate.state(), SessionState::Authorized(Role::Admin));
    }

    #[tokio::test]
    async fn test_logout_purges_and_redirects() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/auth/me")
            .with_status(200)
            .with_body(r#"{"email": "a@b.com", "role": "admin"}"#)
            .create_async()
            .await;
        let (_dir, store, navigator, client) = gate_parts(&server);
        store.save("tok-123").unwrap();

        let mut gate = SessionGate::mount(client, store.clone(), navigator.clone()).await;
        gate.logout();

        assert!(store.load().is_none());
        assert_eq!(navigator.redirect_count(), 1);
        assert!(gate.warning().is_none(), "monitor torn down on logout");
    }
}
