//! Session lifecycle module for protected admin views.
//!
//! This module provides:
//! - `SessionGate`: validates the credential on mount and gates rendering
//! - `InactivityMonitor`: idle-timeout enforcement with a warning countdown
//! - `fsm`: the pure state machine behind the monitor
//! - `Navigator`: the navigation side-effect seam toward the host UI

pub mod fsm;
pub mod gate;
pub mod monitor;

pub use gate::{GateView, SessionGate, SessionState};
pub use monitor::{ActivityKind, InactivityMonitor, MonitorSnapshot};

/// Route of the admin login page. Both the unauthenticated redirect and the
/// forced idle logout land here.
pub const LOGIN_ROUTE: &str = "/admin/login";

/// Navigation seam toward the embedding UI.
///
/// The session core never renders anything itself; when it needs to move the
/// user (unauthenticated mount, idle logout, explicit logout) it asks the
/// host through this trait.
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str);
}
