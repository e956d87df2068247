//! Session and authorization core for the Haus admin console.
//!
//! The storefront's admin back office (quotations, invoices, products,
//! contacts, settings) sits behind a token-based login. This crate is the
//! piece with actual behavior in that flow, composed of three parts:
//!
//! - [`TokenValidator`]: confirms the stored bearer credential against the
//!   backend's `/api/auth/me` endpoint, failing closed on anything it cannot
//!   positively confirm.
//! - [`InactivityMonitor`]: a 5-minute idle timeout with a 60-second warning
//!   countdown, built as an explicit state machine driven by a tokio task.
//! - [`SessionGate`]: the coordinator a protected view mounts; it validates
//!   once, exposes what to render, and owns the monitor for the session.
//!
//! Rendering, routing tables, and the CRUD screens themselves are the host
//! application's concern; this crate exposes state, snapshots, and callbacks.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use auth::{CredentialStore, TokenValidator, Validation};
pub use config::Config;
pub use models::{AdminUser, Role};
pub use session::{
    ActivityKind, GateView, InactivityMonitor, MonitorSnapshot, Navigator, SessionGate,
    SessionState, LOGIN_ROUTE,
};
