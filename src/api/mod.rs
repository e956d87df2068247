//! REST API client module for the Haus back-office service.
//!
//! This module provides the `ApiClient` used by the session core to
//! authenticate admins and validate stored bearer tokens against the
//! `/api/auth/me` endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
