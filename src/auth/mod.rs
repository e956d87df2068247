//! Authentication module for credential storage and validation.
//!
//! This module provides:
//! - `CredentialStore`: persistent storage for the admin bearer token
//! - `TokenValidator`: fail-closed validation against the backend
//! - `introspect`: unverified display-claim reads, kept strictly separate
//!   from the validation path

pub mod introspect;
pub mod store;
pub mod validator;

pub use store::CredentialStore;
pub use validator::{TokenValidator, Validation};
