//! Credential validation against the back-office "who am I" endpoint.
//!
//! The validator is the single authorization decision point for the session
//! core. Its policy is fail-closed: whenever the backend cannot positively
//! confirm the credential - whether it rejects it outright or the call fails
//! in an ambiguous way - the credential is purged and the result is
//! unauthenticated. Access is never granted on an ambiguous outcome.

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::auth::CredentialStore;
use crate::models::{AdminUser, Role};

/// Normalized outcome of a validation round-trip.
///
/// Every failure mode inside the validator collapses into
/// `{valid: false, role: None, user: None}` - no error escapes to the gate.
#[derive(Debug, Clone)]
pub struct Validation {
    pub valid: bool,
    pub role: Option<Role>,
    pub user: Option<AdminUser>,
}

impl Validation {
    fn denied() -> Self {
        Self {
            valid: false,
            role: None,
            user: None,
        }
    }
}

pub struct TokenValidator {
    client: ApiClient,
    store: CredentialStore,
}

impl TokenValidator {
    pub fn new(client: ApiClient, store: CredentialStore) -> Self {
        Self { client, store }
    }

    /// Validate the stored credential with a single backend round-trip.
    ///
    /// - No stored credential: unauthenticated, no network call.
    /// - 2xx: valid, with the role and identity from the response body.
    /// - 401/403: the credential is confirmed dead - purge it.
    /// - Anything else (network error, timeout, malformed body, 5xx): the
    ///   outcome is ambiguous - purge and deny (fail closed).
    ///
    /// No retries; the only side effect is the possible credential purge.
    pub async fn validate(&self) -> Validation {
        let token = match self.store.load() {
            Some(t) => t,
            None => {
                debug!("No stored credential, skipping validation call");
                return Validation::denied();
            }
        };

        match self.client.whoami(&token).await {
            Ok(user) => Validation {
                valid: true,
                role: Some(user.role),
                user: Some(user),
            },
            Err(e) if e.is_credential_rejection() => {
                warn!(error = %e, "Credential rejected by backend, purging");
                self.purge();
                Validation::denied()
            }
            Err(e) => {
                // Fail closed: an unconfirmable credential is a dead credential.
                warn!(error = %e, "Ambiguous validation failure, purging credential");
                self.purge();
                Validation::denied()
            }
        }
    }

    fn purge(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to purge credential");
        }
    }
}
