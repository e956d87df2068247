//! HTTP client for the Haus back-office API.
//!
//! This module provides the `ApiClient` struct for the authentication
//! endpoints the session core depends on: admin login and the "who am I"
//! credential check. All other back-office endpoints (quotations, invoices,
//! products) are consumed elsewhere and are out of scope here.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AdminUser;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// The auth check gates every admin page load, so fail fast rather than
/// leaving the user on a spinner.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Path of the credential-validation ("who am I") endpoint.
const AUTH_ME_PATH: &str = "/api/auth/me";

/// Path of the admin login endpoint.
const AUTH_LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// API client for the back-office auth endpoints.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given backend base URL
    /// (e.g. `https://shop.example.com` or `http://localhost:8001`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticate an admin user and return the bearer token issued by the
    /// backend. The caller decides whether to persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, AUTH_LOGIN_PATH);
        debug!(url = %url, "Sending login request");

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        let parsed: LoginResponse = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Bad login response: {}", e)))?;

        Ok(parsed.token)
    }

    /// Ask the backend who the given bearer token belongs to.
    ///
    /// Returns the identity and role on 2xx. 401/403 surface as
    /// `ApiError::Unauthorized` / `ApiError::Forbidden`; the caller
    /// (`TokenValidator`) owns the decision of what to do with the stored
    /// credential in each case.
    pub async fn whoami(&self, token: &str) -> Result<AdminUser, ApiError> {
        let url = format!("{}{}", self.base_url, AUTH_ME_PATH);
        debug!(url = %url, "Validating token with backend");

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        let user: AdminUser = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Bad auth/me response: {}", e)))?;

        debug!(email = %user.email, role = ?user.role, "Token valid");
        Ok(user)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}
