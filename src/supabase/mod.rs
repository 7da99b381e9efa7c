//! Supabase — thin HTTP adapter for the hosted Postgres table API and auth.
//!
//! DESIGN
//! ======
//! One `SupabaseClient` wraps a pooled `reqwest::Client`. Table calls go to
//! PostgREST under `/rest/v1`, auth calls to GoTrue under `/auth/v1`. Every
//! request carries the project's anon key as `apikey`; calls made on behalf of
//! a user carry that user's JWT as the bearer so row-level security applies.
//!
//! Auth is exposed through the `AuthGateway` trait so route and service tests
//! can substitute an in-memory implementation.

pub mod auth;
pub mod filter;
pub mod rest;
pub mod types;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::SupabaseConfig;
use types::{AccessToken, AuthSession, AuthUser, SupabaseError, parse_error};

// =============================================================================
// AUTH SEAM
// =============================================================================

#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// Resolve the user behind an access token. `None` when the token is
    /// missing, expired or revoked.
    async fn get_user(&self, token: &AccessToken) -> Result<Option<AuthUser>, SupabaseError>;

    /// Exchange email + password for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError>;

    /// Revoke the session behind an access token.
    async fn sign_out(&self, token: &AccessToken) -> Result<(), SupabaseError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    rest_url: String,
    auth_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request)
            .connect_timeout(config.timeouts.connect)
            .build()
            .map_err(|e| SupabaseError::HttpClientBuild(e.to_string()))?;

        let base = config.url.trim_end_matches('/');
        Ok(Self {
            http,
            rest_url: format!("{base}/rest/v1"),
            auth_url: format!("{base}/auth/v1"),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Start a request with the project key and the caller's bearer token.
    /// Without a session the anon key doubles as the bearer.
    fn request(&self, method: Method, url: &str, token: Option<&AccessToken>) -> RequestBuilder {
        let bearer = token.map_or(self.anon_key.as_str(), AccessToken::as_str);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }
}

/// Send a prepared request, mapping transport failures.
async fn send(request: RequestBuilder) -> Result<Response, SupabaseError> {
    request.send().await.map_err(|e| SupabaseError::Request(e.to_string()))
}

/// Read a response body, failing on non-success status.
async fn read_body(response: Response) -> Result<String, SupabaseError> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| SupabaseError::Request(e.to_string()))?;

    if !(200..300).contains(&status) {
        return Err(parse_error(status, &text));
    }
    Ok(text)
}

/// Read and deserialize a JSON response body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SupabaseError> {
    let text = read_body(response).await?;
    serde_json::from_str(&text).map_err(|e| SupabaseError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
