//! GoTrue auth calls.

use reqwest::Method;

use super::types::{AccessToken, AuthSession, AuthUser, SupabaseError};
use super::{AuthGateway, SupabaseClient, read_body, read_json, send};

#[derive(serde::Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait::async_trait]
impl AuthGateway for SupabaseClient {
    async fn get_user(&self, token: &AccessToken) -> Result<Option<AuthUser>, SupabaseError> {
        let url = format!("{}/user", self.auth_url);
        let response = send(self.request(Method::GET, &url, Some(token))).await?;

        match response.status().as_u16() {
            401 | 403 => Ok(None),
            _ => read_json(response).await.map(Some),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let url = format!("{}/token", self.auth_url);
        let request = self
            .request(Method::POST, &url, None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        read_json(send(request).await?).await
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), SupabaseError> {
        let url = format!("{}/logout", self.auth_url);
        let response = send(self.request(Method::POST, &url, Some(token))).await?;

        // An already-expired session is as signed out as it gets.
        if response.status().as_u16() == 401 {
            return Ok(());
        }
        read_body(response).await?;
        Ok(())
    }
}
