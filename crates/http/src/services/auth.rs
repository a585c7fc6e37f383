//! Authentication API service

use crate::client::{ClientError, MarketClient};
use codemarket_core::{LoginResponse, MessageResponse, RegisterRequest, User};
use reqwest::Method;
use serde_json::json;

/// Authentication endpoints under `/auth`
#[derive(Clone)]
pub struct AuthApi {
    client: MarketClient,
}

impl AuthApi {
    pub fn new(client: MarketClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token pair
    ///
    /// The backend takes an OAuth2 password form; `username` may be the
    /// account email or username.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/auth/login")
            .form(&[("username", username), ("password", password)]);
        self.client.execute(request).await
    }

    /// Create an account; the user must verify the email before signing in
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/auth/register")
            .json(request);
        self.client.execute(request).await
    }

    /// Profile of the token holder (never cached)
    pub async fn me(&self) -> Result<User, ClientError> {
        let request = self.client.request(Method::GET, "/auth/me");
        self.client.execute(request).await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        let request = self.client.request(Method::POST, "/auth/logout");
        self.client.execute(request).await
    }

    /// Trade a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/auth/refresh")
            .json(&json!({ "refresh_token": refresh_token }));
        self.client.execute(request).await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/auth/password-reset")
            .json(&json!({ "email": email }));
        self.client.execute(request).await
    }

    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/auth/password-reset/confirm")
            .json(&json!({ "token": token, "new_password": new_password }));
        self.client.execute(request).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse, ClientError> {
        let request = self
            .client
            .request(Method::POST, "/auth/verify-email")
            .json(&json!({ "token": token }));
        self.client.execute(request).await
    }
}
