//! Authentication Module
//!
//! HTTP client functions for login and registration. A successful call
//! yields the bearer token the [`HttpBackend`](crate::client::api::HttpBackend)
//! attaches to every trip request.

use crate::client::api::{ApiError, ApiResult};
use crate::client::config::Config;
use crate::client::types::{AuthResponse, LoginRequest, RegisterRequest};
use reqwest::Client;

/// Log in with email and password
pub async fn login(config: &Config, email: String, password: String) -> ApiResult<AuthResponse> {
    let request = LoginRequest { email, password };
    post_auth(config, "/api/auth/login", &request).await
}

/// Register a new account
pub async fn register(
    config: &Config,
    email: String,
    password: String,
    display_name: Option<String>,
) -> ApiResult<AuthResponse> {
    let request = RegisterRequest {
        email,
        password,
        display_name,
    };
    post_auth(config, "/api/auth/register", &request).await
}

async fn post_auth<T: serde::Serialize>(
    config: &Config,
    path: &str,
    body: &T,
) -> ApiResult<AuthResponse> {
    let url = config.api_url(path);
    tracing::debug!("POST {}", path);

    let response = Client::new()
        .post(&url)
        .json(body)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response.text().await.unwrap_or_else(|_| status.to_string());
        tracing::warn!("Authentication failed: {} - {}", status, message);
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<AuthResponse>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
