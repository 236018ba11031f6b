//! Login, logout and session verification.
//!
//! [`AuthService`] owns the [`Session`] lifecycle: it establishes the token
//! pair on login and tears it down on logout. The auth endpoints are called
//! with [`ApiClient::send_direct`] so they never enter the refresh loop.

use crate::models::auth::{TokenPair, VerifyRequest};
use crate::models::{ChangePasswordRequest, LoginRequest, UserProfile};
use crate::services::api_client::ApiClient;
use crate::services::endpoints;
use crate::services::request::{MultipartForm, PendingRequest};
use crate::session::Session;
use estate_core::ApiError;
use reqwest::Method;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    /// Exchange credentials for a token pair, then fetch the profile with the
    /// new access token.
    ///
    /// Tokens are persisted only once the profile fetch succeeds; a failed
    /// login leaves storage untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let credentials = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;

        let pending = PendingRequest::new(Method::POST, endpoints::TOKEN_CREATE).json(&credentials)?;
        let tokens: TokenPair = match self.client.send_direct(&pending, None).await {
            Ok(body) => serde_json::from_value(body)?,
            Err(e) => {
                tracing::error!(email = %credentials.email, error = %e, "Login failed");
                return Err(match e {
                    ApiError::Unauthorized(_) | ApiError::Rejected { .. } => {
                        ApiError::Authentication(e.detail())
                    }
                    other => other,
                });
            }
        };

        let access = Secret::new(tokens.access);
        let profile_request = PendingRequest::new(Method::GET, endpoints::CURRENT_USER);
        let profile: UserProfile = self
            .client
            .send_direct(&profile_request, Some(&access))
            .await
            .and_then(|body| Ok(serde_json::from_value(body)?))
            .map_err(|e| {
                tracing::error!(email = %credentials.email, error = %e, "Profile fetch after login failed");
                e
            })?;

        self.session()
            .establish(access.expose_secret(), &tokens.refresh)
            .await?;
        tracing::info!(user_id = profile.id, email = %profile.email, "Logged in");

        Ok(profile)
    }

    /// Erase both tokens and move the session to `LoggedOut`. No network call.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().terminate().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Whether the stored access token verifies, refreshing once if it does not.
    ///
    /// Without an access token this returns `false` without touching the
    /// network.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        let Some(token) = self.session().access_token().await? else {
            return Ok(false);
        };

        let pending = PendingRequest::new(Method::POST, endpoints::TOKEN_VERIFY).json(&VerifyRequest {
            token: token.expose_secret(),
        })?;

        match self.client.send_direct(&pending, None).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Token verification failed, attempting refresh");
                Ok(self.client.refresh().await?.is_some())
            }
        }
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh(&self) -> Result<Option<Secret<String>>, ApiError> {
        self.client.refresh().await
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.client.get(endpoints::CURRENT_USER).await
    }

    /// `PATCH` the profile as `multipart/form-data` so an avatar can ride along.
    pub async fn update_profile(&self, form: MultipartForm) -> Result<UserProfile, ApiError> {
        let pending = PendingRequest::new(Method::PATCH, endpoints::CURRENT_USER).multipart(form);
        let profile: UserProfile = serde_json::from_value(self.client.send(pending).await?)?;
        tracing::info!(user_id = profile.id, "Profile updated");
        Ok(profile)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<Value, ApiError> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        request.validate()?;

        let result = self.client.post(endpoints::SET_PASSWORD, &request).await?;
        tracing::info!("Password changed");
        Ok(result)
    }
}
