//! Authenticated HTTP client for the back-office API.
//!
//! Every call through [`ApiClient::send`] carries the stored access token. A
//! 401 on a request that has not been retried triggers one refresh, and a
//! renewed token replays the request exactly once. Auth endpoints go through
//! [`ApiClient::send_direct`], which never refreshes.

use crate::config::ApiSettings;
use crate::models::auth::{RefreshRequest, RefreshResponse};
use crate::services::endpoints;
use crate::services::metrics::{record_refresh, record_request, RefreshOutcome};
use crate::services::request::{PendingRequest, RequestBody};
use crate::session::Session;
use estate_core::observability::{new_request_id, TracedRequestExt};
use estate_core::ApiError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, session: Arc<Session>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue an authenticated request and decode the response body as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        headers: Option<HeaderMap>,
    ) -> Result<T, ApiError> {
        let mut pending = PendingRequest::new(method, path).body(body);
        if let Some(headers) = headers {
            pending = pending.headers(headers);
        }
        decode(self.send(pending).await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let pending = PendingRequest::new(Method::POST, path).json(body)?;
        decode(self.send(pending).await?)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let pending = PendingRequest::new(Method::PUT, path).json(body)?;
        decode(self.send(pending).await?)
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let pending = PendingRequest::new(Method::PATCH, path).json(body)?;
        decode(self.send(pending).await?)
    }

    /// `DELETE`; returns whatever body the backend sent (`Null` for 204).
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(PendingRequest::new(Method::DELETE, path)).await
    }

    /// Send with the bearer token and the one-shot refresh-and-retry rule.
    ///
    /// A request already marked retried gets its 401 back unchanged.
    pub async fn send(&self, mut pending: PendingRequest) -> Result<Value, ApiError> {
        let token = match self.session.access_token().await? {
            Some(token) => Some(token),
            None => {
                // The up-front refresh is this request's one refresh attempt.
                tracing::debug!("No access token stored, refreshing before request");
                pending.mark_retried();
                self.refresh().await?
            }
        };
        let response = self.dispatch(&pending, token.as_ref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || pending.is_retried() {
            return decode_response(response).await;
        }

        pending.mark_retried();
        tracing::warn!(
            method = %pending.method(),
            path = %pending.path(),
            "Access token rejected, attempting refresh"
        );

        match self.refresh().await? {
            Some(renewed) => {
                let replay = self.dispatch(&pending, Some(&renewed)).await?;
                decode_response(replay).await
            }
            None => decode_response(response).await,
        }
    }

    /// Send without consulting the session. Used for the auth endpoints.
    pub async fn send_direct(
        &self,
        pending: &PendingRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<Value, ApiError> {
        let response = self.dispatch(pending, bearer).await?;
        decode_response(response).await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// Any failure (no refresh token, rejection, transport error) erases both
    /// tokens and yields `None`. Only storage errors are returned as `Err`.
    pub async fn refresh(&self) -> Result<Option<Secret<String>>, ApiError> {
        let Some(refresh_token) = self.session.refresh_token().await? else {
            tracing::warn!("No refresh token found, logging out");
            self.session.terminate().await?;
            record_refresh(RefreshOutcome::MissingToken);
            return Ok(None);
        };

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(tokens) => {
                self.session
                    .renew(&tokens.access, tokens.refresh.as_deref())
                    .await?;
                record_refresh(RefreshOutcome::Renewed);
                tracing::info!(rotated = tokens.refresh.is_some(), "Access token refreshed");
                Ok(Some(Secret::new(tokens.access)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Token refresh failed, logging out");
                self.session.terminate().await?;
                record_refresh(RefreshOutcome::Rejected);
                Ok(None)
            }
        }
    }

    async fn exchange_refresh_token(
        &self,
        refresh_token: &Secret<String>,
    ) -> Result<RefreshResponse, ApiError> {
        let pending = PendingRequest::new(Method::POST, endpoints::TOKEN_REFRESH).json(
            &RefreshRequest {
                refresh: refresh_token.expose_secret(),
            },
        )?;
        decode(self.send_direct(&pending, None).await?)
    }

    async fn dispatch(
        &self,
        pending: &PendingRequest,
        bearer: Option<&Secret<String>>,
    ) -> Result<Response, ApiError> {
        let url = self.url(pending.path());
        let request_id = new_request_id();

        let mut builder = self
            .client
            .request(pending.method().clone(), &url)
            .traced(&request_id);

        // Caller headers are applied last and replace same-named defaults. The
        // session bearer and the multipart boundary are never overridden.
        let mut headers = pending.header_map().clone();
        if let Some(token) = bearer {
            headers.remove(AUTHORIZATION);
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder = match pending.request_body() {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Multipart(form)) => {
                headers.remove(CONTENT_TYPE);
                builder.multipart(form.to_form()?)
            }
            None => {
                headers
                    .entry(CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static("application/json"));
                builder
            }
        };
        builder = builder.headers(headers);

        let started = Instant::now();
        let response = builder.send().await.map_err(|e| {
            tracing::error!(
                method = %pending.method(),
                url = %url,
                request_id = %request_id,
                error = %e,
                "HTTP request failed"
            );
            ApiError::from(e)
        })?;

        let status = response.status();
        record_request(pending.method(), pending.path(), status, started.elapsed());
        tracing::debug!(
            method = %pending.method(),
            path = %pending.path(),
            status = %status,
            request_id = %request_id,
            "API response"
        );

        Ok(response)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}

async fn decode_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        if bytes.is_empty() {
            Value::Null
        } else {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
    });
    Err(ApiError::from_status(status, body))
}
