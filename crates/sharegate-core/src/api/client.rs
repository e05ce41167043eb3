//! API client for the sharegate REST API.
//!
//! `ApiClient::request` is the single entry point for authenticated calls.
//! It reads the token from the injected `CredentialStore` on every call,
//! so a logout takes effect for the next request without rebuilding the
//! client.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, TransportError};
use super::transport::{HttpRequest, MultipartForm, RequestBody, ReqwestTransport, Transport};
use crate::auth::{CredentialStore, UserRecord};
use crate::config::Config;

/// Login endpoint, called without a token.
const LOGIN_ENDPOINT: &str = "/api/login";

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Serialized as JSON with `Content-Type: application/json`.
    Json(Value),
    /// Sent as-is; the transport sets the multipart content type.
    Multipart(MultipartForm),
    /// Raw bytes with no content type.
    Binary(Vec<u8>),
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<MultipartForm> for Body {
    fn from(form: MultipartForm) -> Self {
        Body::Multipart(form)
    }
}

/// The result of one request in a single shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestOutcome {
    pub ok: bool,
    pub payload: Value,
    pub status_message: String,
}

impl From<Result<Value, ApiError>> for RequestOutcome {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(payload) => {
                let status_message = payload
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                Self {
                    ok: true,
                    payload,
                    status_message,
                }
            }
            Err(e) => Self {
                ok: false,
                payload: Value::Null,
                status_message: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: UserRecord,
}

/// API client for sharegate.
/// Clone is cheap; clones share the transport and credential store.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    base_url: String,
}

impl ApiClient {
    /// Create a client over the real network transport
    pub fn new(config: &Config, store: CredentialStore) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::with_transport(
            config.base_url.clone(),
            store,
            Arc::new(transport),
        ))
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        store: CredentialStore,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Resolve an endpoint against the base URL. Absolute URLs pass through.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Make an authenticated request and return the parsed JSON payload.
    ///
    /// Fails with `Unauthenticated` before touching the network when no
    /// token is stored. The response body is parsed as JSON before the
    /// status is looked at, so error bodies can supply the message.
    pub async fn request(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Body>,
    ) -> Result<Value, ApiError> {
        let Some(token) = self.store.token() else {
            debug!(endpoint, "Request refused, no stored token");
            return Err(ApiError::Unauthenticated);
        };

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let body = Self::encode_body(body, &mut headers)?;

        self.exchange(HttpRequest {
            method,
            url: self.url(endpoint),
            headers,
            body,
        })
        .await
    }

    /// `GET` an endpoint.
    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(endpoint, Method::GET, None).await
    }

    /// Like [`request`](Self::request), folded into a `RequestOutcome`.
    pub async fn request_outcome(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Body>,
    ) -> RequestOutcome {
        self.request(endpoint, method, body).await.into()
    }

    /// Request and decode the payload into `T`.
    pub(crate) async fn request_as<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Body>,
    ) -> Result<T, ApiError> {
        let payload = self.request(endpoint, method, body).await?;
        Ok(serde_json::from_value(payload).map_err(TransportError::from)?)
    }

    /// Exchange username and password for a token and user record.
    ///
    /// Does not touch the credential store; the caller decides whether to
    /// keep the result.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, UserRecord), ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let payload = self
            .request_unauthenticated(LOGIN_ENDPOINT, Method::POST, Some(Body::Json(body)))
            .await?;

        let login: LoginResponse =
            serde_json::from_value(payload).map_err(TransportError::from)?;
        debug!(role = ?login.user.role, "Login succeeded");
        Ok((login.token, login.user))
    }

    /// Send a request with no `Authorization` header, for the account
    /// calls made before a token exists. Body and error rules are the same
    /// as [`request`](Self::request).
    pub(crate) async fn request_unauthenticated(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Body>,
    ) -> Result<Value, ApiError> {
        let mut headers = HeaderMap::new();
        let body = Self::encode_body(body, &mut headers)?;

        self.exchange(HttpRequest {
            method,
            url: self.url(endpoint),
            headers,
            body,
        })
        .await
    }

    fn encode_body(
        body: Option<Body>,
        headers: &mut HeaderMap,
    ) -> Result<Option<RequestBody>, ApiError> {
        Ok(match body {
            None => None,
            Some(Body::Json(value)) => {
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
                let bytes = serde_json::to_vec(&value).map_err(TransportError::from)?;
                Some(RequestBody::Bytes(bytes))
            }
            Some(Body::Multipart(form)) => Some(RequestBody::Multipart(form)),
            Some(Body::Binary(bytes)) => Some(RequestBody::Bytes(bytes)),
        })
    }

    async fn exchange(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%method, %url, "Sending API request");

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(%method, %url, error = %e, "API request could not be completed");
            e
        })?;

        let payload: Value = serde_json::from_slice(&response.body).map_err(|e| {
            warn!(%method, %url, status = response.status.as_u16(), "Response body is not JSON");
            TransportError::from(e)
        })?;

        if !response.status.is_success() {
            let err = ApiError::from_response(response.status.as_u16(), &payload);
            warn!(%method, %url, status = response.status.as_u16(), error = %err, "API request failed");
            return Err(err);
        }

        Ok(payload)
    }
}
