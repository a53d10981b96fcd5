//! Public and session-backed API clients
//!
//! The split mirrors the two request paths the backend exposes: public
//! endpoints (login, tenant registration, renewal) and bearer-authenticated
//! `/api` endpoints. The authenticated client reads its credential from the
//! session store at send time, so a renewal is visible to every in-flight
//! caller that has not yet built its headers.

use std::sync::Arc;
use std::time::Duration;

use echo_core::session::{
    NoopTerminationHandler, Session, SessionStore, SessionTerminationHandler,
};
use reqwest::{Client, ClientBuilder as HttpClientBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::ClientError;
use crate::types::ErrorResponse;

const USER_AGENT: &str = "echo-client/0.1.0";

/// Client for public endpoints that don't require authentication
#[derive(Clone)]
pub struct PublicEchoClient {
    client: Client,
    base_url: String,
}

/// Client for `/api` endpoints; injects the stored bearer credential and
/// renews it once when the backend reports it expired.
#[derive(Clone)]
pub struct AuthenticatedEchoClient {
    client: Client,
    base_url: String,
    session: Session,
    termination: Arc<dyn SessionTerminationHandler>,
}

fn build_http_client(timeout: Option<Duration>) -> Result<Client, ClientError> {
    #[cfg(not(target_arch = "wasm32"))]
    let client = {
        let mut builder = HttpClientBuilder::new().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()?
    };

    #[cfg(target_arch = "wasm32")]
    let client = {
        let _ = timeout; // Timeouts not supported on WASM
        HttpClientBuilder::new().user_agent(USER_AGENT).build()?
    };

    Ok(client)
}

impl PublicEchoClient {
    /// Create a new public client
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::new_with_timeout(base_url, None)
    }

    fn new_with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a request builder without authentication
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request and handle common errors
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }

    /// Attach a session store to get a client for authenticated endpoints
    pub fn authenticate(self, store: Arc<dyn SessionStore>) -> AuthenticatedEchoClient {
        self.authenticate_with_handler(store, Arc::new(NoopTerminationHandler))
    }

    /// Attach a session store and a handler invoked when the session is
    /// terminated after a failed renewal
    pub fn authenticate_with_handler(
        self,
        store: Arc<dyn SessionStore>,
        termination: Arc<dyn SessionTerminationHandler>,
    ) -> AuthenticatedEchoClient {
        AuthenticatedEchoClient {
            client: self.client,
            base_url: self.base_url,
            session: Session::new(store),
            termination,
        }
    }
}

impl AuthenticatedEchoClient {
    /// Create a new session-backed client
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        Ok(PublicEchoClient::new(base_url)?.authenticate(store))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Typed view of the session state backing this client
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Create a request builder; the bearer credential is attached at send
    /// time so that a renewal between build and send is still observed
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Execute a request with credential injection and at most one retry
    /// after renewal.
    ///
    /// When a stored access token exists it is merged into the headers as
    /// `Authorization: Bearer <token>`; without one the request goes out
    /// unauthenticated. A 401 response triggers [`Self::renew`] and a single
    /// re-issue with the renewed token; the second outcome is returned as-is.
    /// Concurrent callers racing into a 401 each renew independently; the
    /// store is last-writer-wins.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        // Clone before the credential is attached: the retry must pick up
        // the renewed token, not carry the rejected one twice.
        let retry = request.try_clone();

        let response = self.send_with_token(request).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            // Requests with non-replayable bodies cannot be retried.
            if let Some(retry) = retry {
                debug!("access credential rejected, renewing");
                self.renew().await?;
                let response = self.send_with_token(retry).await?;
                return decode(response).await;
            }
        }
        decode(response).await
    }

    /// Create a public client (useful for calling public endpoints)
    pub fn to_public(&self) -> PublicEchoClient {
        PublicEchoClient {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        }
    }

    pub(super) async fn send_with_token(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, ClientError> {
        let request = match self.session.access_token().await? {
            Some(token) => request.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Clear the session and notify the termination handler. Continuing
    /// without a renewable credential is meaningless, so this runs before a
    /// renewal failure propagates.
    pub(super) async fn terminate_session(&self) {
        warn!("terminating session: credentials can no longer be renewed");
        if let Err(err) = self.session.clear().await {
            warn!(error = %err, "failed to clear session state");
        }
        self.termination.session_terminated().await;
    }
}

/// Decode a response, mapping non-success statuses through the structured
/// error envelope when one is present.
pub(super) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                // A 2xx exchange can still carry an error payload instead of
                // the expected shape.
                if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(&body) {
                    if let Some(text) = envelope.text() {
                        return Err(ClientError::Application(text.to_string()));
                    }
                }
                Err(ClientError::Serialization(err))
            }
        };
    }

    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|envelope| envelope.text().map(str::to_string))
            .unwrap_or(body),
        Err(_) => String::new(),
    };
    let message = if message.is_empty() {
        status.to_string()
    } else {
        message
    };
    Err(ClientError::from_status(status, message))
}

/// Builder that creates the appropriate client type
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    termination: Option<Arc<dyn SessionTerminationHandler>>,
}

impl ClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            termination: None,
        }
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the handler invoked when the session is terminated
    pub fn termination_handler(mut self, handler: Arc<dyn SessionTerminationHandler>) -> Self {
        self.termination = Some(handler);
        self
    }

    /// Build a public client
    pub fn build_public(self) -> Result<PublicEchoClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        PublicEchoClient::new_with_timeout(base_url, self.timeout)
    }

    /// Build a session-backed client
    pub fn build_authenticated(
        self,
        store: Arc<dyn SessionStore>,
    ) -> Result<AuthenticatedEchoClient, ClientError> {
        let termination = self
            .termination
            .clone()
            .unwrap_or_else(|| Arc::new(NoopTerminationHandler));
        Ok(self
            .build_public()?
            .authenticate_with_handler(store, termination))
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
