use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::Level;

use crate::{ApiError, ClientError, CredentialCell, SessionEvents};

/// JSON HTTP wrapper for the inventory backend.
///
/// Joins paths onto the configured base URL, injects the `Authorization`
/// header from the shared [`CredentialCell`], normalizes error bodies into
/// [`ApiError`] and reports 401s through [`SessionEvents`]. Each request
/// runs inside a tracing span recording method, path and status.
#[derive(Clone)]
pub struct HttpClient {
    base: String,
    inner: reqwest::Client,
    credentials: Arc<CredentialCell>,
    events: Arc<SessionEvents>,
}

impl HttpClient {
    /// Create a client over a default `reqwest::Client`.
    ///
    /// `base_url` is the API root (e.g. `http://127.0.0.1:8080/api`); a
    /// trailing slash is tolerated. Paths passed to the request methods are
    /// absolute within that root (`/parts`, `/auth/me`, ...).
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<CredentialCell>,
        events: Arc<SessionEvents>,
    ) -> Self {
        Self::with_inner(reqwest::Client::new(), base_url, credentials, events)
    }

    /// Create a client over a pre-configured `reqwest::Client` (timeouts,
    /// proxies and TLS are the caller's business).
    pub fn with_inner(
        inner: reqwest::Client,
        base_url: impl Into<String>,
        credentials: Arc<CredentialCell>,
        events: Arc<SessionEvents>,
    ) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            inner,
            credentials,
            events,
        }
    }

    pub fn events(&self) -> &Arc<SessionEvents> {
        &self.events
    }

    pub fn credentials(&self) -> &Arc<CredentialCell> {
        &self.credentials
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, &[]).await?;
        self.decode(response).await
    }

    /// GET with query parameters appended to the path.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, query).await?;
        self.decode(response).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.send_json(Method::POST, path, body).await?;
        self.decode(response).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.send_json(Method::PUT, path, body).await?;
        self.decode(response).await
    }

    /// DELETE; a 2xx (typically 204 No Content) yields no payload.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.send(Method::DELETE, path, &[]).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from(response).await);
        }
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.inner.request(method, format!("{}{}", self.base, path));
        if let Some(auth) = self.credentials.authorization() {
            req = req.header(header::AUTHORIZATION, auth);
        }
        req
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ClientError> {
        let mut req = self.request(method.clone(), path);
        if !query.is_empty() {
            req = req.query(query);
        }
        self.execute(req, &method, path).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, ClientError> {
        let req = self.request(method.clone(), path).json(body);
        self.execute(req, &method, path).await
    }

    async fn execute(
        &self,
        req: reqwest::RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let span = tracing::span!(
            Level::DEBUG, "api_request",
            http.method = %method,
            http.path = %path,
        );
        let _g = span.enter();

        let response = req.send().await?;

        span.record("http.status_code", response.status().as_u16());
        if response.status().is_client_error() || response.status().is_server_error() {
            span.record("error", true);
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    /// Consume a failed response into a typed error, firing the
    /// session-invalidated notification for 401s.
    async fn error_from(&self, response: reqwest::Response) -> ClientError {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("Unknown Status");
        let body = response.text().await.unwrap_or_default();
        let error = if body.is_empty() {
            ApiError::from_status(status.as_u16(), status_text)
        } else {
            ApiError::from_body(status.as_u16(), status_text, &body)
        };
        if status == StatusCode::UNAUTHORIZED {
            self.events.unauthorized();
        }
        ClientError::Api(error)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").field("base", &self.base).finish()
    }
}
