//! # HTTP Retrieval Utilities
//!
//! This module provides a small, blocking API client wrapper around `reqwest`.
//! It resolves relative paths against a fixed base URL, injects a bearer token
//! and standardizes JSON response handling. Requests are issued exactly once:
//! there is no retry layer and no timeout beyond the transport default.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while building or executing a request.
///
/// A non-2xx status is *not* an error at this layer; it is reported through
/// [`ApiResponse::success`] so callers can decide how to surface it.
#[derive(Debug, Error)]
pub enum RetrieveError {
    /// The base URL or a joined path could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot act as a base (e.g. `data:` or `mailto:` URLs).
    #[error("URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    /// The bearer token contains characters that are not allowed in a header.
    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),

    /// Network, DNS, TLS or timeout failure reported by the transport.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response whose body is not the expected JSON.
    #[error("Failed to decode JSON from {url}: {source}")]
    Decode {
        /// The URL that produced the body.
        url: String,
        /// The raw body as received.
        body: String,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}

/// A standardized container for API responses.
///
/// This struct wraps the deserialized data along with metadata about the
/// HTTP transaction, such as status codes and headers.
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// The successfully deserialized response body, if any.
    pub data: Option<T>,
    /// The raw error body returned by the server if the request failed.
    pub error_body: Option<String>,
    /// The numeric HTTP status code.
    pub status: u16,
    /// Indicates if the status code was in the 2xx range.
    pub success: bool,
    /// The headers returned by the server.
    pub headers: HeaderMap,
    /// The absolute URL that was requested.
    pub url: Url,
}

/// A blocking HTTP client bound to one base URL.
///
/// Handles URL joining and bearer authentication. It holds no mutable state,
/// so a single instance can be shared freely between callers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The underlying blocking client.
    inner: Client,
    /// The base URL to which all relative paths are joined. Always ends with `/`.
    base_url: Url,
    /// The pre-built `Authorization` header value, if a token was supplied.
    auth_header: Option<HeaderValue>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    /// * `base_url` - The absolute base URL for the API (e.g., "https://api.example.com/v1/").
    ///   A trailing `/` is added when missing so relative paths land below it.
    /// * `auth_token` - An optional token sent as `Authorization: Bearer <token>`.
    ///
    /// # Errors
    /// Returns [`RetrieveError::InvalidUrl`] for a malformed base URL and
    /// [`RetrieveError::InvalidToken`] for a token that cannot be sent in a header.
    pub fn new(base_url: &str, auth_token: Option<&str>) -> Result<Self, RetrieveError> {
        let mut url = Url::parse(base_url)?;
        if url.cannot_be_a_base() {
            return Err(RetrieveError::CannotBeABase(base_url.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let auth_header = auth_token
            .map(|token| {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
                // Keeps the token out of Debug output and HTTP/2 header tables.
                value.set_sensitive(true);
                Ok::<_, InvalidHeaderValue>(value)
            })
            .transpose()?;

        Ok(Self {
            inner: Client::new(),
            base_url: url,
            auth_header,
        })
    }

    /// The base URL every request path is joined to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `path` against the base URL and appends `query` pairs.
    ///
    /// `path` must be relative (no leading `/`) and already percent-encoded;
    /// escapes such as `%2F` are kept verbatim.
    pub fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, RetrieveError> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Performs a generic HTTP request and handles the response.
    ///
    /// # Arguments
    /// * `method` - The HTTP verb.
    /// * `path` - The relative path to append to the base URL.
    /// * `query` - Query string pairs, appended in order.
    /// * `headers` - Optional additional headers for this specific request.
    ///
    /// # Errors
    /// Transport failures and undecodable 2xx bodies. Non-2xx responses come
    /// back as `Ok` with `success == false` and the raw body in `error_body`.
    pub fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        headers: Option<HeaderMap>,
    ) -> Result<ApiResponse<T>, RetrieveError>
    where
        T: DeserializeOwned,
    {
        let full_url = self.build_url(path, query)?;
        let mut req = self.inner.request(method.clone(), full_url.clone());

        if let Some(h) = headers {
            req = req.headers(h);
        }

        if let Some(auth) = &self.auth_header {
            req = req.header(AUTHORIZATION, auth.clone());
        }

        debug!(%method, url = %full_url, "sending request");
        let response: Response = req.send()?;
        let status = response.status();
        let resp_headers = response.headers().clone();
        debug!(%method, url = %full_url, status = status.as_u16(), "response received");

        if status.is_success() {
            let body = response.text()?;
            let data = serde_json::from_str::<T>(&body).map_err(|source| RetrieveError::Decode {
                url: full_url.to_string(),
                body,
                source,
            })?;
            Ok(ApiResponse {
                data: Some(data),
                error_body: None,
                status: status.as_u16(),
                success: true,
                headers: resp_headers,
                url: full_url,
            })
        } else {
            // Keep the error body for the caller; an unreadable body is not worth failing over.
            let error_text = response.text().ok();
            warn!(%method, url = %full_url, status = status.as_u16(), "request failed");
            Ok(ApiResponse {
                data: None,
                error_body: error_text,
                status: status.as_u16(),
                success: false,
                headers: resp_headers,
                url: full_url,
            })
        }
    }

    /// Shorthand for a `GET` without extra headers.
    pub fn get<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse<T>, RetrieveError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, query, None)
    }
}
