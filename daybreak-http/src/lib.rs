//! Minimal HTTP client with safe logging and flexible auth.
//!
//! - Request options: `Auth`, query params, timeout, retries, absolute URLs
//! - Redacts sensitive query params and never logs secret values
//! - `get_json` can retry 429/5xx with exponential backoff and `Retry-After`
//!   support; callers that must not retry pass `retries: Some(0)`
//! - `get_stream`, `post_form`, and `post_multipart` are single-attempt:
//!   streamed bodies cannot be replayed
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), daybreak_http::HttpError> {
//! let client = daybreak_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", daybreak_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: tokens handed to [`Auth`] are sanitized before use, and logs only
//! ever include the auth kind (oauth2/bearer/none), not the secret.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

pub use reqwest::Body;
pub use reqwest::multipart::{Form, Part};

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    /// Non-success status. `body` is the raw response body, verbatim, so the
    /// operator sees the platform's own error message.
    #[error("server returned error {status}: {body}")]
    Api { status: StatusCode, body: String },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use daybreak_http::Auth;
///
/// let auth = Auth::OAuth2("token");
/// match auth {
///     Auth::OAuth2(value) => assert_eq!(value, "token"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: OAuth2 <token> (legacy scheme some share APIs require)
    OAuth2(&'a str),
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    None,
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use daybreak_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(0),
///     auth: Some(Auth::Bearer("demo")),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.allow_absolute == false);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>, // e.g. [("mkt", "en-US".into())]
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use daybreak_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use daybreak_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// Override the default retry budget returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use daybreak_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://api.example.com")?.with_retries(5);
    /// assert_eq!(client.max_retries, 5);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Resolve `path` against the client's base URL.
    ///
    /// ```
    /// use daybreak_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new("https://img.example.com")?;
    /// let url = client.join("/th?id=pic.jpg")?;
    /// assert_eq!(url.as_str(), "https://img.example.com/th?id=pic.jpg");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn join(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    /// GET JSON with per-request options (query/auth/timeout/retries).
    ///
    /// Retries only 429 and 5xx responses, and only when the retry budget
    /// allows it; pass `retries: Some(0)` for strictly one attempt.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve_url(path, opts.allow_absolute)?;
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let mut attempt = 0usize;

        loop {
            let rb = self.build_request(Method::GET, url.clone(), &opts)?;
            log_request_start(&Method::GET, &url, &opts, attempt + 1, max_retries);

            let t0 = std::time::Instant::now();
            let resp = match rb.send().await {
                Ok(resp) => resp,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network_send"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(HttpError::Network(message));
                }
            };

            let status = resp.status();
            let headers = resp.headers().clone();
            let bytes = match resp.bytes().await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let message = err.to_string();
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message = %message,
                            "http.retrying.network_body"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(HttpError::Network(message));
                }
            };

            tracing::debug!(
                %status,
                duration_ms = t0.elapsed().as_millis() as u64,
                body_len = bytes.len(),
                "http.response"
            );

            if status.is_success() {
                let snippet = snip_body(&bytes);
                return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                    tracing::warn!(
                        serde_err = %e,
                        body_snippet = %snippet,
                        "http.response.decode_error"
                    );
                    HttpError::Decode(e.to_string(), snippet)
                });
            }

            let is_retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if is_retryable && attempt < max_retries {
                attempt += 1;
                let delay = retry_after_delay_secs(&headers)
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| backoff_delay(attempt));
                tracing::warn!(
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    body_snippet = %snip_body(&bytes),
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            return Err(api_error(status, &bytes));
        }
    }

    /// GET a response whose body is consumed as a byte stream.
    ///
    /// Single attempt: the caller owns the stream, so there is nothing to
    /// replay on failure. A non-success status reads the whole body and
    /// surfaces it verbatim.
    pub async fn get_stream(
        &self,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<ByteStream, HttpError> {
        let url = self.resolve_url(path, opts.allow_absolute)?;
        let rb = self.build_request(Method::GET, url.clone(), &opts)?;
        log_request_start(&Method::GET, &url, &opts, 1, 0);

        let resp = rb
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let bytes = resp
                .bytes()
                .await
                .map_err(|e| HttpError::Network(e.to_string()))?;
            return Err(api_error(status, &bytes));
        }

        tracing::debug!(
            %status,
            content_length = ?resp.content_length(),
            "http.response.stream"
        );
        Ok(ByteStream { resp })
    }

    /// POST `application/x-www-form-urlencoded` pairs. Success (2xx) drains
    /// and discards the body; any other status fails with the raw body text.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        opts: RequestOpts<'_>,
    ) -> Result<(), HttpError> {
        let url = self.resolve_url(path, opts.allow_absolute)?;
        let rb = self.build_request(Method::POST, url.clone(), &opts)?.form(fields);
        log_request_start(&Method::POST, &url, &opts, 1, 0);
        self.finish_post(rb).await
    }

    /// POST a multipart form. Streamed parts cannot be replayed, so this is a
    /// single attempt like [`HttpClient::post_form`].
    pub async fn post_multipart(
        &self,
        path: &str,
        form: Form,
        opts: RequestOpts<'_>,
    ) -> Result<(), HttpError> {
        let url = self.resolve_url(path, opts.allow_absolute)?;
        let rb = self
            .build_request(Method::POST, url.clone(), &opts)?
            .multipart(form);
        log_request_start(&Method::POST, &url, &opts, 1, 0);
        self.finish_post(rb).await
    }

    // ==============================
    // Core request implementation
    // ==============================

    fn resolve_url(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.join(path)
    }

    fn build_request(
        &self,
        method: Method,
        url: Url,
        opts: &RequestOpts<'_>,
    ) -> Result<RequestBuilder, HttpError> {
        let mut rb = self.inner.request(method, url);
        rb = rb.timeout(opts.timeout.unwrap_or(self.default_timeout));

        if let Some(q) = &opts.query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }

        match &opts.auth {
            Some(Auth::OAuth2(tok)) => {
                let value = auth_header_value("OAuth2", tok)?;
                rb = rb.header(AUTHORIZATION, value);
            }
            Some(Auth::Bearer(tok)) => {
                rb = rb.bearer_auth(sanitize_token(tok)?);
            }
            Some(Auth::None) | None => {}
        }
        Ok(rb)
    }

    async fn finish_post(&self, rb: RequestBuilder) -> Result<(), HttpError> {
        let t0 = std::time::Instant::now();
        let resp = rb
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        tracing::debug!(
            %status,
            duration_ms = t0.elapsed().as_millis() as u64,
            body_len = bytes.len(),
            "http.response"
        );

        if status.is_success() {
            // Response body is intentionally discarded; reading it above
            // releases the connection back to the pool.
            return Ok(());
        }
        Err(api_error(status, &bytes))
    }
}

// ==============================
// Streaming bodies
// ==============================

/// A successful streaming GET. Convert into a request [`Body`] to pipe the
/// bytes straight into an upload without buffering them in memory.
#[derive(Debug)]
pub struct ByteStream {
    resp: reqwest::Response,
}

impl ByteStream {
    /// Value of the `Content-Length` header, when the server sent one.
    pub fn content_length(&self) -> Option<u64> {
        self.resp.content_length()
    }

    pub fn into_body(self) -> Body {
        Body::wrap_stream(self.resp.bytes_stream())
    }
}

// ==============================
// Helpers
// ==============================

fn api_error(status: StatusCode, body: &[u8]) -> HttpError {
    let body = String::from_utf8_lossy(body).into_owned();
    tracing::warn!(%status, body = %body, "http.error");
    HttpError::Api { status, body }
}

fn backoff_delay(attempt: usize) -> Duration {
    Duration::from_millis(200u64.saturating_mul(1 << (attempt.saturating_sub(1)).min(6)))
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

fn auth_header_value(scheme: &str, raw: &str) -> Result<HeaderValue, HttpError> {
    let token = sanitize_token(raw)?;
    HeaderValue::from_str(&format!("{scheme} {token}"))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))
}

fn sanitize_token(raw: &str) -> Result<String, HttpError> {
    // 1) Trim outer spaces/quotes
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();

    // 2) Remove *all* ASCII whitespace (spaces, tabs, newlines, carriage returns)
    s.retain(|ch| !ch.is_ascii_whitespace());

    // 3) Ensure ASCII and no control chars
    if !s.is_ascii() {
        return Err(HttpError::Build("token contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build("token contains control characters".into()));
    }
    Ok(s)
}

fn log_request_start(
    method: &Method,
    url: &Url,
    opts: &RequestOpts<'_>,
    attempt: usize,
    max_retries: usize,
) {
    let auth_kind = match &opts.auth {
        Some(Auth::OAuth2(_)) => "oauth2",
        Some(Auth::Bearer(_)) => "bearer",
        Some(Auth::None) | None => "none",
    };

    // Redact sensitive query params
    let redacted_q: Vec<(String, String)> = opts
        .query
        .as_ref()
        .map(|q| {
            q.iter()
                .map(|(k, v)| {
                    let is_secret = matches!(
                        k.to_ascii_lowercase().as_str(),
                        "access_token"
                            | "authorization"
                            | "auth"
                            | "key"
                            | "api_key"
                            | "token"
                            | "secret"
                            | "client_secret"
                            | "bearer"
                    );
                    (
                        (*k).to_string(),
                        if is_secret {
                            "<redacted>".to_string()
                        } else {
                            v.as_ref().to_string()
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(
        attempt,
        max_retries,
        method = %method,
        host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
        query = ?redacted_q,
        auth_kind,
        "http.request.start"
    );
}
