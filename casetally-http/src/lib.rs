//! Minimal HTTP client with safe logging and flexible auth.
//!
//! - Request options: headers, `Auth`, query params, timeout
//! - Logs only the auth *kind*, never header values, so credential strings
//!   cannot leak into the log sink
//! - No retries: every caller in this workspace makes exactly one attempt
//!   per run, and a failure aborts the run rather than being papered over
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response status/timing, body snippets (truncated), and final errors.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

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
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// Prebuilt auth header (e.g. a signed `Authorization: OAuth ...` value).
/// Unauthenticated requests simply leave [`RequestOpts::auth`] unset.
#[derive(Clone, Debug)]
pub struct Auth {
    pub name: HeaderName,
    pub value: HeaderValue,
}

/// Per-request tuning knobs.
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, String)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
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
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let (bytes, snippet) = self
            .request_internal::<()>(Method::GET, path, None, opts)
            .await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            tracing::warn!(
                serde_err = %e,
                body_snippet = %snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// GET a plain-text body (delimited feeds).
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let (bytes, _) = self
            .request_internal::<()>(Method::GET, path, None, opts)
            .await?;
        String::from_utf8(bytes).map_err(|e| HttpError::Decode(e.to_string(), String::new()))
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (bytes, snippet) = self
            .request_internal(Method::POST, path, Some(body), opts)
            .await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            tracing::warn!(
                serde_err = %e,
                body_snippet = %snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    /// Resolve the full URL for a request path, honoring `allow_absolute`.
    pub fn resolve_url(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        if allow_absolute {
            if let Ok(abs) = Url::parse(path) {
                return Ok(abs);
            }
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    async fn request_internal<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<(Vec<u8>, String), HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.resolve_url(path, opts.allow_absolute)?;

        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        rb = rb.timeout(timeout);

        if let Some(q) = &opts.query {
            rb = rb.query(q);
        }

        if let Some(b) = body {
            rb = rb.json(b);
        }

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        let auth_kind = if opts.auth.is_some() { "header" } else { "none" };
        if let Some(Auth { name, value }) = opts.auth {
            rb = rb.header(name, value);
        }

        tracing::debug!(
            method = %method,
            host_path = %format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            timeout_ms = timeout.as_millis() as u64,
            auth_kind,
            has_body = body.is_some(),
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = match rb.send().await {
            Ok(resp) => resp,
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(message = %message, "http.network_error.send");
                return Err(HttpError::Network(message));
            }
        };
        let status = resp.status();
        let bytes = match resp.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(message = %message, "http.network_error.body");
                return Err(HttpError::Network(message));
            }
        };
        let dur_ms = t0.elapsed().as_millis() as u64;
        let snippet = snip_body(&bytes);

        tracing::debug!(
            %status,
            duration_ms = dur_ms,
            body_len = bytes.len(),
            "http.response"
        );

        if status.is_success() {
            return Ok((bytes, snippet));
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            %status,
            message = %message,
            body_snippet = %snippet,
            "http.error"
        );
        Err(HttpError::Api { status, message })
    }
}

/// Pull a human-readable message out of common error-body shapes.
fn extract_error_message(body: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(serde::Deserialize)]
    struct TwErr {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
    }
    #[derive(serde::Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            for candidate in [first.message, first.detail, first.title] {
                if !candidate.is_empty() {
                    return candidate;
                }
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        for candidate in [m.message, m.detail, m.error] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        // Cut must land on a char boundary or truncate panics.
        let mut n = 500;
        while !snip.is_char_boundary(n) {
            n -= 1;
        }
        snip.truncate(n);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_paths() {
        let client = HttpClient::new("https://api.example.com").unwrap();
        let url = client.resolve_url("v1/states/ny/current.json", false).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/states/ny/current.json");
    }

    #[test]
    fn resolve_honors_absolute_urls_when_allowed() {
        let client = HttpClient::new("https://api.example.com").unwrap();
        let url = client
            .resolve_url("https://elsewhere.example.com/data.csv", true)
            .unwrap();
        assert_eq!(url.domain(), Some("elsewhere.example.com"));
    }

    #[test]
    fn error_message_prefers_api_detail() {
        let body = br#"{"errors":[{"message":"","detail":"Unauthorized","title":"auth"}]}"#;
        assert_eq!(extract_error_message(body), "Unauthorized");
    }

    #[test]
    fn error_message_falls_back_to_snippet() {
        assert_eq!(extract_error_message(b"plain failure"), "plain failure");
    }

    #[test]
    fn snippet_of_short_body_is_verbatim() {
        assert_eq!(snip_body(b"tiny"), "tiny");
    }

    #[test]
    fn snippet_cut_respects_multibyte_boundaries() {
        // 499 ASCII bytes followed by a two-byte char straddling the cut.
        let mut body = "a".repeat(499);
        body.push('é');
        body.push_str(&"b".repeat(100));
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
        assert_eq!(&snip[..499], &"a".repeat(499));
        assert!(snip.len() <= 503);
    }
}
