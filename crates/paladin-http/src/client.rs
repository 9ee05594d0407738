//! Blocking HTTP client
//!
//! `default_client` wraps `reqwest::blocking::Client`. Every request is
//! logged before it is sent and every response after its body has been
//! read, so the response handed back is fully buffered.

#![allow(clippy::result_large_err)]

use crate::hooks;
use paladin_core::errors::{ExError, PaladinError, Result};
use paladin_core::HttpClientConfig;
use paladin_core_types::{RequestId, Sensitive};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// First delay between connect retries, doubled on every attempt
const RETRY_BASE_DELAY_MS: u64 = 100;
/// Upper bound for a single retry delay
const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Delay before retry number `attempt` (1-based)
fn retry_delay(attempt: u32) -> Duration {
    let ms = 2u64
        .saturating_pow(attempt.saturating_sub(1))
        .saturating_mul(RETRY_BASE_DELAY_MS)
        .min(RETRY_MAX_DELAY_MS);
    Duration::from_millis(ms)
}

/// Per-client overrides; unset values fall back to `HttpClientConfig`
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub base_url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub bearer_token: Option<Sensitive<String>>,
    /// Seconds; `0` disables the timeout
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub raise_for_status: bool,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(Sensitive::new(token.into()));
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn raise_for_status(mut self, raise: bool) -> Self {
        self.raise_for_status = raise;
        self
    }
}

/// Build a client with logging hooks installed
///
/// # Errors
///
/// `InvalidInput` for a malformed base URL or header; `ExternalService` if
/// the TLS backend cannot be initialised.
pub fn default_client(options: ClientOptions, conf: &HttpClientConfig) -> Result<HttpClient> {
    let timeout = options.timeout.unwrap_or(conf.timeout);
    let retries = options.retries.unwrap_or(conf.retries);

    let mut default_headers = HeaderMap::new();
    for (name, value) in &options.headers {
        let (name, value) = header_pair(name, value)?;
        default_headers.insert(name, value);
    }
    if let Some(token) = &options.bearer_token {
        let (_, mut value) = header_pair(AUTHORIZATION.as_str(), &format!("Bearer {}", token.expose()))?;
        value.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, value);
    }

    let base_url = options
        .base_url
        .as_deref()
        .map(|url| Url::parse(url).map_err(|e| invalid_url(url, e)))
        .transpose()?;

    let inner = reqwest::blocking::Client::builder()
        .timeout((timeout > 0).then(|| Duration::from_secs(timeout)))
        .build()
        .map_err(|e| {
            ExError::from(PaladinError::Internal {
                message: format!("http client setup failed: {}", e),
            })
        })?;

    Ok(HttpClient {
        inner,
        base_url,
        default_headers,
        retries,
        raise_for_status: options.raise_for_status,
    })
}

/// Parse a `name: value` header line as typed on a command line
///
/// # Errors
///
/// `InvalidInput` when the colon is missing or name/value are not valid
/// header text.
pub fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue)> {
    let (name, value) = raw.split_once(':').ok_or_else(|| {
        ExError::from(PaladinError::InvalidInput {
            reason: format!("invalid header {:?}, expected 'name: value'", raw),
        })
    })?;
    header_pair(name.trim(), value.trim())
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let invalid = |reason: String| ExError::from(PaladinError::InvalidInput { reason });
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| invalid(format!("invalid header name {:?}: {}", name, e)))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|e| invalid(format!("invalid value for header {}: {}", name, e)))?;
    Ok((header_name, header_value))
}

fn invalid_url(url: &str, err: impl std::fmt::Display) -> ExError {
    PaladinError::InvalidInput {
        reason: format!("invalid url {:?}: {}", url, err),
    }
    .into()
}

fn transport_error(method: &Method, url: &Url, err: &reqwest::Error) -> PaladinError {
    if err.is_timeout() {
        PaladinError::HttpTimeout {
            method: method.to_string(),
            url: url.to_string(),
        }
    } else {
        PaladinError::Http {
            method: method.to_string(),
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

pub struct HttpClient {
    inner: reqwest::blocking::Client,
    base_url: Option<Url>,
    default_headers: HeaderMap,
    retries: u32,
    raise_for_status: bool,
}

impl HttpClient {
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Absolute URL for `url`, joined onto the base URL when relative
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the result is not a valid URL.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        let absolute = url.starts_with("http://") || url.starts_with("https://");
        match &self.base_url {
            Some(base) if !absolute => base.join(url),
            _ => Url::parse(url),
        }
        .map_err(|e| invalid_url(url, e))
    }

    /// # Errors
    ///
    /// As for [`HttpClient::send`].
    pub fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(Method::GET, url, HeaderMap::new(), None)
    }

    /// Send one request and buffer the response
    ///
    /// Connect failures are retried up to the configured count with a
    /// doubling delay; every other failure returns at once.
    ///
    /// # Errors
    ///
    /// `ExternalService` on transport failure (or a status of 400 and above
    /// when `raise_for_status` is set), `Timeout` when the timeout elapses,
    /// `InvalidInput` for a malformed URL. Errors carry the request id.
    pub fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let url = self.resolve(url)?;
        let request_id = RequestId::new();
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = retry_delay(attempt);
                tracing::debug!(
                    request_id = %request_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying"
                );
                std::thread::sleep(delay);
            }

            let mut builder = self
                .inner
                .request(method.clone(), url.clone())
                .headers(self.default_headers.clone())
                .headers(headers.clone());
            if let Some(body) = &body {
                builder = builder.body(body.clone());
            }
            let request = builder.build().map_err(|e| {
                ExError::from(transport_error(&method, &url, &e)).with_request_id(request_id.clone())
            })?;

            hooks::log_request(&request_id, request.method(), request.url());
            let request_headers = request.headers().clone();
            let started = Instant::now();

            match self.inner.execute(request) {
                Ok(resp) => {
                    let status = resp.status();
                    let response_headers = resp.headers().clone();
                    let body = resp.bytes().map_err(|e| {
                        ExError::from(transport_error(&method, &url, &e))
                            .with_request_id(request_id.clone())
                    })?;

                    let response = HttpResponse {
                        request_id,
                        method,
                        url,
                        request_headers,
                        status,
                        headers: response_headers,
                        body: body.to_vec(),
                        elapsed: started.elapsed(),
                    };
                    hooks::log_response(&response);
                    if tracing::enabled!(tracing::Level::TRACE) {
                        hooks::log_response_detail(&response);
                    }
                    if self.raise_for_status {
                        response.error_for_status_ref()?;
                    }
                    return Ok(response);
                }
                Err(err) if err.is_connect() && attempt < self.retries => {
                    tracing::debug!(request_id = %request_id, error = %err, "connect failed");
                    attempt += 1;
                }
                Err(err) => {
                    return Err(ExError::from(transport_error(&method, &url, &err))
                        .with_request_id(request_id));
                }
            }
        }
    }
}

/// A fully read response with the request that produced it
#[derive(Debug, Clone)]
pub struct HttpResponse {
    request_id: RequestId,
    method: Method,
    url: Url,
    request_headers: HeaderMap,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    elapsed: Duration,
}

impl HttpResponse {
    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Headers as sent, including client defaults
    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    pub fn content_length(&self) -> Option<&str> {
        self.header(CONTENT_LENGTH.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            ExError::from(PaladinError::InvalidInput {
                reason: format!("invalid JSON from {}: {}", self.url, e),
            })
            .with_request_id(self.request_id.clone())
        })
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Fail on a status of 400 and above
    ///
    /// # Errors
    ///
    /// `ExternalService` naming the method, URL and status.
    pub fn error_for_status_ref(&self) -> Result<&Self> {
        if !self.is_error() {
            return Ok(self);
        }
        Err(ExError::from(PaladinError::HttpStatus {
            method: self.method.to_string(),
            url: self.url.to_string(),
            status: self.status.as_u16(),
        })
        .with_request_id(self.request_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paladin_core::ExErrorKind;

    fn client(options: ClientOptions) -> HttpClient {
        default_client(options, &HttpClientConfig::default()).unwrap()
    }

    #[test]
    fn test_retry_delay_doubles_then_caps() {
        assert_eq!(retry_delay(1), Duration::from_millis(100));
        assert_eq!(retry_delay(2), Duration::from_millis(200));
        assert_eq!(retry_delay(4), Duration::from_millis(800));
        assert_eq!(retry_delay(60), Duration::from_millis(RETRY_MAX_DELAY_MS));
        assert_eq!(retry_delay(u32::MAX), Duration::from_millis(RETRY_MAX_DELAY_MS));
    }

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("Content-Type:  application/json ").unwrap();
        assert_eq!(name, CONTENT_TYPE);
        assert_eq!(value, "application/json");

        let err = parse_header("no-colon").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(parse_header("bad name: x").is_err());
    }

    #[test]
    fn test_resolve_joins_base_url() {
        let with_base = client(ClientOptions::new().base_url("https://ipinfo.io"));
        assert_eq!(with_base.resolve("/json").unwrap().as_str(), "https://ipinfo.io/json");
        assert_eq!(
            with_base.resolve("http://ip-api.com/json").unwrap().as_str(),
            "http://ip-api.com/json"
        );

        let without_base = client(ClientOptions::new());
        assert_eq!(
            without_base.resolve("/json").unwrap_err().kind(),
            ExErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = default_client(
            ClientOptions::new().base_url("not a url"),
            &HttpClientConfig::default(),
        )
        .err()
        .unwrap();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_options_fall_back_to_config() {
        let conf = HttpClientConfig {
            timeout: 5,
            retries: 3,
        };
        let c = default_client(ClientOptions::new(), &conf).unwrap();
        assert_eq!(c.retries, 3);

        let c = default_client(ClientOptions::new().retries(0), &conf).unwrap();
        assert_eq!(c.retries, 0);
    }

    #[test]
    fn test_bearer_token_is_sensitive_header() {
        let c = client(ClientOptions::new().bearer_token("secret"));
        let value = c.default_headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value, "Bearer secret");
    }
}
