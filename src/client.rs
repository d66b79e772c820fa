//! Authenticated HTTP client for the Lolipop! Managed Cloud API.
//!
//! Every domain operation goes through the same pipeline:
//! [`Client::request`] builds a fully addressed `reqwest::Request`, the
//! transport executes it, and [`dispose`](crate::response) buffers and
//! classifies the response. Domain modules (`auth`, `project`, `pubkey`) add
//! their operations as further `impl Client` blocks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::{Level, Log, Metadata, Record};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{Method, Request};
use serde::Serialize;
use url::Url;

use crate::auth::Token;
use crate::config::Config;
use crate::constants::{DEFAULT_TIMEOUT_SECS, LOG_TARGET, PROJECT_URL, VERSION};
use crate::error::{Error, Result};
use crate::response::{dispose, BufferedResponse};

/// Per-call request parameters. Built fresh for each request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub params: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Bytes>,
    pub content_length: Option<u64>,
    /// Mask the response body in debug logs. Set for responses carrying credentials.
    pub redact_response: bool,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying `value` serialized as the JSON body.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(Self::new().body(body))
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    pub fn redact_response(mut self) -> Self {
        self.redact_response = true;
        self
    }
}

/// Forwards to whatever logger the process installed through the `log` facade.
struct GlobalLogger;

impl Log for GlobalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record) {
        log::logger().log(record)
    }

    fn flush(&self) {
        log::logger().flush()
    }
}

#[derive(Clone)]
pub struct Client {
    base_url: Url,
    transport: reqwest::Client,
    default_headers: HeaderMap,
    token: Option<Token>,
    tls_no_verify: bool,
    logger: Arc<dyn Log>,
}

impl Client {
    /// Client for `endpoint` with certificate verification on and the default timeout.
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::build(
            endpoint,
            false,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Client built from loaded configuration, pre-seeded with its token if any.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::build(
            &config.endpoint,
            config.tls_no_verify,
            Duration::from_secs(config.timeout_secs),
        )?;
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            client.set_token(token);
        }
        Ok(client)
    }

    fn build(endpoint: &str, tls_no_verify: bool, timeout: Duration) -> Result<Self> {
        if endpoint.is_empty() {
            return Err(Error::Config("missing url".to_string()));
        }
        if timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        let base_url = Url::parse(endpoint)?;

        let transport = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(tls_no_verify)
            .build()
            .map_err(|e| Error::Config(format!("building transport: {e}")))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent())
                .map_err(|e| Error::Config(format!("invalid user agent: {e}")))?,
        );

        Ok(Self {
            base_url,
            transport,
            default_headers,
            token: None,
            tls_no_verify,
            logger: Arc::new(GlobalLogger),
        })
    }

    /// Route this client's diagnostics to `logger` instead of the global one.
    pub fn with_logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn tls_no_verify(&self) -> bool {
        self.tls_no_verify
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn set_token(&mut self, token: impl Into<Token>) {
        self.token = Some(token.into());
    }

    /// Build a request for `verb` on `path` relative to the endpoint.
    pub fn request(&self, verb: &str, path: &str, options: RequestOptions) -> Result<Request> {
        self.emit(Level::Info, format_args!("request: {verb} {path}"));

        if verb.is_empty() {
            return Err(Error::Config("missing verb".to_string()));
        }
        let method = Method::from_bytes(verb.as_bytes())
            .map_err(|_| Error::Config(format!("invalid verb: {verb}")))?;

        let url = self.url_for(path, &options.params);

        let mut headers = self.default_headers.clone();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| Error::Config("token is not a valid header value".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(length) = options.content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }

        let mut request = Request::new(method, url);
        *request.headers_mut() = headers;
        if let Some(body) = options.body {
            *request.body_mut() = Some(body.into());
        }

        self.emit(Level::Debug, format_args!("raw request: {request:?}"));
        Ok(request)
    }

    /// Build, send and dispose of a request in one step.
    pub async fn http(
        &self,
        verb: &str,
        path: &str,
        options: RequestOptions,
    ) -> Result<BufferedResponse> {
        let redact = options.redact_response;
        let request = self.request(verb, path, options)?;
        let response = self.transport.execute(request).await?;
        dispose(self, response, redact).await
    }

    fn url_for(&self, path: &str, params: &BTreeMap<String, String>) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params.iter());
        }
        url
    }

    pub(crate) fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder().level(level).target(LOG_TARGET).build();
        if !self.logger.enabled(&metadata) {
            return;
        }
        self.logger
            .log(&Record::builder().metadata(metadata).args(args).build());
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token)
            .field("tls_no_verify", &self.tls_no_verify)
            .finish()
    }
}

/// Encode `name` as exactly one path segment.
///
/// `/` and `%` are percent-encoded so the name cannot climb out of or
/// extend the route it is placed in; bare dot segments are refused.
pub(crate) fn path_segment(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::Input("name"));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidName(name.to_string()));
    }
    let mut scratch = Url::parse("http://localhost/")?;
    scratch
        .path_segments_mut()
        .map_err(|_| Error::Config("cannot encode path segment".to_string()))?
        .push(name);
    Ok(scratch.path().trim_start_matches('/').to_string())
}

fn user_agent() -> String {
    format!(
        "lolp/{VERSION} (+{PROJECT_URL}; rust/{}-{})",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
