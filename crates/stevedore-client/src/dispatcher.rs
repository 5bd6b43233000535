//! HTTP request dispatch against the daemon.
//!
//! A [`Dispatcher`] performs exactly one HTTP request per [`Dispatcher::execute`]
//! call. The calling thread blocks until the transport resolves; there is no
//! retry, no caching, and no state shared between calls beyond the read-only
//! connection settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;

use stevedore_common::config::ClientConfig;
use stevedore_common::constants::JSON_CONTENT_TYPE;
use stevedore_common::error::{Result, StevedoreError};

use crate::mapping::WireBody;
use crate::query::QueryParams;

/// How the body of a successful exchange is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Parse the body as JSON.
    Json,
    /// Completing the exchange is the result; the body is ignored.
    Boolean,
    /// Return the body as text.
    Text,
    /// No interpretation. Declared for completeness; the dispatcher refuses it.
    None,
}

impl ResponseKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::None => "none",
        }
    }

    fn unsupported(self) -> StevedoreError {
        StevedoreError::UnsupportedExpectation {
            kind: self.as_str().to_string(),
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseKind {
    type Err = StevedoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "boolean" => Ok(Self::Boolean),
            "text" => Ok(Self::Text),
            "none" => Ok(Self::None),
            other => Err(StevedoreError::UnsupportedExpectation {
                kind: other.to_string(),
            }),
        }
    }
}

/// Outcome of a completed exchange, shaped by the requested [`ResponseKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Parsed JSON body.
    Json(Value),
    /// The exchange completed.
    Success,
    /// Raw body text.
    Text(String),
}

impl Reply {
    /// Returns the JSON body, if this is a JSON reply.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Success | Self::Text(_) => None,
        }
    }

    /// Returns the body text, if this is a text reply.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Success | Self::Json(_) => None,
        }
    }
}

/// Everything needed to issue one request. Built per call, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Absolute request path, e.g. `/containers/json`.
    pub path: String,
    /// Query string parameters.
    pub query: QueryParams,
    /// JSON body, sent as `application/json`.
    pub body: Option<WireBody>,
    /// How to interpret the response.
    pub expect: ResponseKind,
    /// Exempt from the request timeout (long-polling endpoints).
    pub unbounded: bool,
}

impl RequestDescriptor {
    /// Creates a descriptor with no query, no body, and the timeout applied.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, expect: ResponseKind) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            expect,
            unbounded: false,
        }
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: WireBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Lets the request wait for as long as the daemon takes.
    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.unbounded = true;
        self
    }
}

/// Issues requests against one daemon.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: HttpClient,
    base_url: Url,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Creates a dispatcher for the daemon described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StevedoreError::Config`] if the address is invalid or the
    /// HTTP client cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        // Timeouts are applied per request so long polls can opt out.
        let http = HttpClient::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| StevedoreError::Config {
                message: format!("unable to initialise HTTP client: {e}"),
            })?;

        tracing::debug!(base_url = %base_url, "dispatcher ready");
        Ok(Self {
            http,
            base_url,
            timeout: config.request_timeout(),
        })
    }

    /// The `http://host:port/` every path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the full URL for `path` and `query`, percent-encoding both.
    #[must_use]
    pub fn url_for(&self, path: &str, query: &QueryParams) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        if !query.is_empty() {
            let _ = url
                .query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }

    /// Performs the request and interprets the response.
    ///
    /// # Errors
    ///
    /// - [`StevedoreError::UnsupportedExpectation`] for [`ResponseKind::None`],
    ///   before anything is sent.
    /// - [`StevedoreError::RequestFailed`] when the transport fails or the
    ///   timeout expires.
    /// - [`StevedoreError::ResponseParseError`] when a JSON body is malformed.
    pub fn execute(&self, request: &RequestDescriptor) -> Result<Reply> {
        if request.expect == ResponseKind::None {
            return Err(request.expect.unsupported());
        }

        let url = self.url_for(&request.path, &request.query);
        tracing::debug!(method = %request.method, url = %url, expect = %request.expect, "dispatching request");

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(Value::Object(body.clone()).to_string());
        }
        if !request.unbounded {
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
        }

        let response = builder.send().map_err(|source| failed(request, source))?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(method = %request.method, path = %request.path, %status, "daemon returned an error status");
        } else {
            tracing::trace!(method = %request.method, path = %request.path, %status, "response received");
        }

        match request.expect {
            ResponseKind::Boolean => Ok(Reply::Success),
            ResponseKind::Json => {
                let bytes = response.bytes().map_err(|source| failed(request, source))?;
                serde_json::from_slice(&bytes)
                    .map(Reply::Json)
                    .map_err(|e| unparsable(request, status, &e.to_string()))
            }
            ResponseKind::Text => {
                let bytes = response.bytes().map_err(|source| failed(request, source))?;
                Ok(Reply::Text(String::from_utf8_lossy(&bytes).into_owned()))
            }
            ResponseKind::None => Err(request.expect.unsupported()),
        }
    }

    /// `GET` returning parsed JSON.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute`].
    pub fn get_json(&self, path: impl Into<String>, query: QueryParams) -> Result<Value> {
        let request = RequestDescriptor::new(Method::GET, path, ResponseKind::Json).query(query);
        self.json(&request)
    }

    /// `POST` returning parsed JSON.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute`].
    pub fn post_json(
        &self,
        path: impl Into<String>,
        query: QueryParams,
        body: Option<WireBody>,
    ) -> Result<Value> {
        let mut request = RequestDescriptor::new(Method::POST, path, ResponseKind::Json).query(query);
        request.body = body;
        self.json(&request)
    }

    /// `POST` whose completion is the result.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute`].
    pub fn post_ok(
        &self,
        path: impl Into<String>,
        query: QueryParams,
        body: Option<WireBody>,
    ) -> Result<bool> {
        let mut request =
            RequestDescriptor::new(Method::POST, path, ResponseKind::Boolean).query(query);
        request.body = body;
        self.execute(&request).map(|_| true)
    }

    /// `DELETE` whose completion is the result.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute`].
    pub fn delete_ok(&self, path: impl Into<String>, query: QueryParams) -> Result<bool> {
        let request =
            RequestDescriptor::new(Method::DELETE, path, ResponseKind::Boolean).query(query);
        self.execute(&request).map(|_| true)
    }

    /// `GET` returning the body as text.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute`].
    pub fn get_text(&self, path: impl Into<String>, query: QueryParams) -> Result<String> {
        let request = RequestDescriptor::new(Method::GET, path, ResponseKind::Text).query(query);
        Ok(self.execute(&request)?.into_text().unwrap_or_default())
    }

    /// Executes a JSON request and unwraps the body.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::execute`].
    pub fn json(&self, request: &RequestDescriptor) -> Result<Value> {
        Ok(self.execute(request)?.into_json().unwrap_or(Value::Null))
    }
}

fn failed(request: &RequestDescriptor, source: reqwest::Error) -> StevedoreError {
    StevedoreError::RequestFailed {
        method: request.method.to_string(),
        path: request.path.clone(),
        source,
    }
}

fn unparsable(request: &RequestDescriptor, status: StatusCode, reason: &str) -> StevedoreError {
    StevedoreError::ResponseParseError {
        method: request.method.to_string(),
        path: request.path.clone(),
        reason: format!("{reason} (HTTP {status})"),
    }
}

/// Builds a [`StevedoreError::ResponseParseError`] for a response whose JSON
/// parsed but did not have the expected shape.
pub(crate) fn malformed(method: &Method, path: &str, reason: impl Into<String>) -> StevedoreError {
    StevedoreError::ResponseParseError {
        method: method.to_string(),
        path: path.to_string(),
        reason: reason.into(),
    }
}
