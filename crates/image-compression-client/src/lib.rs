#![warn(missing_docs)]
//! # image-compression-client
//!
//! ## Purpose
//! Thin HTTP client for the remote compression service.
//!
//! ## Responsibilities
//! - Resolve once per page load whether the app is served from the root or from
//!   the `/image-compression-app` mount, and derive every endpoint path from
//!   that single decision.
//! - Send the `image` + `quality` multipart body through an injectable
//!   [`CompressTransport`].
//! - Interpret the JSON response, treating an `error` field as a failure even
//!   on HTTP 2xx.
//!
//! ## Data flow
//! Page URL -> [`MountContext::from_page_url`] -> [`EndpointPaths`] ->
//! [`CompressClient::compress`] -> [`CompressTransport::post_multipart`] ->
//! [`parse_compress_response`] -> [`CompressionResult`].
//!
//! ## Error model
//! Every failure maps onto one [`CompressError`] variant whose display string
//! carries the underlying reason. No partial result is ever returned.
//!
//! ## Example
//! ```rust
//! use image_compression_client::{EndpointPaths, MountContext};
//!
//! let mount = MountContext::from_page_url("https://host.test/image-compression-app/")
//!     .expect("valid page url");
//! assert_eq!(EndpointPaths::new(mount).compress(), "/image-compression-app/compress");
//! ```

mod http;

use std::sync::Arc;

use image_compression_core::{CompressionRequest, CompressionResult, MultipartForm};
use serde_json::Value;
use thiserror::Error;
use url::Url;

pub use http::ReqwestTransport;

/// Path prefix used when the app is mounted inside a parent site.
pub const MOUNT_PREFIX: &str = "/image-compression-app";

/// Where the page is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountContext {
    /// Served at the application root; endpoints have no prefix.
    Root,
    /// Served under [`MOUNT_PREFIX`].
    Mounted,
}

impl MountContext {
    /// Resolves the mount from a page path such as `/` or `/image-compression-app/`.
    pub fn from_path(path: &str) -> Self {
        match path {
            "" | "/" | "/index.html" => Self::Root,
            _ => Self::Mounted,
        }
    }

    /// Resolves the mount from a full page URL.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidPageUrl`] when `page_url` does not parse.
    pub fn from_page_url(page_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(page_url)
            .map_err(|error| ClientError::InvalidPageUrl(format!("{page_url}: {error}")))?;
        Ok(Self::from_path(parsed.path()))
    }

    /// Path prefix for this mount (`""` or [`MOUNT_PREFIX`]).
    pub fn base(self) -> &'static str {
        match self {
            Self::Root => "",
            Self::Mounted => MOUNT_PREFIX,
        }
    }
}

/// Endpoint paths derived from one resolved [`MountContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPaths {
    mount: MountContext,
}

impl EndpointPaths {
    /// Binds paths to a resolved mount.
    pub fn new(mount: MountContext) -> Self {
        Self { mount }
    }

    /// Mount these paths were built for.
    pub fn mount(&self) -> MountContext {
        self.mount
    }

    /// `POST` target for compression.
    pub fn compress(&self) -> String {
        format!("{}/compress", self.mount.base())
    }

    /// Server-side download path for a named artifact.
    pub fn download(&self, filename: &str) -> String {
        format!("{}/download/{filename}", self.mount.base())
    }
}

/// Raw HTTP response handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Reason phrase (may be empty).
    pub reason: String,
    /// Response body as text.
    pub body: String,
}

/// Abstract transport used by the compress client.
pub trait CompressTransport: Send + Sync {
    /// Sends a multipart `POST` to `url`.
    ///
    /// # Errors
    /// Returns [`CompressError::Transport`] when the request cannot complete.
    fn post_multipart(&self, url: &str, form: &MultipartForm) -> Result<HttpResponse, CompressError>;
}

/// Client bound to one origin, one mount, and one transport.
#[derive(Clone)]
pub struct CompressClient {
    origin: Url,
    paths: EndpointPaths,
    transport: Arc<dyn CompressTransport>,
}

impl CompressClient {
    /// Creates a client from the page URL, resolving the mount once.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidPageUrl`] when `page_url` does not parse
    /// or cannot serve as a base for endpoint paths.
    pub fn new(page_url: &str, transport: Arc<dyn CompressTransport>) -> Result<Self, ClientError> {
        let origin = Url::parse(page_url)
            .map_err(|error| ClientError::InvalidPageUrl(format!("{page_url}: {error}")))?;
        if origin.cannot_be_a_base() {
            return Err(ClientError::InvalidPageUrl(format!(
                "{page_url}: url cannot be used as a base"
            )));
        }

        let mount = MountContext::from_path(origin.path());
        log::info!(target: "compress", "mount_resolved: base={:?}", mount.base());

        Ok(Self {
            origin,
            paths: EndpointPaths::new(mount),
            transport,
        })
    }

    /// Paths this client resolved at construction.
    pub fn paths(&self) -> EndpointPaths {
        self.paths
    }

    /// Absolute URL of the compress endpoint.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidPageUrl`] when the join fails.
    pub fn compress_url(&self) -> Result<Url, ClientError> {
        self.origin
            .join(&self.paths.compress())
            .map_err(|error| ClientError::InvalidPageUrl(error.to_string()))
    }

    /// Uploads one source and returns the server's result.
    ///
    /// # Errors
    /// Returns a [`CompressError`] for transport failures, non-2xx statuses,
    /// malformed bodies, and server-reported `error` fields.
    pub fn compress(
        &self,
        request: &CompressionRequest<'_>,
    ) -> Result<CompressionResult, CompressError> {
        let url = self
            .compress_url()
            .map_err(|error| CompressError::Transport(error.to_string()))?;
        let form = request.to_form();

        log::info!(
            target: "compress",
            "request: url={url} quality={} size={}",
            request.quality.value(),
            request.source.size_bytes()
        );

        let response = self.transport.post_multipart(url.as_str(), &form)?;
        log::debug!(target: "compress", "response: status={}", response.status);
        interpret_response(&response)
    }
}

/// Turns a raw HTTP response into a result or a classified error.
///
/// # Errors
/// Returns [`CompressError::Status`] for non-2xx responses, otherwise defers to
/// [`parse_compress_response`].
pub fn interpret_response(response: &HttpResponse) -> Result<CompressionResult, CompressError> {
    if !(200..300).contains(&response.status) {
        return Err(CompressError::Status {
            code: response.status,
            reason: response.reason.clone(),
        });
    }

    parse_compress_response(&response.body)
}

/// Parses a 2xx compress response body.
///
/// # Errors
/// Returns [`CompressError::Malformed`] for non-JSON bodies or missing/mistyped
/// fields, and [`CompressError::Logical`] when the body carries a non-empty
/// `error`.
pub fn parse_compress_response(body: &str) -> Result<CompressionResult, CompressError> {
    let value: Value =
        serde_json::from_str(body).map_err(|error| CompressError::Malformed(error.to_string()))?;

    if let Some(error) = value.get("error").filter(|error| is_truthy(error)) {
        let message = match error {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        };
        return Err(CompressError::Logical(message));
    }

    serde_json::from_value(value).map_err(|error| CompressError::Malformed(error.to_string()))
}

/// An `error` field only signals failure when it carries a value; `null`,
/// `false`, `0`, and `""` are treated as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coarse failure category for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request never completed.
    Transport,
    /// Server answered with a non-2xx status.
    Protocol,
    /// Body could not be decoded.
    Malformed,
    /// Server reported a failure in the body.
    Logical,
}

/// Classifies a compress failure.
pub fn classify_compress_error(error: &CompressError) -> ErrorKind {
    match error {
        CompressError::Transport(_) => ErrorKind::Transport,
        CompressError::Status { .. } => ErrorKind::Protocol,
        CompressError::Malformed(_) => ErrorKind::Malformed,
        CompressError::Logical(_) => ErrorKind::Logical,
    }
}

/// Failures of one compress attempt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompressError {
    /// Network or transport failure.
    #[error("{0}")]
    Transport(String),
    /// Non-2xx HTTP status.
    #[error("Server returned {code}: {reason}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Reason phrase.
        reason: String,
    },
    /// Body was not valid JSON or lacked mandatory fields.
    #[error("invalid response body: {0}")]
    Malformed(String),
    /// Server-reported error message.
    #[error("{0}")]
    Logical(String),
}

/// Client construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Page URL could not be parsed or joined.
    #[error("invalid page url: {0}")]
    InvalidPageUrl(String),
}
