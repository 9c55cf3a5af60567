//! HTTP capability for the registration API.
//!
//! # Design
//! Requests and responses are plain data. The pure `build_*` / `parse_*`
//! methods on `ApiClient` work on these values without touching the network;
//! `HttpTransport` is the seam where a real (or fake) HTTP client executes
//! the round-trip.
//!
//! A transport returns `Ok(HttpResponse)` for every response it receives,
//! whatever the status. `Err(TransportError)` means no response arrived at
//! all, and the client propagates it without interpretation.

use std::error::Error as StdError;
use std::sync::Arc;

/// A form POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first form field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// The request never produced a response (connection refused, timeout, DNS
/// failure, truncated body).
#[derive(Debug, thiserror::Error)]
#[error("transport failure: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn from_source<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Executes form POSTs on behalf of `ApiClient`.
///
/// Implementations own connection pooling, TLS, timeouts and cancellation.
/// The client holds no per-call state, so a transport shared across threads
/// only needs to be `Sync` itself.
pub trait HttpTransport {
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_form(url, form)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Box<T> {
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_form(url, form)
    }
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        (**self).post_form(url, form)
    }
}
