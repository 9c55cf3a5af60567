//! Synchronous client for the registration service.
//!
//! # Overview
//! Two operations, `countries` and `register`, are issued as form POSTs
//! against a JSON-over-HTTP API. Responses are decoded through a single
//! envelope parser (`Payload`), and server-reported failures are mapped to
//! typed `ApiError` variants.
//!
//! # Design
//! - `ApiClient` is stateless apart from its base URL and the injected
//!   `HttpTransport`; it is safe to share across threads.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit
//!   and hosts can drive the round-trip themselves.
//! - The default transport (`UreqTransport`, feature `ureq`) is only created
//!   through the named factories `ApiClient::with_default_transport` and
//!   `ApiClient::from_config`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod password;
pub mod payload;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use config::{ClientConfig, TransportConfig};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use payload::{Envelope, ErrorSection, Payload};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Country, RegisterRequest, RegisterResult};
