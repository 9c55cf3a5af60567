//! Request builder, response parser and call orchestration for the
//! registration API.
//!
//! # Design
//! `ApiClient` holds only a normalized `base_url` and a transport, and carries
//! no mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`; `countries` and `register` join the two through the
//! injected `HttpTransport`. Hosts that do their own I/O can call the pure
//! halves directly.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::password;
use crate::payload::Payload;
use crate::types::{Country, RegisterRequest, RegisterResult};

pub const COUNTRIES_PATH: &str = "/index/countries";
pub const REGISTER_PATH: &str = "/index/register";

/// Client for the registration API.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

#[cfg(feature = "ureq")]
impl ApiClient<crate::transport::UreqTransport> {
    /// Client backed by a default `UreqTransport`.
    pub fn with_default_transport(base_url: &str) -> Self {
        Self::new(base_url, crate::transport::UreqTransport::default())
    }

    /// Client backed by a `UreqTransport` configured from `config`.
    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        let transport = crate::transport::UreqTransport::new(&config.transport());
        Self::new(&config.base_url, transport)
    }
}

impl<T> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_countries(&self) -> HttpRequest {
        HttpRequest {
            url: format!("{}{COUNTRIES_PATH}", self.base_url),
            form: Vec::new(),
        }
    }

    pub fn build_register(&self, request: &RegisterRequest) -> Result<HttpRequest, ApiError> {
        let landing = serde_json::to_string(&request.params)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let form = [
            ("firstName", request.first_name.clone()),
            ("lastName", request.last_name.clone()),
            ("email", request.email.clone()),
            ("confirmed", "1".to_string()),
            ("password", password::legacy_digest(&request.password)),
            ("phone", request.phone.clone()),
            ("country", request.country.clone()),
            ("locale", request.locale.clone()),
            ("landing", landing),
            ("lead", "0".to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
        Ok(HttpRequest {
            url: format!("{}{REGISTER_PATH}", self.base_url),
            form,
        })
    }

    pub fn parse_countries(&self, response: HttpResponse) -> Result<Vec<Country>, ApiError> {
        let body = check_status(response)?;
        let payload = success_payload(&body)?;
        let Value::Array(items) = payload.data()? else {
            return Err(ApiError::Protocol("countries data is not an array".to_string()));
        };
        let countries = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Country::deserialize(item)
                    .map_err(|e| ApiError::Protocol(format!("country #{index}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = countries.len(), "decoded countries");
        Ok(countries)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<RegisterResult, ApiError> {
        let body = check_status(response)?;
        let trimmed = body.trim();
        if trimmed.starts_with('{') {
            // A JSON object on success means the server sent an envelope.
            let payload = success_payload(trimmed)?;
            return Err(ApiError::Protocol(format!(
                "expected a quoted user id, got an envelope: {}",
                payload.raw()
            )));
        }
        let user_id = trimmed
            .trim_matches('"')
            .parse::<i64>()
            .map_err(|e| ApiError::Protocol(format!("invalid user id {trimmed:?}: {e}")))?;
        debug!(user_id, "registered user");
        Ok(RegisterResult { user_id })
    }
}

impl<T: HttpTransport> ApiClient<T> {
    /// List the countries the service accepts registrations from, in server
    /// order.
    pub fn countries(&self) -> Result<Vec<Country>, ApiError> {
        let response = self.execute(self.build_countries())?;
        self.parse_countries(response)
    }

    /// Create an account and return its id.
    pub fn register(&self, request: &RegisterRequest) -> Result<RegisterResult, ApiError> {
        let response = self.execute(self.build_register(request)?)?;
        self.parse_register(response)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            url = %request.url,
            fields = ?request.form.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            "sending request"
        );
        let response = self.transport.post_form(&request.url, &request.form)?;
        debug!(url = %request.url, status = response.status, "received response");
        Ok(response)
    }
}

/// Classify the status. 5xx bodies are decoded and dispatched through the
/// error taxonomy; other non-2xx statuses are contract mismatches.
fn check_status(response: HttpResponse) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    if response.is_server_error() {
        let payload = Payload::parse(&response.body)?;
        warn!(
            status = response.status,
            code = ?payload.error_code(),
            message = ?payload.error_message(),
            "server reported failure"
        );
        return Err(ApiError::from_payload(payload));
    }
    Err(ApiError::UnexpectedStatus {
        status: response.status,
        body: response.body,
    })
}

/// Parse a 2xx envelope. An error section is still a failure.
fn success_payload(body: &str) -> Result<Payload, ApiError> {
    let payload = Payload::parse(body)?;
    if payload.is_failure() {
        warn!(code = ?payload.error_code(), "error envelope on success status");
        return Err(ApiError::from_payload(payload));
    }
    Ok(payload)
}
