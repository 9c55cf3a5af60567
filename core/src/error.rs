//! Error types for the registration API client.
//!
//! # Design
//! One enum covers the three failure families callers branch on:
//! - `Transport`: no response was received; propagated untouched.
//! - `MalformedResponse`, `MissingDataSection`, `Protocol`,
//!   `UnexpectedStatus`: the server answered with something that does not
//!   match the contract.
//! - `EmailAlreadyExists`, `MissingRequiredField`, `UnknownApiError`: the
//!   server reported a business failure through its error envelope. These
//!   carry the originating `Payload`.

use crate::http::TransportError;
use crate::payload::Payload;

/// Registration rejected: the email is already registered.
pub const ERROR_EMAIL_ALREADY_EXISTS: i64 = 10;

/// Registration rejected: a required field was absent or invalid.
pub const ERROR_MISSING_FIELD: i64 = 11;

/// Errors returned by `ApiClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body is not a JSON object.
    #[error("malformed response: {reason}")]
    MalformedResponse { reason: String, body: String },

    /// The envelope has neither a `data` nor an `error` section.
    #[error("response carries no data section")]
    MissingDataSection,

    /// The data section does not have the shape the operation expects.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A non-2xx, non-5xx status. Only server errors carry an error envelope.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("email already exists")]
    EmailAlreadyExists(Payload),

    #[error("missing required field")]
    MissingRequiredField(Payload),

    #[error("{message} (code {code:?})", code = .payload.error_code())]
    UnknownApiError { payload: Payload, message: String },

    /// The outgoing form could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Map a failure envelope to its failure kind. Total: every code,
    /// including an absent one, yields exactly one variant.
    pub fn from_payload(payload: Payload) -> Self {
        match payload.error_code() {
            Some(ERROR_EMAIL_ALREADY_EXISTS) => ApiError::EmailAlreadyExists(payload),
            Some(ERROR_MISSING_FIELD) => ApiError::MissingRequiredField(payload),
            _ => ApiError::UnknownApiError {
                payload,
                message: "unknown API error".to_string(),
            },
        }
    }

    /// The server payload behind a business failure.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ApiError::EmailAlreadyExists(payload)
            | ApiError::MissingRequiredField(payload)
            | ApiError::UnknownApiError { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// True when the server reported the failure through its error envelope.
    pub fn is_business_failure(&self) -> bool {
        self.payload().is_some()
    }
}
