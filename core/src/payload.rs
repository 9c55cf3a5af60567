//! Response envelope parsing.
//!
//! # Design
//! Every JSON response from the service is an object with either a `data`
//! section or an `error` section. The envelope is decoded once, at parse time,
//! into `Envelope`; callers match on the variant instead of probing nested
//! optional fields. The raw JSON is retained for diagnostics.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// The `error` section of a failure envelope.
///
/// Both fields are optional: a server failure with an unreadable or missing
/// code still dispatches (to `UnknownApiError`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSection {
    pub code: Option<i64>,
    pub message: Option<String>,
}

/// Which half of the envelope the server sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Data(Value),
    Error(ErrorSection),
    /// Neither section is present. Not expected from the server.
    Empty,
}

/// A parsed response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload {
    raw: Value,
    #[serde(skip)]
    envelope: Envelope,
}

impl Payload {
    /// Parse a raw body. Fails with `MalformedResponse` unless the body is a
    /// JSON object.
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        let raw: Value = serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse {
            reason: e.to_string(),
            body: body.to_string(),
        })?;
        let Value::Object(object) = &raw else {
            return Err(ApiError::MalformedResponse {
                reason: "response is not a JSON object".to_string(),
                body: body.to_string(),
            });
        };
        let envelope = classify(object);
        Ok(Self { raw, envelope })
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.envelope, Envelope::Error(_))
    }

    /// The `data` section. Fails with `MissingDataSection` when the envelope
    /// has no data, including failure envelopes whose data is ignored.
    pub fn data(&self) -> Result<&Value, ApiError> {
        match &self.envelope {
            Envelope::Data(data) => Ok(data),
            Envelope::Error(_) | Envelope::Empty => Err(ApiError::MissingDataSection),
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        match &self.envelope {
            Envelope::Error(section) => section.code,
            Envelope::Data(_) | Envelope::Empty => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.envelope {
            Envelope::Error(section) => section.message.as_deref(),
            Envelope::Data(_) | Envelope::Empty => None,
        }
    }
}

fn classify(object: &Map<String, Value>) -> Envelope {
    match object.get("error") {
        Some(Value::Null) | None => {}
        Some(error) => {
            return Envelope::Error(ErrorSection {
                code: error.get("code").and_then(code_value),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }
    match object.get("data") {
        Some(Value::Null) | None => Envelope::Empty,
        Some(data) => Envelope::Data(data.clone()),
    }
}

// Some deployments send the code as a numeric string.
fn code_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
