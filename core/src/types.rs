//! Domain DTOs for the registration API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A country the service accepts registrations from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub dial_code: String,
}

/// Input for `ApiClient::register`.
///
/// `password` is plaintext; it is digested before it leaves the client.
/// `params` are free-form landing attributes (campaign, referrer, ...) sent
/// to the server as a single JSON-encoded `landing` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub country: String,
    pub locale: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResult {
    pub user_id: i64,
}
