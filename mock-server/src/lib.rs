use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const ERROR_EMAIL_ALREADY_EXISTS: i64 = 10;
pub const ERROR_MISSING_FIELD: i64 = 11;
pub const ERROR_INVALID_LANDING: i64 = 12;

const REQUIRED_FIELDS: [&str; 7] = [
    "firstName",
    "lastName",
    "email",
    "password",
    "phone",
    "country",
    "locale",
];

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub dial_code: String,
}

/// A registration as the server stored it.
#[derive(Clone, Debug)]
pub struct User {
    pub id: u64,
    pub fields: HashMap<String, String>,
    pub landing: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct Registry {
    users: Vec<User>,
}

impl Registry {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.fields.get("email").map(String::as_str) == Some(email))
    }
}

pub type Db = Arc<RwLock<Registry>>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/index/countries", post(list_countries).get(list_countries))
        .route("/index/register", post(register))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Db::default()).await
}

pub async fn serve(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

pub fn countries() -> Vec<Country> {
    [
        (1, "United Kingdom", "+44"),
        (2, "Germany", "+49"),
        (3, "Cyprus", "+357"),
        (4, "Australia", "+61"),
    ]
    .into_iter()
    .map(|(id, name, dial_code)| Country {
        id,
        name: name.to_string(),
        dial_code: dial_code.to_string(),
    })
    .collect()
}

async fn list_countries() -> Json<serde_json::Value> {
    Json(json!({ "data": countries() }))
}

async fn register(
    State(db): State<Db>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if let Some(missing) = REQUIRED_FIELDS
        .iter()
        .find(|name| form.get(**name).is_none_or(|v| v.trim().is_empty()))
    {
        return failure(ERROR_MISSING_FIELD, &format!("Missing field: {missing}"));
    }
    let password_ok = form
        .get("password")
        .is_some_and(|p| p.len() == 32 && p.chars().all(|c| c.is_ascii_hexdigit()));
    if !password_ok {
        return failure(ERROR_MISSING_FIELD, "Invalid field: password");
    }
    let landing: BTreeMap<String, String> =
        match serde_json::from_str(form.get("landing").map_or("{}", String::as_str)) {
            Ok(landing) => landing,
            Err(_) => return failure(ERROR_INVALID_LANDING, "Invalid landing parameters"),
        };

    let mut registry = db.write().await;
    let email = form.get("email").cloned().unwrap_or_default();
    if registry.find_by_email(&email).is_some() {
        return failure(ERROR_EMAIL_ALREADY_EXISTS, "Email already exists");
    }
    let id = 1000 + registry.users.len() as u64;
    registry.users.push(User {
        id,
        fields: form,
        landing,
    });
    tracing::info!(id, email = %email, "registered user");
    (StatusCode::OK, Json(id.to_string())).into_response()
}

fn failure(code: i64, message: &str) -> Response {
    tracing::warn!(code, reason = message, "registration rejected");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "code": code, "message": message } })),
    )
        .into_response()
}
