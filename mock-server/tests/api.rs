use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_db, Db};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

const VALID_FORM: &str = "firstName=Ada&lastName=Lovelace&email=ada%40example.com\
    &confirmed=1&password=5f4dcc3b5aa765d61d8327deb882cf99&phone=%2B441234567\
    &country=GB&locale=en&landing=%7B%22campaign%22%3A%22spring%22%7D&lead=0";

// --- countries ---

#[tokio::test]
async fn countries_via_post_returns_data_envelope() {
    let resp = app()
        .oneshot(form_request("/index/countries", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["dialCode"], "+44");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn countries_via_get_matches_post() {
    let get = app()
        .oneshot(
            Request::builder()
                .uri("/index/countries")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    let post = app()
        .oneshot(form_request("/index/countries", ""))
        .await
        .unwrap();

    assert_eq!(body_json(get).await, body_json(post).await);
}

// --- register ---

#[tokio::test]
async fn register_returns_quoted_id() {
    let db = Db::default();
    let resp = app_with_db(db.clone())
        .oneshot(form_request("/index/register", VALID_FORM))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"\"1000\"");

    let registry = db.read().await;
    let user = registry.find_by_email("ada@example.com").unwrap();
    assert_eq!(user.landing.get("campaign").map(String::as_str), Some("spring"));
    assert_eq!(user.fields["confirmed"], "1");
    assert_eq!(user.fields["lead"], "0");
}

#[tokio::test]
async fn register_duplicate_email_returns_code_10() {
    let db = Db::default();
    let first = app_with_db(db.clone())
        .oneshot(form_request("/index/register", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app_with_db(db.clone())
        .oneshot(form_request("/index/register", VALID_FORM))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(second).await;
    assert_eq!(json["error"]["code"], 10);
    assert_eq!(json["error"]["message"], "Email already exists");
    assert_eq!(db.read().await.users().len(), 1);
}

#[tokio::test]
async fn register_missing_field_returns_code_11() {
    let body = VALID_FORM.replace("&phone=%2B441234567", "");
    let resp = app()
        .oneshot(form_request("/index/register", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["error"]["code"], 11);
    assert_eq!(json["error"]["message"], "Missing field: phone");
}

#[tokio::test]
async fn register_plaintext_password_is_rejected() {
    let body = VALID_FORM.replace("5f4dcc3b5aa765d61d8327deb882cf99", "password");
    let resp = app()
        .oneshot(form_request("/index/register", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"]["code"], 11);
}

#[tokio::test]
async fn register_invalid_landing_returns_code_12() {
    let body = VALID_FORM.replace("%7B%22campaign%22%3A%22spring%22%7D", "not-json");
    let resp = app()
        .oneshot(form_request("/index/register", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["error"]["code"], 12);
}

#[tokio::test]
async fn register_ids_increase() {
    let db = Db::default();
    for (i, email) in ["a%40x.io", "b%40x.io"].iter().enumerate() {
        let body = VALID_FORM.replace("ada%40example.com", email);
        let resp = app_with_db(db.clone())
            .oneshot(form_request("/index/register", &body))
            .await
            .unwrap();
        let expected = format!("\"{}\"", 1000 + i);
        assert_eq!(&body_bytes(resp).await[..], expected.as_bytes());
    }
}
