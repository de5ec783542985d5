//! HTTP surface integration tests
//!
//! Drives the assembled router with in-process requests and checks the
//! response envelope and access control.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use booking_server::core::{Config, ServerState};
use booking_server::db;
use booking_server::db::models::reservation::Sentiment;
use booking_server::services::{
    OptionInsights, ReviewSnapshot, SentimentClassifier, SentimentError,
};

struct FixedClassifier;

#[async_trait]
impl SentimentClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment, SentimentError> {
        Ok(Sentiment::Neutral)
    }

    async fn summarize_reviews(
        &self,
        _option_name: &str,
        _reviews: &[ReviewSnapshot],
    ) -> Result<OptionInsights, SentimentError> {
        Ok(OptionInsights {
            analysis: "fixed".into(),
            recommendation: "fixed".into(),
        })
    }
}

async fn test_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path(), 0);
    config.ensure_work_dir_structure().expect("work dir");

    let db_path = config.database_dir();
    let database = db::connect(db_path.to_str().expect("utf8 path"))
        .await
        .expect("connect");
    db::ensure_admin(&database, &config.admin_email, &config.admin_password)
        .await
        .expect("seed admin");

    let state = ServerState::with_parts(config, database, Arc::new(FixedClassifier));
    (booking_server::api::create_router(state), dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn authed_json(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({"email": email, "password": password}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    body["data"]["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn register_login_and_me_roundtrip() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": "password123"
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "user");

    let token = login(&app, "jane@example.com", "password123").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "jane@example.com");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let (app, _dir) = test_app().await;
    let payload = serde_json::json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "password": "password123"
    });

    let first = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", payload.clone()))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", payload))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn bad_credentials_answer_uniformly() {
    let (app, _dir) = test_app().await;

    for (email, password) in [
        ("nobody@example.com", "password123"),
        ("admin@example.com", "wrong-password"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({"email": email, "password": password}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Invalid email or password");
    }
}

#[tokio::test]
async fn analytics_requires_admin_role() {
    let (app, _dir) = test_app().await;

    // No token at all
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/analytics")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Regular user token
    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": "password123"
            }),
        ))
        .await
        .expect("response");
    let token = login(&app, "jane@example.com", "password123").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/analytics")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Seeded admin passes
    let admin_token = login(&app, "admin@example.com", "test-admin-password").await;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/analytics")
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["total_reservations"], 0);
}

#[tokio::test]
async fn foreign_reservation_answers_not_found() {
    let (app, _dir) = test_app().await;

    for (name, email) in [
        ("Jane Doe", "jane@example.com"),
        ("Sam Roe", "sam@example.com"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                serde_json::json!({"name": name, "email": email, "password": "password123"}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
    let jane = login(&app, "jane@example.com", "password123").await;
    let sam = login(&app, "sam@example.com", "password123").await;
    let admin = login(&app, "admin@example.com", "test-admin-password").await;

    // Admin sets up a bookable option
    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/packages",
            &admin,
            serde_json::json!({"name": "City Break"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let package_id = body_json(response).await["data"]["id"]
        .as_str()
        .expect("package id")
        .to_string();

    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/package-options",
            &admin,
            serde_json::json!({
                "package_id": package_id,
                "name": "One night",
                "price": "50.00"
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let option_id = body_json(response).await["data"]["id"]
        .as_str()
        .expect("option id")
        .to_string();

    let future = chrono::Utc::now().timestamp_millis() + 86_400_000;
    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/reservations",
            &jane,
            serde_json::json!({
                "package_option_id": option_id,
                "reservation_datetime": future,
                "address": "5 Harbour Street"
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let reservation_id = body_json(response).await["data"]["id"]
        .as_str()
        .expect("reservation id")
        .to_string();

    // Another user cannot observe, cancel or review the booking;
    // each path answers as if the record did not exist
    let response = app
        .clone()
        .oneshot(authed_get(
            &format!("/api/reservations/{}", reservation_id),
            &sam,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            &format!("/api/reservations/{}/cancel", reservation_id),
            &sam,
            serde_json::json!({}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            &format!("/api/reservations/{}/review", reservation_id),
            &sam,
            serde_json::json!({"review_text": "Not my booking", "rating": 3}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The owner still sees it
    let response = app
        .clone()
        .oneshot(authed_get(
            &format!("/api/reservations/{}", reservation_id),
            &jane,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["address"], "5 Harbour Street");
}

#[tokio::test]
async fn reservation_create_rejects_past_datetime_and_missing_address() {
    let (app, _dir) = test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "password": "password123"
            }),
        ))
        .await
        .expect("response");
    let token = login(&app, "jane@example.com", "password123").await;

    let past = chrono::Utc::now().timestamp_millis() - 1000;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reservations")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    serde_json::json!({
                        "package_option_id": "package_option:none",
                        "reservation_datetime": past,
                        "address": "5 Harbour Street"
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let future = chrono::Utc::now().timestamp_millis() + 86_400_000;
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reservations")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    serde_json::json!({
                        "package_option_id": "package_option:none",
                        "reservation_datetime": future,
                        "address": "   "
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
