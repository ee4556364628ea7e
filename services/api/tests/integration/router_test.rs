use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::{TestResponse, TestServer};
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use uuid::Uuid;

use tempmail_api::domain::types::AdminAccount;
use tempmail_api::infra::admin::StaticAdminDirectory;
use tempmail_api::router::{RouterOptions, build_router};
use tempmail_api::state::AppState;
use tempmail_api_schema::{access_codes, sessions, temp_addresses};
use tempmail_auth_types::token::Role;
use tempmail_testing::auth::{admin_token, mint_token, session_token};

use crate::helpers::{TEST_JWT_SECRET, TEST_MAIL_DOMAIN};

const ADMIN_PASSWORD: &str = "router-test-password";

fn state(db: DatabaseConnection) -> AppState {
    AppState {
        db: Arc::new(db),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        mail_domain: TEST_MAIL_DOMAIN.to_owned(),
        admins: StaticAdminDirectory::new(vec![AdminAccount {
            username: "admin".to_owned(),
            password_hash: bcrypt::hash(ADMIN_PASSWORD, 4).unwrap(),
        }]),
        trust_forwarded_for: false,
    }
}

fn server_with(db: DatabaseConnection, mock_ingest_enabled: bool) -> TestServer {
    let options = RouterOptions {
        cors_origins: vec!["*".to_owned()],
        mock_ingest_enabled,
    };
    TestServer::new(build_router(state(db), &options)).unwrap()
}

fn server() -> TestServer {
    server_with(DatabaseConnection::Disconnected, false)
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

fn assert_kind(response: &TestResponse, status: StatusCode, kind: &str) {
    response.assert_status(status);
    let body: Value = response.json();
    assert_eq!(body["kind"], kind);
}

fn live_session_model(id: Uuid) -> sessions::Model {
    let now = Utc::now();
    sessions::Model {
        id,
        code_id: Uuid::new_v4(),
        expires_at: now + Duration::hours(1),
        created_at: now,
    }
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_liveness_and_unready_without_database() {
    let server = server();

    server.get("/healthz").await.assert_status_ok();
    server
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_stamp_request_id_on_responses() {
    let response = server().get("/healthz").await;
    assert!(
        response
            .headers()
            .contains_key(HeaderName::from_static("x-request-id"))
    );
}

// ── Session auth ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_mailbox_routes_without_token() {
    let server = server();

    for path in ["/api/emails", "/api/messages"] {
        let response = server.get(path).await;
        assert_kind(&response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");
    }
}

#[tokio::test]
async fn should_reject_admin_token_on_mailbox_routes() {
    let response = server()
        .get("/api/emails")
        .add_header(AUTHORIZATION, bearer(&admin_token("admin")))
        .await;
    assert_kind(&response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");
}

#[tokio::test]
async fn should_return_not_found_for_malformed_message_id() {
    let session_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![live_session_model(session_id)]])
        .into_connection();

    let response = server_with(db, false)
        .get("/api/messages/not-a-uuid")
        .add_header(AUTHORIZATION, bearer(&session_token(session_id)))
        .await;
    assert_kind(&response, StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND");
}

// ── Admin auth ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_gate_admin_routes() {
    let server = server();

    let response = server.get("/api/admin/codes").await;
    assert_kind(&response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");

    let response = server
        .get("/api/admin/stats")
        .add_header(AUTHORIZATION, bearer(&session_token(Uuid::new_v4())))
        .await;
    assert_kind(&response, StatusCode::FORBIDDEN, "FORBIDDEN");
}

#[tokio::test]
async fn should_treat_expired_admin_token_as_invalid() {
    let response = server()
        .get("/api/admin/codes")
        .add_header(AUTHORIZATION, bearer(&mint_token("admin", Role::Admin, -60)))
        .await;
    assert_kind(&response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN");
}

#[tokio::test]
async fn should_login_admin_and_reject_bad_password() {
    let server = server();

    let response = server
        .post("/api/admin/login")
        .json(&json!({ "username": "admin", "password": "nope" }))
        .await;
    assert_kind(&response, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");

    let response = server
        .post("/api/admin/login")
        .json(&json!({ "username": "admin", "password": ADMIN_PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["username"], "admin");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn should_reject_out_of_range_expiry_before_storage() {
    let server = server();
    let out_of_range = [
        json!(0),
        json!(721),
        json!(-1),
        json!(99_999_999_999_u64),
        json!(1.5),
    ];
    for expiry_hours in out_of_range {
        let response = server
            .post("/api/admin/generate-code")
            .add_header(AUTHORIZATION, bearer(&admin_token("admin")))
            .json(&json!({ "expiry_hours": expiry_hours }))
            .await;
        assert_kind(&response, StatusCode::BAD_REQUEST, "INVALID_EXPIRY");
    }
}

#[tokio::test]
async fn should_answer_malformed_bodies_with_error_kind() {
    let server = server();

    let response = server.post("/api/verify-code").json(&json!({})).await;
    assert_kind(&response, StatusCode::BAD_REQUEST, "INVALID_REQUEST");

    let response = server
        .post("/api/admin/login")
        .text("not json")
        .content_type("application/json")
        .await;
    assert_kind(&response, StatusCode::BAD_REQUEST, "INVALID_REQUEST");

    let response = server
        .post("/api/admin/generate-code")
        .add_header(AUTHORIZATION, bearer(&admin_token("admin")))
        .json(&json!({ "expiry_hours": "twelve" }))
        .await;
    assert_kind(&response, StatusCode::BAD_REQUEST, "INVALID_REQUEST");
}

#[tokio::test]
async fn should_list_codes_with_derived_status() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            access_codes::Model {
                id: Uuid::new_v4(),
                code: "FRESH001".to_owned(),
                duration_hours: 12,
                expires_at: now + Duration::hours(12),
                used_at: None,
                session_id: None,
                created_by: "admin".to_owned(),
                created_at: now,
            },
            access_codes::Model {
                id: Uuid::new_v4(),
                code: "STALE001".to_owned(),
                duration_hours: 1,
                expires_at: now - Duration::hours(1),
                used_at: None,
                session_id: None,
                created_by: "admin".to_owned(),
                created_at: now - Duration::hours(2),
            },
        ]])
        .into_connection();

    let response = server_with(db, false)
        .get("/api/admin/codes")
        .add_header(AUTHORIZATION, bearer(&admin_token("admin")))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body[0]["code"], "FRESH001");
    assert_eq!(body[0]["status"], "active");
    assert_eq!(body[0]["used"], false);
    assert_eq!(body[1]["status"], "expired");
    assert_eq!(body[1]["used_at"], Value::Null);
}

#[tokio::test]
async fn should_reject_malformed_code_id_on_revoke() {
    let response = server()
        .delete("/api/admin/codes/not-a-uuid")
        .add_header(AUTHORIZATION, bearer(&admin_token("admin")))
        .await;
    assert_kind(&response, StatusCode::NOT_FOUND, "CODE_NOT_FOUND");
}

// ── Mock ingest ──────────────────────────────────────────────────────────────

fn mock_email() -> Value {
    json!({
        "to_email": "nobody0000@tempmail.local",
        "from_email": "sender@example.com",
        "subject": "hi",
        "body": "hello",
    })
}

#[tokio::test]
async fn should_not_mount_mock_ingest_by_default() {
    server()
        .post("/api/mock-email")
        .json(&mock_email())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn should_reject_mock_ingest_for_unknown_address() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<temp_addresses::Model>::new()])
        .into_connection();

    let response = server_with(db, true)
        .post("/api/mock-email")
        .json(&mock_email())
        .await;
    assert_kind(&response, StatusCode::NOT_FOUND, "ADDRESS_NOT_FOUND");
}
