use api_types::report::{ReportFormat, ReportRequest};
use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::{TimeZone, Utc};
use engine::{Money, TransactionDraft, TransactionEdit, TransactionId, TransactionKind, TransferRequest};
use serde_json::{Value, json};

use super::*;
use crate::error::AppError;

const TOKEN: &str = "secret-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Invalid token"})),
    )
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "hunter2" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "token": TOKEN,
                "userId": "u1",
                "username": body["username"],
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
    }
}

async fn transactions(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([
            {"_id": "t1", "type": "expense", "category": "Food", "amount": 12.5,
             "date": "2026-02-05T10:00:00Z"},
            {"_id": "t2", "type": "income", "category": "Salary", "amount": 5000,
             "date": "2026-02-01T09:00:00Z", "division": "Office"}
        ])),
    )
}

async fn add_transaction(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut echoed = body.clone();
    echoed["_id"] = json!("srv-1");
    (StatusCode::CREATED, Json(json!({"transaction": echoed})))
}

async fn update_transaction(Path(id): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
    if id == "locked" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Editing is allowed only within 12 hours of creation."})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "_id": id, "type": "expense", "category": body["category"],
            "amount": body["amount"], "date": "2026-02-05T10:00:00Z"
        })),
    )
}

async fn delete_transaction(Path(id): Path<String>) -> StatusCode {
    if id == "missing" {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn reminders() -> Json<Value> {
    Json(json!({"reminders": [
        {"_id": "b1", "name": "Rent", "amount": 12000, "dueDate": "2026-02-10T00:00:00.000Z"},
        {"_id": "b2", "name": "Broken", "amount": 1, "dueDate": "later"}
    ]}))
}

async fn notifications() -> Json<Value> {
    Json(json!({"notifications": [
        {"_id": "n1", "title": "Welcome", "body": "Hi", "createdAt": "2026-02-01T00:00:00Z"},
        {"_id": "n2", "title": "Read", "read": true}
    ], "unreadCount": 1}))
}

async fn transfer(Json(body): Json<Value>) -> impl IntoResponse {
    if body["amount"].as_f64().unwrap_or_default() > 100.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Insufficient balance"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn report() -> impl IntoResponse {
    (
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"monthly-2026-2.pdf\"",
        )],
        b"%PDF-1.4".to_vec(),
    )
}

async fn forgot_password(Json(body): Json<Value>) -> impl IntoResponse {
    if body["username"] != "asha" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "User not found"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "securityQuestion": "Name of your first pet?"})),
    )
}

async fn verify_security(Json(body): Json<Value>) -> impl IntoResponse {
    if body["securityAnswer"] != "rex" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Incorrect answer"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn reset_password(Json(body): Json<Value>) -> impl IntoResponse {
    if body["newPassword"] != body["confirmPassword"] {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Passwords do not match"})),
        );
    }
    (StatusCode::OK, Json(json!({"success": true})))
}

async fn sessions(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({"sessions": [
            {"sessionId": "s1", "device": "Firefox on Linux", "lastActiveAt": "2026-02-05T10:00:00Z"},
            {"sessionId": "s2", "device": ""}
        ]})),
    )
}

async fn revoke_session(Path(id): Path<String>) -> StatusCode {
    if id == "gone" {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn server_error() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/transactions", get(transactions))
        .route("/transactions/add", post(add_transaction))
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
        .route("/reminders", get(reminders))
        .route("/notifications", get(notifications))
        .route("/accounts/transfer", post(transfer))
        .route("/reports/monthly", post(report))
        .route("/accounts", get(server_error))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-security", post(verify_security))
        .route("/auth/reset-password", post(reset_password))
        .route(
            "/sessions",
            get(sessions).delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route("/sessions/me", delete(|| async { StatusCode::NO_CONTENT }))
        .route("/sessions/{id}", delete(revoke_session));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn signed_in(base: &str) -> Client {
    let mut client = Client::new(base).unwrap();
    let login = client.login("asha", "hunter2").await.unwrap();
    client.set_token(Some(login.token));
    client
}

#[tokio::test]
async fn login_maps_bad_credentials_to_unauthorized() {
    let base = spawn_backend().await;
    let client = Client::new(&base).unwrap();
    let err = client.login("asha", "nope").await.unwrap_err();
    assert!(err.is_unauthorized());

    let ok = client.login("asha", "hunter2").await.unwrap();
    assert_eq!(ok.token, TOKEN);
    assert_eq!(ok.user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn requests_carry_bearer_token() {
    let base = spawn_backend().await;
    let anonymous = Client::new(&base).unwrap();
    assert!(matches!(
        anonymous.transactions(&TransactionQuery::default()).await,
        Err(ClientError::Unauthorized)
    ));

    let client = signed_in(&base).await;
    let list = client.transactions(&TransactionQuery::default()).await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].amount, Money::new(1250));
    assert_eq!(list[1].division, engine::Division::Office);
}

#[tokio::test]
async fn add_returns_server_echo() {
    let base = spawn_backend().await;
    let client = signed_in(&base).await;
    let draft = TransactionDraft::new(
        TransactionKind::Expense,
        "Fuel",
        Money::new(4050),
        Utc.with_ymd_and_hms(2026, 2, 5, 10, 0, 0).unwrap(),
    )
    .unwrap();
    let confirmed = client.add_transaction(&draft).await.unwrap().unwrap();
    assert_eq!(confirmed.id, TransactionId::new("srv-1"));
    assert_eq!(confirmed.amount, Money::new(4050));
    assert_eq!(confirmed.category(), Some("Fuel"));
}

#[tokio::test]
async fn update_and_delete_map_errors() {
    let base = spawn_backend().await;
    let client = signed_in(&base).await;
    let edit = TransactionEdit::new("Food", Money::new(700)).unwrap();

    let updated = client
        .update_transaction(&TransactionId::new("t1"), &edit)
        .await
        .unwrap();
    assert_eq!(updated.amount, Money::new(700));

    let err = client
        .update_transaction(&TransactionId::new("locked"), &edit)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref msg) if msg.contains("12 hours")));

    assert!(client.delete_transaction(&TransactionId::new("t1")).await.is_ok());
    assert!(matches!(
        client.delete_transaction(&TransactionId::new("missing")).await,
        Err(ClientError::NotFound)
    ));
}

#[tokio::test]
async fn bills_and_notifications_convert() {
    let base = spawn_backend().await;
    let client = signed_in(&base).await;

    let bills = client.bills().await.unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].amount, Money::from_major(12_000));

    let alerts = client.notifications().await.unwrap();
    assert_eq!(alerts.len(), 2);
    assert!(!alerts[0].read);
    assert!(alerts[1].read);
}

#[tokio::test]
async fn transfer_rejection_is_shown_verbatim() {
    let base = spawn_backend().await;
    let client = signed_in(&base).await;
    let request = TransferRequest::new("HDFC", "SBI", Money::from_major(500)).unwrap();
    let err = client.transfer(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Insufficient balance");

    let small = TransferRequest::new("HDFC", "SBI", Money::from_major(50)).unwrap();
    assert!(client.transfer(&small).await.is_ok());
}

#[tokio::test]
async fn report_uses_server_filename() {
    let base = spawn_backend().await;
    let client = signed_in(&base).await;
    let request = ReportRequest {
        format: ReportFormat::Pdf,
        month: Some(2),
        year: Some(2026),
        ..ReportRequest::default()
    };
    let file = client.report(ReportKind::Monthly, &request).await.unwrap();
    assert_eq!(file.filename, "monthly-2026-2.pdf");
    assert_eq!(file.bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_reason() {
    let base = spawn_backend().await;
    let client = signed_in(&base).await;
    let err = client.accounts().await.unwrap_err();
    assert!(matches!(err, ClientError::Server(ref msg) if msg == "Internal Server Error"));
    assert!(client.logout().await.is_ok());
}

#[tokio::test]
async fn password_recovery_steps() {
    let base = spawn_backend().await;
    let client = Client::new(&base).unwrap();

    assert!(matches!(
        client.forgot_password("nobody").await,
        Err(ClientError::NotFound)
    ));
    let question = client.forgot_password("asha").await.unwrap();
    assert_eq!(question, "Name of your first pet?");

    let err = client.verify_security("asha", "tom").await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect answer");
    assert!(client.verify_security("asha", "rex").await.is_ok());

    let request = ResetPasswordRequest {
        username: "asha".to_string(),
        new_password: "s3cret!".to_string(),
        confirm_password: "s3cret!".to_string(),
    };
    assert!(client.reset_password(&request).await.is_ok());
}

#[tokio::test]
async fn sessions_list_and_revoke() {
    let base = spawn_backend().await;
    let anonymous = Client::new(&base).unwrap();
    assert!(matches!(anonymous.sessions().await, Err(ClientError::Unauthorized)));

    let client = signed_in(&base).await;
    let sessions = client.sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].device, "Firefox on Linux");
    assert!(sessions[0].last_active.is_some());
    assert_eq!(sessions[1].device, "Unknown device");

    assert!(client.revoke_session("s2").await.is_ok());
    assert!(matches!(
        client.revoke_session("gone").await,
        Err(ClientError::NotFound)
    ));
    assert!(client.revoke_all_sessions().await.is_ok());
}

#[test]
fn malformed_base_url_is_named_in_the_error() {
    let err = Client::new("not a url").unwrap_err();
    assert!(matches!(err, AppError::InvalidUrl(_)));
    assert!(err.to_string().starts_with("invalid base_url"));
}

#[test]
fn disposition_parsing() {
    assert_eq!(
        filename_from_disposition("attachment; filename=\"a.xlsx\""),
        Some("a.xlsx".to_string())
    );
    assert_eq!(filename_from_disposition("attachment"), None);
}
