//! End-to-end API tests: the full router driven as a tower service.
//!
//! Run: cargo test --test api_flow

use axum::Router;
use axum::body::Body;
use chrono::{Datelike, Duration, Utc};
use dayflow_server::auth::{JwtConfig, JwtService};
use dayflow_server::db::DbService;
use dayflow_server::db::models::{EmployeeRegistration, Role};
use dayflow_server::db::repository::EmployeeRepository;
use dayflow_server::{Config, ServerState, build_router};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    admin_emp_id: String,
    admin_token: String,
    _tmp: tempfile::TempDir,
}

async fn spawn_app() -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);

    let db_service = DbService::new(&tmp.path().join("dayflow.db"))
        .await
        .expect("failed to open test database");

    let jwt_service = JwtService::new(JwtConfig {
        secret: "api-flow-test-secret-key-0123456789abcdef".to_string(),
        expiration_minutes: 60,
        issuer: "dayflow-server".to_string(),
        audience: "dayflow-web".to_string(),
    });

    let state = ServerState {
        config,
        db: db_service.db.clone(),
        jwt_service: Arc::new(jwt_service),
    };

    // Onboard the admin directly so the test knows its password
    let repo = EmployeeRepository::new(state.db.clone());
    let (admin, admin_password) = repo
        .onboard(EmployeeRegistration {
            company_code: "DF".to_string(),
            first_name: "System".to_string(),
            last_name: "Admin".to_string(),
            email: "admin@dayflow.local".to_string(),
            phone: "0000000000".to_string(),
            role: Role::Admin,
            department: Some("Administration".to_string()),
            manager_id: None,
            location: None,
            date_of_joining: Utc::now().date_naive(),
        })
        .await
        .unwrap();

    let app = build_router(state);
    let admin_token = login(&app, "admin@dayflow.local", &admin_password).await;

    TestApp {
        app,
        admin_emp_id: admin.emp_id,
        admin_token,
        _tmp: tmp,
    }
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn register_employee(app: &Router, admin_token: &str, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/v1/employees/register",
            Some(admin_token),
            Some(json!({
                "company_code": "AB",
                "first_name": "John",
                "last_name": "Doe",
                "email": email,
                "phone": "5551234567",
                "department": "Engineering",
                "date_of_joining": "2024-01-15"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    (
        body["employee"]["emp_id"].as_str().unwrap().to_string(),
        body["temporary_password"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn login_and_identity_roundtrip() {
    let t = spawn_app().await;

    let (emp_id, temp_password) =
        register_employee(&t.app, &t.admin_token, "john.doe@example.com").await;
    assert!(temp_password.len() >= 10);

    let token = login(&t.app, "john.doe@example.com", &temp_password).await;
    let (status, me) = send(
        &t.app,
        request(Method::GET, "/api/v1/auth/me", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["emp_id"], emp_id);
    assert_eq!(me["role"], "employee");

    // The password hash never leaves the server
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let t = spawn_app().await;

    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "admin@dayflow.local", "password": "wrong"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "ghost@example.com", "password": "whatever"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let t = spawn_app().await;

    let (status, _) = send(&t.app, request(Method::GET, "/api/v1/employees", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &t.app,
        request(
            Method::GET,
            "/api/v1/employees",
            Some("not-a-real-token"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays public
    let (status, body) = send(&t.app, request(Method::GET, "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn role_gates_and_row_ownership() {
    let t = spawn_app().await;

    let (emp_id, temp_password) =
        register_employee(&t.app, &t.admin_token, "john.doe@example.com").await;
    let token = login(&t.app, "john.doe@example.com", &temp_password).await;

    // A plain employee cannot register anyone
    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/v1/employees/register",
            Some(&token),
            Some(json!({
                "company_code": "AB",
                "first_name": "Eve",
                "last_name": "Intruder",
                "email": "eve@example.com",
                "phone": "5550000000",
                "date_of_joining": "2024-02-01"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // ...nor read someone else's record
    let (status, _) = send(
        &t.app,
        request(
            Method::GET,
            &format!("/api/v1/employees/{}", t.admin_emp_id),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // ...but always their own
    let (status, body) = send(
        &t.app,
        request(
            Method::GET,
            &format!("/api/v1/employees/{emp_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emp_id"], emp_id);

    // Listing: employee sees only themselves, admin sees everyone
    let (status, body) = send(
        &t.app,
        request(Method::GET, "/api/v1/employees", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &t.app,
        request(Method::GET, "/api/v1/employees", Some(&t.admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Admin reads an unknown employee: 404, not 403
    let (status, _) = send(
        &t.app,
        request(
            Method::GET,
            "/api/v1/employees/XX00000000",
            Some(&t.admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let t = spawn_app().await;

    register_employee(&t.app, &t.admin_token, "shared@example.com").await;

    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/v1/employees/register",
            Some(&t.admin_token),
            Some(json!({
                "company_code": "AB",
                "first_name": "Jane",
                "last_name": "Smith",
                "email": "shared@example.com",
                "phone": "5559999999",
                "date_of_joining": "2024-03-01"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn attendance_and_timeoff_flow() {
    let t = spawn_app().await;

    let (emp_id, temp_password) =
        register_employee(&t.app, &t.admin_token, "john.doe@example.com").await;
    let token = login(&t.app, "john.doe@example.com", &temp_password).await;

    // Check in flips the tracker to in_office/green
    let (status, att) = send(
        &t.app,
        request(Method::POST, "/api/v1/attendance/check-in", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(att["status"], "present");

    let (status, tracker) = send(
        &t.app,
        request(
            Method::GET,
            &format!("/api/v1/employees/{emp_id}/status"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tracker["current_status"], "in_office");
    assert_eq!(tracker["status_indicator"], "green");

    // One attendance row per day
    let (status, _) = send(
        &t.app,
        request(Method::POST, "/api/v1/attendance/check-in", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // File three days of PTO and approve as admin
    let start = Utc::now().date_naive();
    let end = start + Duration::days(2);
    let (status, filed) = send(
        &t.app,
        request(
            Method::POST,
            "/api/v1/timeoff/requests",
            Some(&token),
            Some(json!({
                "time_off_type": "paid_time_off",
                "start_date": start.to_string(),
                "end_date": end.to_string(),
                "reason": "Family visit"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "filing failed: {filed}");
    assert_eq!(filed["status"], "pending");
    let request_id = filed["id"]
        .as_str()
        .unwrap()
        .strip_prefix("timeoff_request:")
        .unwrap()
        .to_string();

    // The requester cannot approve their own leave even if promoted; a
    // plain employee is rejected at the role gate
    let (status, _) = send(
        &t.app,
        request(
            Method::PUT,
            &format!("/api/v1/timeoff/requests/{request_id}/approval"),
            Some(&token),
            Some(json!({"approve": true})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, decided) = send(
        &t.app,
        request(
            Method::PUT,
            &format!("/api/v1/timeoff/requests/{request_id}/approval"),
            Some(&t.admin_token),
            Some(json!({"approve": true, "approval_comments": "Enjoy"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "approval failed: {decided}");
    assert_eq!(decided["status"], "approved");
    assert_eq!(decided["approved_by"], t.admin_emp_id);

    // Balance reflects the deduction
    let year = Utc::now().year();
    let (status, balance) = send(
        &t.app,
        request(
            Method::GET,
            &format!("/api/v1/timeoff/balance/{emp_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["year"], year);
    assert_eq!(balance["paid_time_off_used"], "3");

    // Deciding twice conflicts
    let (status, _) = send(
        &t.app,
        request(
            Method::PUT,
            &format!("/api/v1/timeoff/requests/{request_id}/approval"),
            Some(&t.admin_token),
            Some(json!({"approve": false})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn deactivated_employee_loses_access() {
    let t = spawn_app().await;

    let (emp_id, temp_password) =
        register_employee(&t.app, &t.admin_token, "john.doe@example.com").await;
    let token = login(&t.app, "john.doe@example.com", &temp_password).await;

    let (status, _) = send(
        &t.app,
        request(
            Method::DELETE,
            &format!("/api/v1/employees/{emp_id}"),
            Some(&t.admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The still-valid token no longer resolves
    let (status, _) = send(
        &t.app,
        request(Method::GET, "/api/v1/auth/me", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // And logging in again is refused
    let (status, _) = send(
        &t.app,
        request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({"email": "john.doe@example.com", "password": temp_password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
