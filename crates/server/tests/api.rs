//! HTTP API tests driving the full router in-process.
//!
//! Each test builds the real router over an in-memory database and sends
//! requests through `tower::ServiceExt::oneshot`, covering routing, auth,
//! serialization and handler wiring in one pass.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use base64::Engine as _;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn setup() -> (Router, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    add_user(&db, "alice", "secret").await;

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (server::app(engine, db.clone()), db)
}

async fn add_user(db: &DatabaseConnection, username: &str, password: &str) {
    db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "INSERT INTO users (username, password, timezone) VALUES (?, ?, ?)",
        [username.into(), password.into(), "UTC".into()],
    ))
    .await
    .unwrap();
}

fn basic_auth(username: &str, password: &str) -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

fn request_as(method: Method, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(user, "secret"))
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    request_as(method, uri, "alice", body)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> axum::response::Response {
    router.clone().oneshot(req).await.unwrap()
}

async fn create_ok(router: &Router, uri: &str, body: Value) -> String {
    let response = send(router, request(Method::POST, uri, Some(body))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let (router, _db) = setup().await;

    let response = send(
        &router,
        Request::builder()
            .method(Method::GET)
            .uri("/tasks")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    // TypedHeader rejects the absent Authorization header before auth runs.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (router, _db) = setup().await;

    let response = send(
        &router,
        Request::builder()
            .method(Method::GET)
            .uri("/tasks")
            .header(header::AUTHORIZATION, basic_auth("alice", "nope"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn task_create_complete_list_round_trip() {
    let (router, _db) = setup().await;

    let id = create_ok(
        &router,
        "/tasks",
        json!({
            "title": "water plants",
            "notes": "balcony first",
            "due_date": "2026-03-09",
            "recurrence_type": "daily",
            "recurring_until": "2026-04-09",
            "subtasks": ["front", "back"],
        }),
    )
    .await;

    let response = send(&router, request(Method::GET, "/tasks", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(body["tasks"][0]["id"], id.as_str());
    assert_eq!(body["tasks"][0]["status"], "pending");
    assert_eq!(body["tasks"][0]["recurrence_type"], "daily");

    let response = send(
        &router,
        request(Method::POST, &format!("/tasks/{id}/complete"), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, request(Method::GET, "/tasks?status=completed", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
    assert!(body["tasks"][0]["completed_at"].is_string());

    let response = send(&router, request(Method::GET, "/tasks?status=pending", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn subtask_toggle_round_trip() {
    let (router, _db) = setup().await;

    let task_id = create_ok(
        &router,
        "/tasks",
        json!({ "title": "pack bags", "subtasks": ["clothes"] }),
    )
    .await;

    let response = send(
        &router,
        request(Method::GET, &format!("/tasks/{task_id}/subtasks"), None),
    )
    .await;
    let body = body_json(response).await;
    let subtask_id = body["subtasks"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["subtasks"][0]["is_completed"], false);

    let response = send(
        &router,
        request(
            Method::PUT,
            &format!("/tasks/{task_id}/subtasks/{subtask_id}"),
            Some(json!({ "is_completed": true })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &router,
        request(Method::GET, &format!("/tasks/{task_id}/subtasks"), None),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["subtasks"][0]["is_completed"], true);
    assert!(body["subtasks"][0]["completed_at"].is_string());
}

#[tokio::test]
async fn calendar_expands_recurring_tasks() {
    let (router, _db) = setup().await;

    let until = Utc::now().date_naive() + Duration::days(100);
    create_ok(
        &router,
        "/tasks",
        json!({
            "title": "weekly review",
            "recurrence_type": "weekly",
            "recurring_until": until.to_string(),
        }),
    )
    .await;

    // The anchor is the creation day, so open the range after creating.
    let start = Utc::now().date_naive();
    let end = start + Duration::days(14);
    let response = send(
        &router,
        request(Method::GET, &format!("/calendar?start={start}&end={end}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let occurrences = body["occurrences"].as_array().unwrap();
    assert_eq!(occurrences.len(), 3);
    assert_eq!(occurrences[0]["date"], start.to_string());
    assert_eq!(occurrences[2]["date"], end.to_string());

    let response = send(
        &router,
        request(Method::GET, &format!("/calendar?start={end}&end={start}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn expense_moves_budget_total_through_its_lifecycle() {
    let (router, _db) = setup().await;

    let category_id = create_ok(&router, "/categories", json!({ "name": "Food" })).await;
    create_ok(
        &router,
        "/budgets",
        json!({ "name": "Groceries", "amount_minor": 50000, "category_id": category_id }),
    )
    .await;

    let tx_id = create_ok(
        &router,
        "/transactions",
        json!({
            "kind": "expense",
            "amount_minor": 1500,
            "occurred_at": "2026-03-10",
            "category_id": category_id,
        }),
    )
    .await;

    let response = send(&router, request(Method::GET, "/budgets", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["budgets"][0]["current_spent_minor"], 1500);

    let response = send(
        &router,
        request(
            Method::PATCH,
            &format!("/transactions/{tx_id}"),
            Some(json!({ "amount_minor": 2000 })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&router, request(Method::GET, "/budgets", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["budgets"][0]["current_spent_minor"], 2000);

    let response = send(
        &router,
        request(Method::DELETE, &format!("/transactions/{tx_id}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&router, request(Method::GET, "/budgets", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["budgets"][0]["current_spent_minor"], 0);

    let response = send(&router, request(Method::GET, "/transactions", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["transactions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn savings_fund_goals() {
    let (router, _db) = setup().await;

    let goal_id = create_ok(
        &router,
        "/goals",
        json!({ "name": "Vacation", "target_amount_minor": 100000 }),
    )
    .await;
    create_ok(
        &router,
        "/transactions",
        json!({
            "kind": "savings",
            "amount_minor": 2500,
            "occurred_at": "2026-03-10",
            "goal_id": goal_id,
        }),
    )
    .await;

    let response = send(&router, request(Method::GET, "/goals", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["goals"][0]["current_amount_minor"], 2500);
    assert_eq!(body["goals"][0]["target_amount_minor"], 100000);
}

#[tokio::test]
async fn archived_budget_is_hidden_and_stops_matching() {
    let (router, _db) = setup().await;

    let budget_id = create_ok(
        &router,
        "/budgets",
        json!({ "name": "Everything", "amount_minor": 10000 }),
    )
    .await;

    let response = send(
        &router,
        request(Method::POST, &format!("/budgets/{budget_id}/archive"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    create_ok(
        &router,
        "/transactions",
        json!({ "kind": "expense", "amount_minor": 900, "occurred_at": "2026-03-10" }),
    )
    .await;

    let response = send(&router, request(Method::GET, "/budgets", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["budgets"].as_array().unwrap().len(), 0);

    let response = send(
        &router,
        request(Method::GET, "/budgets?include_archived=true", None),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["budgets"][0]["current_spent_minor"], 0);
    assert_eq!(body["budgets"][0]["archived"], true);
}

#[tokio::test]
async fn invalid_requests_map_to_client_errors() {
    let (router, _db) = setup().await;

    // Half-set recurrence pair.
    let response = send(
        &router,
        request(
            Method::POST,
            "/tasks",
            Some(json!({ "title": "broken", "recurrence_type": "daily" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("recurring_until"));

    // Non-positive amount.
    let response = send(
        &router,
        request(
            Method::POST,
            "/transactions",
            Some(json!({ "kind": "expense", "amount_minor": 0, "occurred_at": "2026-03-10" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Duplicate category after normalization.
    create_ok(&router, "/categories", json!({ "name": "Food" })).await;
    let response = send(
        &router,
        request(Method::POST, "/categories", Some(json!({ "name": "  food  " }))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Unknown ids.
    let ghost = uuid::Uuid::new_v4();
    let response = send(
        &router,
        request(Method::POST, &format!("/tasks/{ghost}/complete"), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &router,
        request(Method::DELETE, &format!("/transactions/{ghost}"), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_only_see_their_own_rows() {
    let (router, db) = setup().await;
    add_user(&db, "bob", "secret").await;

    let task_id = create_ok(&router, "/tasks", json!({ "title": "alice task" })).await;

    let response = send(&router, request_as(Method::GET, "/tasks", "bob", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 0);

    // Another user's task reads as missing, not as forbidden.
    let response = send(
        &router,
        request_as(
            Method::POST,
            &format!("/tasks/{task_id}/complete"),
            "bob",
            Some(json!({})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&router, request(Method::GET, "/tasks", None)).await;
    let body = body_json(response).await;
    assert_eq!(body["tasks"][0]["id"], task_id.as_str());
}
