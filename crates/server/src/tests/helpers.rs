// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono_tz::Tz;
use serde_json::{Value, json};
use std::sync::Arc;
use studytrack_persistence::Persistence;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router, identity::USER_ID_HEADER};

/// Helper to create a router over a fresh in-memory database.
pub fn create_test_app() -> Router {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_router(AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        timezone: Tz::UTC,
    })
}

/// Sends one request and returns the status with the decoded JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = caller {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }
    let request: Request<Body> = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Registers a user and returns its id.
pub async fn register(app: &Router, name: &str, role: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/users",
        None,
        Some(json!({
            "name": name,
            "email": format!("{}@example.edu", name.to_lowercase()),
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {name}: {body}");
    body["user"]["user_id"].as_i64().unwrap()
}

/// Creates a section as the given teacher and returns its id.
pub async fn create_section(app: &Router, teacher: i64, code: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/sections",
        Some(teacher),
        Some(json!({ "name": format!("Section {code}"), "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create section {code}: {body}");
    body["section"]["section_id"].as_i64().unwrap()
}

/// Creates an event and returns the response body.
pub async fn create_event(app: &Router, caller: i64, section_id: Option<i64>, title: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/events",
        Some(caller),
        Some(json!({
            "section_id": section_id,
            "date": "2099-03-14",
            "type": "exam",
            "title": title,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create event {title}: {body}");
    body
}

/// Titles of the events the caller can list.
pub async fn visible_titles(app: &Router, caller: i64) -> Vec<String> {
    let (status, body) = send(app, "GET", "/events", Some(caller), None).await;
    assert_eq!(status, StatusCode::OK);
    body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| String::from(event["title"].as_str().unwrap()))
        .collect()
}
