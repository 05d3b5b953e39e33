// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod identity;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono_tz::Tz;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use studytrack_api::{
    ApiError, AuthenticatedActor, CreateEventRequest, CreateSectionRequest, CreateSectionResponse,
    DeleteEventResponse, EventInfo, EventResponse, ListEventsRequest, ListEventsResponse,
    ListSectionsResponse, MembershipResponse, RegisterUserRequest, RegisterUserResponse,
    UpdateEventRequest, UserStatsResponse, WhoAmIResponse, approve_event, create_event,
    create_section, delete_event, get_event, join_section, leave_section, list_events,
    list_sections, pending_for_teacher, register_user, reject_event, translate_domain_error,
    update_event, user_stats, whoami,
};
use studytrack_domain::{parse_timezone, today_in};
use studytrack_persistence::Persistence;
use time::Date;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::identity::CallerIdentity;

/// `StudyTrack` Server - HTTP server for the `StudyTrack` academic calendar
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: std::net::IpAddr,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone that decides the current academic calendar day
    #[arg(short, long, default_value = "UTC")]
    timezone: String,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex so handlers serialize
/// their access to the single connection.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for users, sections, events and audit records.
    persistence: Arc<Mutex<Persistence>>,
    /// Timezone of the academic calendar.
    timezone: Tz,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok` while the process is serving.
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidTransition { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::MembershipRuleViolation { rule, .. } => {
                if rule.is_conflict() {
                    StatusCode::CONFLICT
                } else {
                    StatusCode::BAD_REQUEST
                }
            }
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Rejected request body");
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

/// Resolves the current calendar day in the configured timezone.
fn today(app_state: &AppState) -> Result<Date, HttpError> {
    today_in(app_state.timezone).map_err(|e| HttpError::from(translate_domain_error(e)))
}

/// Handler for GET `/health` endpoint.
#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/users` endpoint.
///
/// Creates a directory entry. No caller identity is required.
async fn handle_register_user(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Json<RegisterUserResponse>, HttpError> {
    let Json(request) = payload?;
    info!("Handling register_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterUserResponse = register_user(&mut persistence, request)?;
    Ok(Json(response))
}

/// Handler for GET `/users/me` endpoint.
async fn handle_whoami(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(whoami(&mut persistence, &actor)?))
}

/// Handler for GET `/users/me/stats` endpoint.
async fn handle_user_stats(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<UserStatsResponse>, HttpError> {
    let today: Date = today(&app_state)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(user_stats(&mut persistence, &actor, today)?))
}

/// Handler for GET `/sections` endpoint.
async fn handle_list_sections(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<ListSectionsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_sections(&mut persistence, &actor)?))
}

/// Handler for POST `/sections` endpoint.
async fn handle_create_section(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    payload: Result<Json<CreateSectionRequest>, JsonRejection>,
) -> Result<Json<CreateSectionResponse>, HttpError> {
    let Json(request) = payload?;
    info!(user_id = actor.user_id, "Handling create_section request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_section(&mut persistence, &actor, request)?))
}

/// Handler for POST `/sections/{id}/join` endpoint.
async fn handle_join_section(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(section_id): Path<i64>,
) -> Result<Json<MembershipResponse>, HttpError> {
    info!(user_id = actor.user_id, section_id, "Handling join_section request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(join_section(&mut persistence, &actor, section_id)?))
}

/// Handler for POST `/sections/{id}/leave` endpoint.
async fn handle_leave_section(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(section_id): Path<i64>,
) -> Result<Json<MembershipResponse>, HttpError> {
    info!(user_id = actor.user_id, section_id, "Handling leave_section request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(leave_section(&mut persistence, &actor, section_id)?))
}

/// Handler for GET `/events` endpoint.
///
/// Accepts optional `filter` and `search` query parameters.
async fn handle_list_events(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListEventsRequest>,
) -> Result<Json<ListEventsResponse>, HttpError> {
    let today: Date = today(&app_state)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_events(&mut persistence, &actor, query, today)?))
}

/// Handler for GET `/events/pending` endpoint.
async fn handle_pending_events(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
) -> Result<Json<ListEventsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(pending_for_teacher(&mut persistence, &actor)?))
}

/// Handler for POST `/events` endpoint.
async fn handle_create_event(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<EventResponse>, HttpError> {
    let Json(request) = payload?;
    info!(user_id = actor.user_id, "Handling create_event request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_event(&mut persistence, &actor, request)?))
}

/// Handler for GET `/events/{id}` endpoint.
async fn handle_get_event(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(event_id): Path<i64>,
) -> Result<Json<EventInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_event(&mut persistence, &actor, event_id)?))
}

/// Handler for PATCH `/events/{id}` endpoint.
async fn handle_update_event(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(event_id): Path<i64>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<EventResponse>, HttpError> {
    let Json(request) = payload?;
    info!(user_id = actor.user_id, event_id, "Handling update_event request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_event(
        &mut persistence,
        &actor,
        event_id,
        request,
    )?))
}

/// Handler for DELETE `/events/{id}` endpoint.
async fn handle_delete_event(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(event_id): Path<i64>,
) -> Result<Json<DeleteEventResponse>, HttpError> {
    info!(user_id = actor.user_id, event_id, "Handling delete_event request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_event(&mut persistence, &actor, event_id)?))
}

/// Handler for POST `/events/{id}/approve` endpoint.
async fn handle_approve_event(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>, HttpError> {
    log_moderation(&actor, event_id, "approve");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(approve_event(&mut persistence, &actor, event_id)?))
}

/// Handler for POST `/events/{id}/reject` endpoint.
async fn handle_reject_event(
    AxumState(app_state): AxumState<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(event_id): Path<i64>,
) -> Result<Json<EventResponse>, HttpError> {
    log_moderation(&actor, event_id, "reject");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(reject_event(&mut persistence, &actor, event_id)?))
}

fn log_moderation(actor: &AuthenticatedActor, event_id: i64, decision: &str) {
    info!(
        user_id = actor.user_id,
        event_id, decision, "Handling moderation request"
    );
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/users", post(handle_register_user))
        .route("/users/me", get(handle_whoami))
        .route("/users/me/stats", get(handle_user_stats))
        .route(
            "/sections",
            get(handle_list_sections).post(handle_create_section),
        )
        .route("/sections/{id}/join", post(handle_join_section))
        .route("/sections/{id}/leave", post(handle_leave_section))
        .route(
            "/events",
            get(handle_list_events).post(handle_create_event),
        )
        .route("/events/pending", get(handle_pending_events))
        .route(
            "/events/{id}",
            get(handle_get_event)
                .patch(handle_update_event)
                .delete(handle_delete_event),
        )
        .route("/events/{id}/approve", post(handle_approve_event))
        .route("/events/{id}/reject", post(handle_reject_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing StudyTrack Server");

    let timezone: Tz = parse_timezone(&args.timezone)?;
    info!(timezone = %timezone, "Academic calendar timezone");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        timezone,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = std::net::SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
