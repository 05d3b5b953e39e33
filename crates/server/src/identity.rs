// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! Authentication itself happens upstream. The identity provider forwards
//! the caller's user id in the `X-User-Id` header and this module resolves
//! it against the user directory.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use studytrack_api::{AuthError, AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::{AppState, ErrorResponse};

/// Header carrying the authenticated caller's user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extractor for the resolved caller.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     CallerIdentity(actor): CallerIdentity,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 when the header is missing or malformed, or when it
/// names a user the directory does not know. A failed directory lookup is
/// HTTP 500.
pub struct CallerIdentity(pub AuthenticatedActor);

impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw: &str = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| {
                debug!("Missing {USER_ID_HEADER} header");
                IdentityError::MissingHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid {USER_ID_HEADER} header encoding");
                IdentityError::InvalidHeader
            })?;

        let user_id: i64 = AuthenticationService::parse_user_id(raw).map_err(|e| {
            warn!(raw, "Rejected caller identity");
            IdentityError::Rejected(e)
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::resolve_caller(&mut persistence, user_id).map_err(|e| {
                warn!(user_id, error = %e, "Caller resolution failed");
                IdentityError::Rejected(e)
            })?;

        Ok(Self(actor))
    }
}

/// Identity extraction errors.
///
/// Caller faults surface as HTTP 401 and lookup failures as HTTP 500, both
/// with the standard error body.
#[derive(Debug)]
pub enum IdentityError {
    /// The identity header is missing.
    MissingHeader,
    /// The identity header is not valid ASCII.
    InvalidHeader,
    /// The identity could not be resolved to a known user.
    Rejected(AuthError),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            Self::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                format!("Missing {USER_ID_HEADER} header"),
            ),
            Self::InvalidHeader => (
                StatusCode::UNAUTHORIZED,
                format!("Invalid {USER_ID_HEADER} header encoding"),
            ),
            Self::Rejected(err) if err.is_internal() => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Self::Rejected(err) => (StatusCode::UNAUTHORIZED, err.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}
