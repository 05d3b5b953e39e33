// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity resolution.
//!
//! Credentials are handled by an upstream identity provider, which passes
//! the caller's user id along with each request. This module turns that id
//! into an `AuthenticatedActor` by looking the user up in the directory.
//! Role-based rules live in the domain crate; nothing here decides what a
//! caller may do.

use studytrack_audit::Actor;
use studytrack_domain::{Role, User};
use studytrack_persistence::{Persistence, PersistenceError};
use tracing::{debug, error};

use crate::error::AuthError;

/// A caller whose identity has been resolved against the user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's user id.
    pub user_id: i64,
    /// The caller's role.
    pub role: Role,
    /// The caller's display name.
    pub name: String,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, role: Role, name: String) -> Self {
        Self {
            user_id,
            role,
            name,
        }
    }

    /// Converts this actor into the audit actor recorded with each change.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role, self.name.clone())
    }
}

impl From<&User> for AuthenticatedActor {
    fn from(user: &User) -> Self {
        Self::new(user.user_id, user.role, user.name.clone())
    }
}

/// Resolves caller identities.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Parses a raw user id supplied by the identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a positive integer.
    pub fn parse_user_id(raw: &str) -> Result<i64, AuthError> {
        match raw.trim().parse::<i64>() {
            Ok(user_id) if user_id > 0 => Ok(user_id),
            _ => Err(AuthError::AuthenticationFailed {
                reason: String::from("Malformed user id"),
            }),
        }
    }

    /// Resolves a user id to an authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `user_id` - The id asserted by the identity provider
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the lookup fails.
    pub fn resolve_caller(
        persistence: &mut Persistence,
        user_id: i64,
    ) -> Result<AuthenticatedActor, AuthError> {
        let user: User = persistence
            .find_user(user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Unknown user: {user_id}"),
            })?;

        debug!(user_id, role = user.role.as_str(), "Resolved caller");

        Ok(AuthenticatedActor::from(&user))
    }

    pub(crate) fn map_persistence_error(err: PersistenceError) -> AuthError {
        error!(error = %err, "Identity lookup failed");
        AuthError::LookupFailed
    }
}
