// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use studytrack::CoreError;
use studytrack_domain::DomainError;
use studytrack_persistence::PersistenceError;
use tracing::{error, warn};

/// Message returned to callers for any storage or internal failure.
const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Identity resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be identified.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The user directory could not be read.
    LookupFailed,
}

impl AuthError {
    /// Returns true if the failure lies with the server rather than the
    /// caller's credentials.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::LookupFailed)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::LookupFailed => write!(f, "{INTERNAL_ERROR_MESSAGE}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// The membership rule a join or leave violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipRule {
    /// The caller is already an active member.
    AlreadyMember,
    /// The caller is not an active member.
    NotMember,
    /// A student is already active in another section.
    SectionLimitExceeded,
    /// The section creator tried to leave.
    CreatorCannotLeave,
}

impl MembershipRule {
    /// Returns the string representation of this rule.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyMember => "already_member",
            Self::NotMember => "not_member",
            Self::SectionLimitExceeded => "section_limit_exceeded",
            Self::CreatorCannotLeave => "creator_cannot_leave",
        }
    }

    /// Returns true if the rule reports a conflict with current state
    /// rather than a bad request.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyMember | Self::SectionLimitExceeded)
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller could not be identified.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found, or is not visible to the caller.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The caller is identified but not permitted to perform the action.
    Forbidden {
        /// A human-readable description of the denial.
        message: String,
    },
    /// The moderation state machine rejected the change.
    InvalidTransition {
        /// A human-readable description of the rejected transition.
        message: String,
    },
    /// A join or leave violated a membership rule.
    MembershipRuleViolation {
        /// The rule that was violated.
        rule: MembershipRule,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A uniqueness constraint was violated.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred. Details are logged, never returned.
    Internal {
        /// A generic description of the failure.
        message: String,
    },
}

impl ApiError {
    /// Returns the generic internal error.
    #[must_use]
    pub fn internal() -> Self {
        Self::Internal {
            message: String::from(INTERNAL_ERROR_MESSAGE),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Forbidden { message } => write!(f, "Forbidden: {message}"),
            Self::InvalidTransition { message } => {
                write!(f, "Invalid status transition: {message}")
            }
            Self::MembershipRuleViolation { rule, message } => {
                write!(f, "Membership rule violation ({}): {message}", rule.as_str())
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::LookupFailed => Self::internal(),
        }
    }
}

fn invalid_input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from(resource_type),
        message: err.to_string(),
    }
}

fn membership(rule: MembershipRule, err: &DomainError) -> ApiError {
    ApiError::MembershipRuleViolation {
        rule,
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// Every domain variant is mapped explicitly. Authorization denials are
/// logged at `warn`.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidDate { .. } => invalid_input("date", &err),
        DomainError::InvalidTime(_) => invalid_input("time", &err),
        DomainError::InvalidEventType(_) => invalid_input("event_type", &err),
        DomainError::InvalidFilter(_) => invalid_input("filter", &err),
        DomainError::InvalidEventStatus(_) => invalid_input("status", &err),
        DomainError::InvalidVisibility(_) => invalid_input("visibility", &err),
        DomainError::InvalidPriority(_) => invalid_input("priority", &err),
        DomainError::InvalidRole(_) => invalid_input("role", &err),
        DomainError::InvalidMembershipStatus(_) => invalid_input("membership_status", &err),
        DomainError::EmptyTitle | DomainError::TitleTooLong { .. } => {
            invalid_input("title", &err)
        }
        DomainError::InvalidColor(_) => invalid_input("color", &err),
        DomainError::InvalidName(_) => invalid_input("name", &err),
        DomainError::InvalidEmail(_) => invalid_input("email", &err),
        DomainError::InvalidSectionCode(_) => invalid_input("code", &err),
        DomainError::InvalidTimezone(_) => invalid_input("timezone", &err),
        DomainError::NoFieldsToUpdate => invalid_input("body", &err),
        DomainError::EventNotFound(_) => not_found("Event", &err),
        DomainError::SectionNotFound(_) => not_found("Section", &err),
        DomainError::UserNotFound(_) => not_found("User", &err),
        DomainError::NotEventOwner { event_id, user_id } => {
            warn!(event_id, user_id, "Event modification denied");
            ApiError::Forbidden {
                message: err.to_string(),
            }
        }
        DomainError::NotSectionMember {
            section_id,
            user_id,
        } => {
            warn!(section_id, user_id, "Section access denied");
            ApiError::Forbidden {
                message: err.to_string(),
            }
        }
        DomainError::RoleNotPermitted { action, role } => {
            warn!(action = %action, role = %role, "Action denied for role");
            ApiError::Forbidden {
                message: err.to_string(),
            }
        }
        DomainError::InvalidStatusTransition { .. } => ApiError::InvalidTransition {
            message: err.to_string(),
        },
        DomainError::AlreadyMember { .. } => membership(MembershipRule::AlreadyMember, &err),
        DomainError::NotMember { .. } => membership(MembershipRule::NotMember, &err),
        DomainError::SectionLimitExceeded { .. } => {
            membership(MembershipRule::SectionLimitExceeded, &err)
        }
        DomainError::CreatorCannotLeave { .. } => {
            membership(MembershipRule::CreatorCannotLeave, &err)
        }
        DomainError::DuplicateSectionCode(_) | DomainError::DuplicateEmail(_) => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Domain rules re-checked by storage are translated like any other domain
/// error. Every other failure is logged with full context and reported to
/// the caller as a generic internal error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::ReconstructionError(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => {
            error!(error = %err, "Storage operation failed");
            ApiError::internal()
        }
    }
}
