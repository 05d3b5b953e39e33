// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A calendar date is not in `YYYY-MM-DD` form or does not exist.
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Why the input was rejected.
        reason: String,
    },
    /// A time of day is not in `HH:MM` or `HH:MM:SS` form.
    InvalidTime(String),
    /// The event type is not one of the enumerated types.
    InvalidEventType(String),
    /// The list filter is not recognized.
    InvalidFilter(String),
    /// The event status string is not recognized.
    InvalidEventStatus(String),
    /// The visibility string is not recognized.
    InvalidVisibility(String),
    /// The priority string is not recognized.
    InvalidPriority(String),
    /// The role string is not recognized.
    InvalidRole(String),
    /// The membership status string is not recognized.
    InvalidMembershipStatus(String),
    /// Event title is empty after trimming.
    EmptyTitle,
    /// Event title exceeds the length limit.
    TitleTooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// Color is not a `#RRGGBB` hex value.
    InvalidColor(String),
    /// User or section name is empty or invalid.
    InvalidName(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Section code is empty or contains disallowed characters.
    InvalidSectionCode(String),
    /// The configured timezone is not a known IANA name.
    InvalidTimezone(String),
    /// An update request carried no patchable fields.
    NoFieldsToUpdate,
    /// Event does not exist.
    EventNotFound(i64),
    /// Section does not exist.
    SectionNotFound(i64),
    /// User does not exist.
    UserNotFound(i64),
    /// The caller neither created the event nor holds the teacher role.
    NotEventOwner {
        /// The event being modified.
        event_id: i64,
        /// The caller.
        user_id: i64,
    },
    /// The caller has no active membership in the section.
    NotSectionMember {
        /// The section.
        section_id: i64,
        /// The caller.
        user_id: i64,
    },
    /// The caller's role does not permit the action.
    RoleNotPermitted {
        /// The attempted action.
        action: String,
        /// The caller's role.
        role: String,
    },
    /// The requested moderation status change is not allowed.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// The user already holds an active membership in this section.
    AlreadyMember {
        /// The section.
        section_id: i64,
    },
    /// The user holds no active membership in this section.
    NotMember {
        /// The section.
        section_id: i64,
    },
    /// A student already holds an active membership in another section.
    SectionLimitExceeded {
        /// The section the student is currently active in.
        active_section_id: i64,
    },
    /// The section creator attempted to leave their own section.
    CreatorCannotLeave {
        /// The section.
        section_id: i64,
    },
    /// A section with this code already exists.
    DuplicateSectionCode(String),
    /// A user with this email already exists.
    DuplicateEmail(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { value, reason } => {
                write!(f, "Invalid date '{value}': {reason}")
            }
            Self::InvalidTime(value) => {
                write!(f, "Invalid time '{value}': expected HH:MM or HH:MM:SS")
            }
            Self::InvalidEventType(value) => write!(f, "Invalid event type: {value}"),
            Self::InvalidFilter(value) => write!(f, "Invalid filter: {value}"),
            Self::InvalidEventStatus(value) => write!(f, "Invalid event status: {value}"),
            Self::InvalidVisibility(value) => write!(f, "Invalid visibility: {value}"),
            Self::InvalidPriority(value) => write!(f, "Invalid priority: {value}"),
            Self::InvalidRole(value) => write!(f, "Invalid role: {value}"),
            Self::InvalidMembershipStatus(value) => {
                write!(f, "Invalid membership status: {value}")
            }
            Self::EmptyTitle => write!(f, "Event title cannot be empty"),
            Self::TitleTooLong { max } => {
                write!(f, "Event title cannot exceed {max} characters")
            }
            Self::InvalidColor(value) => {
                write!(f, "Invalid color '{value}': expected #RRGGBB")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidSectionCode(msg) => write!(f, "Invalid section code: {msg}"),
            Self::InvalidTimezone(value) => write!(f, "Invalid timezone: {value}"),
            Self::NoFieldsToUpdate => write!(f, "No fields to update"),
            Self::EventNotFound(id) => write!(f, "Event {id} not found"),
            Self::SectionNotFound(id) => write!(f, "Section {id} not found"),
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::NotEventOwner { event_id, user_id } => {
                write!(
                    f,
                    "User {user_id} may not modify event {event_id}: not the creator or a teacher"
                )
            }
            Self::NotSectionMember {
                section_id,
                user_id,
            } => {
                write!(
                    f,
                    "User {user_id} is not an active member of section {section_id}"
                )
            }
            Self::RoleNotPermitted { action, role } => {
                write!(f, "Role '{role}' is not permitted to {action}")
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot change event status from '{from}' to '{to}'")
            }
            Self::AlreadyMember { section_id } => {
                write!(f, "Already a member of section {section_id}")
            }
            Self::NotMember { section_id } => {
                write!(f, "Not a member of section {section_id}")
            }
            Self::SectionLimitExceeded { active_section_id } => {
                write!(
                    f,
                    "Students can only be in one section at a time (currently in section {active_section_id})"
                )
            }
            Self::CreatorCannotLeave { section_id } => {
                write!(
                    f,
                    "Section creators cannot leave their own sections (section {section_id})"
                )
            }
            Self::DuplicateSectionCode(code) => {
                write!(f, "Section code '{code}' is already in use")
            }
            Self::DuplicateEmail(email) => {
                write!(f, "A user with email '{email}' already exists")
            }
        }
    }
}

impl std::error::Error for DomainError {}
