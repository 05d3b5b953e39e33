// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::moderation::EventStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime, Time};

/// Default display color for events created without one.
pub const DEFAULT_EVENT_COLOR: &str = "#6B7280";

/// The role a user registered with.
///
/// Role is fixed at registration and decides moderation privileges
/// and how many sections the user may be active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A student: at most one active section, submissions need approval.
    Student,
    /// A teacher: moderates every section they are active in.
    Teacher,
    /// A personal-calendar user: never holds section memberships.
    Personal,
}

impl Role {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Personal => "personal",
        }
    }

    /// Returns the maximum number of simultaneously active section
    /// memberships for this role, or `None` when unbounded.
    #[must_use]
    pub const fn active_section_limit(&self) -> Option<usize> {
        match self {
            Self::Student => Some(1),
            Self::Teacher => None,
            Self::Personal => Some(0),
        }
    }

    /// Returns true if this role may approve or reject section events.
    #[must_use]
    pub const fn can_moderate(&self) -> bool {
        match self {
            Self::Teacher => true,
            Self::Student | Self::Personal => false,
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "personal" => Ok(Self::Personal),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of academic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Notice,
    Assignment,
    Exam,
    Presentation,
    Meeting,
    Other,
}

impl EventType {
    /// All event types, in display order.
    pub const ALL: [Self; 6] = [
        Self::Notice,
        Self::Assignment,
        Self::Exam,
        Self::Presentation,
        Self::Meeting,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Assignment => "assignment",
            Self::Exam => "exam",
            Self::Presentation => "presentation",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event_type| event_type.as_str() == s)
            .ok_or_else(|| DomainError::InvalidEventType(s.to_string()))
    }
}

/// Informational audience hint carried on an event.
///
/// Visibility never overrides the role and membership rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Section,
    Public,
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Section => "section",
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "section" => Ok(Self::Section),
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(DomainError::InvalidVisibility(s.to_string())),
        }
    }
}

/// Event priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

/// Lifecycle of a section membership row.
///
/// Leaving a section deactivates the row; re-joining reactivates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Inactive,
}

impl MembershipStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidMembershipStatus(s.to_string())),
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Canonical identifier, supplied by the identity provider.
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Institutional student number, if any.
    pub student_id: Option<String>,
}

/// A class or cohort group that scopes event sharing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub section_id: i64,
    pub name: String,
    /// Unique join code.
    pub code: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub created_at: OffsetDateTime,
}

/// One user's membership in one section.
///
/// There is at most one row per `(section_id, user_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMembership {
    pub section_id: i64,
    pub user_id: i64,
    pub status: MembershipStatus,
    pub joined_at: OffsetDateTime,
}

/// The approver and time recorded when an event leaves `pending`.
///
/// Set exactly once and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModerationRecord {
    pub approved_by: i64,
    pub approved_at: OffsetDateTime,
}

/// A persisted calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_id: i64,
    pub creator_id: i64,
    /// The creator's role at the time the event was created.
    pub creator_role: Role,
    /// `None` marks a personal event, visible only to its creator.
    pub section_id: Option<i64>,
    pub date: Date,
    pub time: Option<Time>,
    pub event_type: EventType,
    pub title: String,
    pub details: String,
    pub color: String,
    pub status: EventStatus,
    pub visibility: Visibility,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: OffsetDateTime,
    pub moderation: Option<ModerationRecord>,
}

impl Event {
    /// Returns true if this event has no section.
    #[must_use]
    pub const fn is_personal(&self) -> bool {
        self.section_id.is_none()
    }
}

/// A validated event that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub creator_id: i64,
    pub creator_role: Role,
    pub section_id: Option<i64>,
    pub date: Date,
    pub time: Option<Time>,
    pub event_type: EventType,
    pub title: String,
    pub details: String,
    pub color: String,
    pub status: EventStatus,
    pub visibility: Visibility,
    pub priority: Priority,
    pub created_at: OffsetDateTime,
    pub moderation: Option<ModerationRecord>,
}

/// The whitelisted, validated fields of an event update.
///
/// `None` leaves the field unchanged. `time` is doubly optional:
/// `Some(None)` clears the time of day. Status is absent: it only changes
/// through approve and reject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub date: Option<Date>,
    pub time: Option<Option<Time>>,
    pub event_type: Option<EventType>,
    pub title: Option<String>,
    pub details: Option<String>,
    pub color: Option<String>,
    pub completed: Option<bool>,
}

impl EventPatch {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time.is_none()
            && self.event_type.is_none()
            && self.title.is_none()
            && self.details.is_none()
            && self.color.is_none()
            && self.completed.is_none()
    }

    /// Returns a copy of `event` with the patch applied.
    #[must_use]
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut updated: Event = event.clone();
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(time) = self.time {
            updated.time = time;
        }
        if let Some(event_type) = self.event_type {
            updated.event_type = event_type;
        }
        if let Some(title) = &self.title {
            updated.title.clone_from(title);
        }
        if let Some(details) = &self.details {
            updated.details.clone_from(details);
        }
        if let Some(color) = &self.color {
            updated.color.clone_from(color);
        }
        if let Some(completed) = self.completed {
            updated.completed = completed;
        }
        updated
    }
}

/// A validated section that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSection {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub created_at: OffsetDateTime,
}
