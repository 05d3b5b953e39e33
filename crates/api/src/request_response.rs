// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates are exchanged as `YYYY-MM-DD`, times as `HH:MM:SS` and
//! timestamps as RFC 3339 strings.

// ============================================================================
// Users
// ============================================================================

/// API request to register a user directory record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RegisterUserRequest {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's role (`student`, `teacher`, `personal`).
    pub role: String,
    /// An institutional student number, if any.
    #[serde(default)]
    pub student_id: Option<String>,
}

/// Public information about a user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserInfo {
    /// The user id.
    pub user_id: i64,
    /// The display name.
    pub name: String,
    /// The email address.
    pub email: String,
    /// The role.
    pub role: String,
    /// The student number, if any.
    pub student_id: Option<String>,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterUserResponse {
    /// The registered user.
    pub user: UserInfo,
    /// A success message.
    pub message: String,
}

/// API response describing the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WhoAmIResponse {
    /// The caller.
    pub user: UserInfo,
    /// Sections the caller is actively a member of.
    pub active_sections: Vec<i64>,
    /// What the caller may do.
    pub capabilities: GlobalCapabilities,
}

/// Counts over the caller's visible events.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserStatsResponse {
    /// Number of visible events.
    pub total_events: usize,
    /// Visible events dated today or later.
    pub upcoming_events: usize,
    /// Visible events marked completed.
    pub completed_events: usize,
    /// The caller's own pending events.
    pub pending_events: usize,
    /// Number of active section memberships.
    pub my_sections: usize,
    /// Size of the moderation queue; teachers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_moderation: Option<usize>,
}

// ============================================================================
// Sections
// ============================================================================

/// API request to create a section.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
pub struct CreateSectionRequest {
    /// The section name.
    pub name: String,
    /// The unique section code.
    pub code: String,
    /// An optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// An optional academic year label.
    #[serde(default)]
    pub academic_year: Option<String>,
    /// An optional semester label.
    #[serde(default)]
    pub semester: Option<String>,
}

/// Information about a section.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SectionInfo {
    /// The section id.
    pub section_id: i64,
    /// The section name.
    pub name: String,
    /// The section code.
    pub code: String,
    /// The description, if any.
    pub description: Option<String>,
    /// The creating teacher.
    pub creator_id: i64,
    /// The creating teacher's display name.
    pub creator_name: String,
    /// The academic year label, if any.
    pub academic_year: Option<String>,
    /// The semester label, if any.
    pub semester: Option<String>,
    /// Number of active members.
    pub member_count: i64,
    /// Whether the caller is an active member.
    pub is_member: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// API response for a successful section creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateSectionResponse {
    /// The created section.
    pub section: SectionInfo,
    /// A success message.
    pub message: String,
}

/// API response listing sections.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListSectionsResponse {
    /// Every section, newest first.
    pub sections: Vec<SectionInfo>,
}

/// API response for a join or leave.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MembershipResponse {
    /// The section.
    pub section_id: i64,
    /// The caller's membership status after the change.
    pub status: String,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Events
// ============================================================================

/// API request to create an event.
///
/// A missing or zero `section_id` creates a personal event.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
pub struct CreateEventRequest {
    /// The target section.
    #[serde(default)]
    pub section_id: Option<i64>,
    /// The calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// The time of day (`HH:MM` or `HH:MM:SS`).
    #[serde(default)]
    pub time: Option<String>,
    /// The event type, sent on the wire as `type`.
    #[serde(rename = "type", alias = "event_type")]
    pub event_type: String,
    /// The title.
    pub title: String,
    /// Free-form details.
    #[serde(default)]
    pub details: Option<String>,
    /// Display color (`#RRGGBB`).
    #[serde(default)]
    pub color: Option<String>,
    /// Visibility (`section`, `public`, `private`).
    #[serde(default)]
    pub visibility: Option<String>,
    /// Priority (`low`, `medium`, `high`).
    #[serde(default)]
    pub priority: Option<String>,
}

/// API request to update an event.
///
/// Only the listed fields can be changed. `status` is accepted so that
/// clients sending it are not rejected, but it is ignored: status changes
/// go through approve/reject.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
pub struct UpdateEventRequest {
    /// New calendar date.
    #[serde(default)]
    pub date: Option<String>,
    /// New time of day. An empty string clears it.
    #[serde(default)]
    pub time: Option<String>,
    /// New event type, sent on the wire as `type`.
    #[serde(default, rename = "type", alias = "event_type")]
    pub event_type: Option<String>,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New details.
    #[serde(default)]
    pub details: Option<String>,
    /// New color.
    #[serde(default)]
    pub color: Option<String>,
    /// New completion flag.
    #[serde(default)]
    pub completed: Option<bool>,
    /// Ignored.
    #[serde(default)]
    pub status: Option<String>,
}

/// API request to list events.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
pub struct ListEventsRequest {
    /// One of `all`, `upcoming`, `completed`, `pending`, or an event type.
    #[serde(default)]
    pub filter: Option<String>,
    /// Case-insensitive substring matched against title and details.
    #[serde(default)]
    pub search: Option<String>,
}

/// An event as returned to a specific caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventInfo {
    /// The event id.
    pub event_id: i64,
    /// The creator.
    pub creator_id: i64,
    /// The creator's display name.
    pub creator_name: String,
    /// The creator's role when the event was created.
    pub creator_role: String,
    /// The section, or `None` for a personal event.
    pub section_id: Option<i64>,
    /// The section name.
    pub section_name: Option<String>,
    /// The section code.
    pub section_code: Option<String>,
    /// The calendar date.
    pub date: String,
    /// The time of day.
    pub time: Option<String>,
    /// The event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// The title.
    pub title: String,
    /// Free-form details.
    pub details: String,
    /// Display color.
    pub color: String,
    /// Moderation status.
    pub status: String,
    /// Visibility.
    pub visibility: String,
    /// Priority.
    pub priority: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// The approving user, for approved events.
    pub approved_by: Option<i64>,
    /// When the event was approved.
    pub approved_at: Option<String>,
    /// What the caller may do with this event.
    pub capabilities: EventCapabilities,
}

/// API response carrying one event and a message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventResponse {
    /// The event.
    pub event: EventInfo,
    /// A success message.
    pub message: String,
}

/// API response for a deleted event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteEventResponse {
    /// The deleted event id.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response listing events.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListEventsResponse {
    /// The events, ordered by date then time.
    pub events: Vec<EventInfo>,
}

// ============================================================================
// Capabilities
// ============================================================================

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(matches!(self, Self::Allowed))
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// Role-level capabilities for the caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlobalCapabilities {
    /// Whether the caller can create sections.
    pub can_create_section: Capability,
    /// Whether the caller can join sections.
    pub can_join_sections: Capability,
    /// Whether the caller can moderate events.
    pub can_moderate: Capability,
}

/// Per-event capabilities for the caller.
///
/// Advisory only. Every operation re-checks authorization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EventCapabilities {
    /// Whether the caller can edit the event.
    pub can_edit: Capability,
    /// Whether the caller can delete the event.
    pub can_delete: Capability,
    /// Whether the caller can approve the event.
    pub can_approve: Capability,
    /// Whether the caller can reject the event.
    pub can_reject: Capability,
}
