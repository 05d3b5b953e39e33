// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between stored text columns and domain types.
//!
//! Timestamps are stored as fixed-width UTC RFC 3339 text with nanosecond
//! precision, so their text order is their time order. Dates are stored as
//! `YYYY-MM-DD`, times as
//! `HH:MM:SS`, booleans as `0`/`1` integers and enums by their `as_str` form.

use diesel::prelude::*;
use studytrack_domain::{
    Event, EventStatus, EventType, MembershipStatus, ModerationRecord, NewEvent, Priority, Role,
    Section, User, Visibility, format_event_date, format_event_time, parse_event_date,
    parse_event_time,
};
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{events, section_members, sections, users};
use crate::error::PersistenceError;

const STORED_TIMESTAMP: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(STORED_TIMESTAMP)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{value}': {e}")))
}

fn parse_column<T: std::str::FromStr>(column: &str, value: &str) -> Result<T, PersistenceError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PersistenceError::ReconstructionError(format!("{column}: {e}")))
}

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub student_id: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role: parse_column::<Role>("users.role", &row.role)?,
            student_id: row.student_id,
        })
    }
}

/// Diesel Insertable struct for new users.
#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
    pub student_id: Option<&'a str>,
    pub created_at: String,
}

/// Diesel Queryable struct for section rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SectionRow {
    pub section_id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub creator_id: i64,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
    pub created_at: String,
}

impl TryFrom<SectionRow> for Section {
    type Error = PersistenceError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            section_id: row.section_id,
            name: row.name,
            code: row.code,
            description: row.description,
            creator_id: row.creator_id,
            academic_year: row.academic_year,
            semester: row.semester,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Diesel Insertable struct for new sections.
#[derive(Insertable)]
#[diesel(table_name = sections)]
pub struct NewSectionRow<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub description: Option<&'a str>,
    pub creator_id: i64,
    pub academic_year: Option<&'a str>,
    pub semester: Option<&'a str>,
    pub created_at: String,
}

/// Parses a stored membership status.
///
/// # Errors
///
/// Returns an error if the stored status is unknown.
pub fn parse_membership_status(status: &str) -> Result<MembershipStatus, PersistenceError> {
    parse_column::<MembershipStatus>("section_members.status", status)
}

/// Diesel Insertable struct for new memberships.
#[derive(Insertable)]
#[diesel(table_name = section_members)]
pub struct NewMembershipRow<'a> {
    pub section_id: i64,
    pub user_id: i64,
    pub member_role: &'a str,
    pub status: &'a str,
    pub joined_at: String,
}

/// Diesel Queryable struct for event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EventRow {
    pub event_id: i64,
    pub creator_id: i64,
    pub creator_role: String,
    pub section_id: Option<i64>,
    pub event_date: String,
    pub event_time: Option<String>,
    pub event_type: String,
    pub title: String,
    pub details: String,
    pub color: String,
    pub status: String,
    pub visibility: String,
    pub priority: String,
    pub completed: i32,
    pub created_at: String,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
}

impl TryFrom<EventRow> for Event {
    type Error = PersistenceError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let moderation: Option<ModerationRecord> = match (row.approved_by, row.approved_at) {
            (Some(approved_by), Some(approved_at)) => Some(ModerationRecord {
                approved_by,
                approved_at: parse_timestamp(&approved_at)?,
            }),
            (None, None) => None,
            _ => {
                return Err(PersistenceError::ReconstructionError(format!(
                    "event {}: approved_by and approved_at must be set together",
                    row.event_id
                )));
            }
        };

        Ok(Self {
            event_id: row.event_id,
            creator_id: row.creator_id,
            creator_role: parse_column::<Role>("events.creator_role", &row.creator_role)?,
            section_id: row.section_id,
            date: parse_event_date(&row.event_date)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
            time: row
                .event_time
                .as_deref()
                .map(parse_event_time)
                .transpose()
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
            event_type: parse_column::<EventType>("events.event_type", &row.event_type)?,
            title: row.title,
            details: row.details,
            color: row.color,
            status: parse_column::<EventStatus>("events.status", &row.status)?,
            visibility: parse_column::<Visibility>("events.visibility", &row.visibility)?,
            priority: parse_column::<Priority>("events.priority", &row.priority)?,
            completed: row.completed != 0,
            created_at: parse_timestamp(&row.created_at)?,
            moderation,
        })
    }
}

/// Diesel Insertable struct for new events.
#[derive(Insertable)]
#[diesel(table_name = events)]
pub struct NewEventRow<'a> {
    pub creator_id: i64,
    pub creator_role: &'a str,
    pub section_id: Option<i64>,
    pub event_date: String,
    pub event_time: Option<String>,
    pub event_type: &'a str,
    pub title: &'a str,
    pub details: &'a str,
    pub color: &'a str,
    pub status: &'a str,
    pub visibility: &'a str,
    pub priority: &'a str,
    pub completed: i32,
    pub created_at: String,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
}

impl<'a> NewEventRow<'a> {
    /// Builds an insertable row from a validated event.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_new_event(event: &'a NewEvent) -> Result<Self, PersistenceError> {
        Ok(Self {
            creator_id: event.creator_id,
            creator_role: event.creator_role.as_str(),
            section_id: event.section_id,
            event_date: format_event_date(event.date),
            event_time: event.time.map(format_event_time),
            event_type: event.event_type.as_str(),
            title: &event.title,
            details: &event.details,
            color: &event.color,
            status: event.status.as_str(),
            visibility: event.visibility.as_str(),
            priority: event.priority.as_str(),
            completed: 0,
            created_at: format_timestamp(event.created_at)?,
            approved_by: event.moderation.map(|m| m.approved_by),
            approved_at: event
                .moderation
                .map(|m| format_timestamp(m.approved_at))
                .transpose()?,
        })
    }
}

/// Diesel AsChangeset struct for event patches. `None` leaves a column unchanged
/// and `Some(None)` writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = events)]
pub struct EventChangeset<'a> {
    pub event_date: Option<String>,
    pub event_time: Option<Option<String>>,
    pub event_type: Option<&'a str>,
    pub title: Option<&'a str>,
    pub details: Option<&'a str>,
    pub color: Option<&'a str>,
    pub completed: Option<i32>,
}

/// Diesel Queryable struct for audit rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = crate::diesel_schema::audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditEventRow {
    pub audit_id: i64,
    pub actor_user_id: i64,
    pub actor_role: String,
    pub actor_name: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub target_kind: String,
    pub target_id: Option<i64>,
    pub before_snapshot: String,
    pub after_snapshot: String,
    pub created_at: String,
}

/// A section with display data for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub section: Section,
    pub creator_name: String,
    /// Number of active members.
    pub member_count: i64,
}

/// An event joined with the display names a client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub event: Event,
    pub creator_name: String,
    pub section_name: Option<String>,
    pub section_code: Option<String>,
}

/// A persisted audit event as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAuditEvent {
    pub audit_id: i64,
    pub event: studytrack_audit::AuditEvent,
    pub created_at: OffsetDateTime,
}
