// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use studytrack_audit::AuditEvent;
use studytrack_domain::{
    Event, EventPatch, EventStatus, MembershipStatus, ModerationRecord, NewEvent, NewSection, Role,
    Section,
};
use time::OffsetDateTime;

/// The stored records a command reads before deciding.
///
/// Callers load whatever the command targets: the event for event
/// commands, the section and the caller's membership row for section
/// commands. A missing record is reported as not found by `apply`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshot<'a> {
    /// The targeted event, if it exists.
    pub event: Option<&'a Event>,
    /// The targeted section, if it exists.
    pub section: Option<&'a Section>,
    /// The caller's membership status in the targeted section, if a row exists.
    pub membership: Option<MembershipStatus>,
}

impl<'a> Snapshot<'a> {
    /// A snapshot for commands that read nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            event: None,
            section: None,
            membership: None,
        }
    }

    /// A snapshot holding the targeted event.
    #[must_use]
    pub const fn with_event(event: Option<&'a Event>) -> Self {
        Self {
            event,
            section: None,
            membership: None,
        }
    }

    /// A snapshot holding the targeted section and the caller's membership.
    #[must_use]
    pub const fn with_section(
        section: Option<&'a Section>,
        membership: Option<MembershipStatus>,
    ) -> Self {
        Self {
            event: None,
            section,
            membership,
        }
    }
}

/// A state change to be written by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert a new event.
    InsertEvent(NewEvent),
    /// Apply a patch to an existing event.
    UpdateEvent {
        event_id: i64,
        patch: EventPatch,
    },
    /// Hard-delete an event.
    DeleteEvent { event_id: i64 },
    /// Move an event out of `pending`.
    ///
    /// Must only be written if the stored status still equals `from`.
    ModerateEvent {
        event_id: i64,
        from: EventStatus,
        to: EventStatus,
        record: ModerationRecord,
    },
    /// Insert a section and an active membership for its creator.
    InsertSection(NewSection),
    /// Activate a membership.
    ///
    /// The join plan is re-evaluated against current rows when written.
    JoinSection {
        section_id: i64,
        user_id: i64,
        role: Role,
        joined_at: OffsetDateTime,
    },
    /// Deactivate a membership.
    LeaveSection { section_id: i64, user_id: i64 },
}

/// The result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The change to persist.
    pub mutation: Mutation,
    /// The audit event describing the change.
    pub audit_event: AuditEvent,
}
