// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use studytrack_domain::ModerationDecision;

/// Unvalidated input for a new event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    /// Target section. `None` or a non-positive id creates a personal event.
    pub section_id: Option<i64>,
    pub date: String,
    pub time: Option<String>,
    pub event_type: String,
    pub title: String,
    pub details: Option<String>,
    pub color: Option<String>,
    pub visibility: Option<String>,
    pub priority: Option<String>,
}

/// Unvalidated input for an event update.
///
/// Only these fields are patchable. Status changes go through moderation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub date: Option<String>,
    /// A blank value clears the time of day.
    pub time: Option<String>,
    pub event_type: Option<String>,
    pub title: Option<String>,
    pub details: Option<String>,
    pub color: Option<String>,
    pub completed: Option<bool>,
}

/// Unvalidated input for a new section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDraft {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub academic_year: Option<String>,
    pub semester: Option<String>,
}

/// A command represents user intent as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an event in a section or on the caller's personal calendar.
    CreateEvent {
        /// The event input.
        draft: EventDraft,
    },
    /// Patch whitelisted fields of an event.
    UpdateEvent {
        /// The event to change.
        event_id: i64,
        /// The requested changes.
        changes: EventChanges,
    },
    /// Permanently remove an event.
    DeleteEvent {
        /// The event to remove.
        event_id: i64,
    },
    /// Approve or reject a pending event.
    ModerateEvent {
        /// The event under review.
        event_id: i64,
        /// The moderator's verdict.
        decision: ModerationDecision,
    },
    /// Create a section; the creator joins it.
    CreateSection {
        /// The section input.
        draft: SectionDraft,
    },
    /// Join a section, reactivating a previous membership if one exists.
    JoinSection {
        /// The section to join.
        section_id: i64,
    },
    /// Leave a section.
    LeaveSection {
        /// The section to leave.
        section_id: i64,
    },
}

impl Command {
    /// Returns the action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateEvent { .. } => "CreateEvent",
            Self::UpdateEvent { .. } => "UpdateEvent",
            Self::DeleteEvent { .. } => "DeleteEvent",
            Self::ModerateEvent {
                decision: ModerationDecision::Approve,
                ..
            } => "ApproveEvent",
            Self::ModerateEvent {
                decision: ModerationDecision::Reject,
                ..
            } => "RejectEvent",
            Self::CreateSection { .. } => "CreateSection",
            Self::JoinSection { .. } => "JoinSection",
            Self::LeaveSection { .. } => "LeaveSection",
        }
    }
}
