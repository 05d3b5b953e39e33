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

use std::str::FromStr;
use studytrack_domain::Role;

/// Represents the user performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting user's id.
    pub user_id: i64,
    /// The acting user's role at the time of the action.
    pub role: Role,
    /// The acting user's display name at the time of the action.
    pub name: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The acting user's id
    /// * `role` - The acting user's role
    /// * `name` - The acting user's display name
    #[must_use]
    pub const fn new(user_id: i64, role: Role, name: String) -> Self {
        Self {
            user_id,
            role,
            name,
        }
    }
}

/// Represents the specific action performed.
///
/// An action describes what state change occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`CreateEvent`", "`ApproveEvent`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The kind of record an audit event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Event,
    Section,
    Membership,
}

impl TargetKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Section => "section",
            Self::Membership => "membership",
        }
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(Self::Event),
            "section" => Ok(Self::Section),
            "membership" => Ok(Self::Membership),
            _ => Err(format!("Unknown audit target kind: {s}")),
        }
    }
}

/// The record an audit event refers to.
///
/// `id` is `None` for records that do not exist yet when the event is
/// built; the persistence layer fills it in once the row is inserted.
/// Membership targets carry the section id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditTarget {
    pub kind: TargetKind,
    pub id: Option<i64>,
}

impl AuditTarget {
    /// Targets an existing record.
    #[must_use]
    pub const fn existing(kind: TargetKind, id: i64) -> Self {
        Self { kind, id: Some(id) }
    }

    /// Targets a record that will be created by the same transition.
    #[must_use]
    pub const fn pending(kind: TargetKind) -> Self {
        Self { kind, id: None }
    }
}

/// A snapshot of a record's state, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot used when the record does not exist.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("absent"))
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful mutation produces exactly one audit event, written in
/// the same transaction as the mutation itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The user who initiated this state change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: Action,
    /// The record that changed.
    pub target: AuditTarget,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The user who initiated the change
    /// * `action` - The action that was performed
    /// * `target` - The record that changed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        action: Action,
        target: AuditTarget,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            action,
            target,
            before,
            after,
        }
    }

    /// Returns a copy whose target id is set to `id` if it was still pending.
    #[must_use]
    pub fn resolve_target(mut self, id: i64) -> Self {
        if self.target.id.is_none() {
            self.target.id = Some(id);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(target: AuditTarget) -> AuditEvent {
        AuditEvent::new(
            Actor::new(7, Role::Teacher, String::from("Dr. Rahman")),
            Action::new(String::from("ApproveEvent"), None),
            target,
            StateSnapshot::new(String::from("status=pending")),
            StateSnapshot::new(String::from("status=approved")),
        )
    }

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(7, Role::Student, String::from("Ada"));

        assert_eq!(actor.user_id, 7);
        assert_eq!(actor.role, Role::Student);
        assert_eq!(actor.name, "Ada");
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("JoinSection"),
            Some(String::from("reactivated")),
        );

        assert_eq!(action.name, "JoinSection");
        assert_eq!(action.details.as_deref(), Some("reactivated"));
    }

    #[test]
    fn test_resolve_fills_pending_target_only() {
        let created: AuditEvent = sample_event(AuditTarget::pending(TargetKind::Event));
        assert_eq!(created.resolve_target(12).target.id, Some(12));

        let existing: AuditEvent = sample_event(AuditTarget::existing(TargetKind::Event, 3));
        assert_eq!(existing.resolve_target(12).target.id, Some(3));
    }

    #[test]
    fn test_target_kind_roundtrip() {
        for kind in [TargetKind::Event, TargetKind::Section, TargetKind::Membership] {
            assert_eq!(kind.as_str().parse::<TargetKind>(), Ok(kind));
        }
        assert!("operator".parse::<TargetKind>().is_err());
    }

    #[test]
    fn test_absent_snapshot() {
        assert_eq!(StateSnapshot::absent().data, "absent");
    }
}
