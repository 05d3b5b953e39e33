// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event moderation lifecycle.
//!
//! Section events submitted by non-teachers start `pending` and must be
//! approved by a teacher of the section before the rest of the section
//! can see them. The only transitions are `pending → approved` and
//! `pending → rejected`; both targets are terminal.

use crate::error::DomainError;
use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Moderation status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Awaiting teacher review
    Pending,
    /// Visible to the whole section
    Approved,
    /// Hidden from everyone but the creator and teachers
    Rejected,
}

impl EventStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the status an event starts in.
    ///
    /// Teacher-created section events are approved on creation. Every other
    /// section event waits for review. Personal events are never reviewed and
    /// start approved.
    ///
    /// # Arguments
    ///
    /// * `creator_role` - The creator's role at creation time
    /// * `section_id` - The event's section, `None` for personal events
    #[must_use]
    pub const fn initial(creator_role: Role, section_id: Option<i64>) -> Self {
        if section_id.is_none() {
            return Self::Approved;
        }
        match creator_role {
            Role::Teacher => Self::Approved,
            Role::Student | Role::Personal => Self::Pending,
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Re-applying the current status is rejected as well, so a second
    /// approval of an approved event surfaces as an error.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        let valid: bool = match self {
            Self::Pending => matches!(new_status, Self::Approved | Self::Rejected),
            Self::Approved | Self::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
            })
        }
    }
}

impl FromStr for EventStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidEventStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A teacher's verdict on a pending event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl ModerationDecision {
    /// Returns the status the event moves to under this decision.
    #[must_use]
    pub const fn target_status(&self) -> EventStatus {
        match self {
            Self::Approve => EventStatus::Approved,
            Self::Reject => EventStatus::Rejected,
        }
    }

    /// Returns the verb used in audit records and log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}
