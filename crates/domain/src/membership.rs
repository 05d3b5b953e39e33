// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Section membership rules.
//!
//! Join and leave are planned against a snapshot of the user's current
//! memberships. The persistence layer evaluates the plan inside the same
//! write transaction that applies it, so the snapshot cannot go stale
//! between check and write.

use crate::error::DomainError;
use crate::types::{MembershipStatus, Role, Section};

/// How a successful join is applied to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPlan {
    /// No row exists for the pair yet.
    Insert,
    /// An inactive row exists and is flipped back to active.
    Reactivate,
}

/// Decides whether a user may join `section`.
///
/// # Arguments
///
/// * `role` - The joining user's role
/// * `section` - The target section
/// * `existing` - Status of the user's row for this section, if any
/// * `active_sections` - Every section the user is currently active in
///
/// # Errors
///
/// - `RoleNotPermitted` for personal-role users
/// - `AlreadyMember` if the user is already active in the section
/// - `SectionLimitExceeded` if a student is already active elsewhere
pub fn plan_join(
    role: Role,
    section: &Section,
    existing: Option<MembershipStatus>,
    active_sections: &[i64],
) -> Result<JoinPlan, DomainError> {
    if role == Role::Personal {
        return Err(DomainError::RoleNotPermitted {
            action: String::from("join sections"),
            role: role.as_str().to_string(),
        });
    }

    if existing == Some(MembershipStatus::Active) || active_sections.contains(&section.section_id)
    {
        return Err(DomainError::AlreadyMember {
            section_id: section.section_id,
        });
    }

    if let Some(limit) = role.active_section_limit() {
        if active_sections.len() >= limit {
            let active_section_id: i64 = active_sections.first().copied().unwrap_or_default();
            return Err(DomainError::SectionLimitExceeded { active_section_id });
        }
    }

    match existing {
        Some(MembershipStatus::Inactive) => Ok(JoinPlan::Reactivate),
        Some(MembershipStatus::Active) | None => Ok(JoinPlan::Insert),
    }
}

/// Decides whether `user_id` may leave `section`.
///
/// # Errors
///
/// - `NotMember` if the user has no active membership in the section
/// - `CreatorCannotLeave` if the user created the section
pub fn check_leave(
    user_id: i64,
    section: &Section,
    existing: Option<MembershipStatus>,
) -> Result<(), DomainError> {
    match existing {
        Some(MembershipStatus::Active) => {}
        Some(MembershipStatus::Inactive) | None => {
            return Err(DomainError::NotMember {
                section_id: section.section_id,
            });
        }
    }

    if section.creator_id == user_id {
        return Err(DomainError::CreatorCannotLeave {
            section_id: section.section_id,
        });
    }

    Ok(())
}
