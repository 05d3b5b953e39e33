// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization rules for event and section mutations.

use crate::error::DomainError;
use crate::types::{Event, Role};
use crate::visibility::Viewer;

/// Checks that `viewer` may post an event into `section_id`.
///
/// Personal events (`None`) are always allowed.
///
/// # Errors
///
/// Returns `DomainError::NotSectionMember` if the viewer is not active in the section.
pub fn authorize_event_post(viewer: &Viewer, section_id: Option<i64>) -> Result<(), DomainError> {
    match section_id {
        None => Ok(()),
        Some(id) if viewer.is_active_in(id) => Ok(()),
        Some(id) => Err(DomainError::NotSectionMember {
            section_id: id,
            user_id: viewer.user_id,
        }),
    }
}

/// Checks that `viewer` may update or delete `event`.
///
/// The creator may always edit. Teachers may edit any event.
///
/// # Errors
///
/// Returns `DomainError::NotEventOwner` otherwise.
pub fn authorize_event_edit(viewer: &Viewer, event: &Event) -> Result<(), DomainError> {
    if event.creator_id == viewer.user_id {
        return Ok(());
    }
    match viewer.role {
        Role::Teacher => Ok(()),
        Role::Student | Role::Personal => Err(DomainError::NotEventOwner {
            event_id: event.event_id,
            user_id: viewer.user_id,
        }),
    }
}

/// Checks that `viewer` may approve or reject `event`.
///
/// The moderator must be a teacher with an active membership in the
/// event's section. Personal events have no moderator.
///
/// # Errors
///
/// Returns `DomainError::RoleNotPermitted` for non-teachers and
/// `DomainError::NotSectionMember` for teachers outside the section.
pub fn authorize_moderation(viewer: &Viewer, event: &Event) -> Result<(), DomainError> {
    match viewer.role {
        Role::Teacher => {}
        Role::Student | Role::Personal => {
            return Err(DomainError::RoleNotPermitted {
                action: String::from("moderate events"),
                role: viewer.role.as_str().to_string(),
            });
        }
    }

    match event.section_id {
        Some(section_id) if viewer.is_active_in(section_id) => Ok(()),
        Some(section_id) => Err(DomainError::NotSectionMember {
            section_id,
            user_id: viewer.user_id,
        }),
        None => Err(DomainError::RoleNotPermitted {
            action: String::from("moderate personal events"),
            role: viewer.role.as_str().to_string(),
        }),
    }
}

/// Checks that `role` may create sections.
///
/// # Errors
///
/// Returns `DomainError::RoleNotPermitted` unless the role is teacher.
pub fn authorize_section_creation(role: Role) -> Result<(), DomainError> {
    match role {
        Role::Teacher => Ok(()),
        Role::Student | Role::Personal => Err(DomainError::RoleNotPermitted {
            action: String::from("create sections"),
            role: role.as_str().to_string(),
        }),
    }
}
