// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation.
//!
//! Capabilities tell a client which actions to offer. They are derived
//! from the same domain rules the operations enforce, so a capability and
//! the operation it describes cannot disagree. They are never consulted
//! when an operation runs.

use studytrack_domain::{
    Event, EventStatus, Role, Viewer, authorize_event_edit, authorize_moderation,
    authorize_section_creation,
};

use crate::request_response::{Capability, EventCapabilities, GlobalCapabilities};

/// Computes role-level capabilities.
#[must_use]
pub fn compute_global_capabilities(role: Role) -> GlobalCapabilities {
    GlobalCapabilities {
        can_create_section: Capability::from_bool(authorize_section_creation(role).is_ok()),
        can_join_sections: Capability::from_bool(role.active_section_limit() != Some(0)),
        can_moderate: Capability::from_bool(role.can_moderate()),
    }
}

/// Computes what `viewer` may do with `event`.
///
/// Approve and reject are offered only while the event is pending.
#[must_use]
pub fn compute_event_capabilities(viewer: &Viewer, event: &Event) -> EventCapabilities {
    let can_edit: bool = authorize_event_edit(viewer, event).is_ok();
    let can_moderate: bool =
        event.status == EventStatus::Pending && authorize_moderation(viewer, event).is_ok();

    EventCapabilities {
        can_edit: Capability::from_bool(can_edit),
        can_delete: Capability::from_bool(can_edit),
        can_approve: Capability::from_bool(can_moderate),
        can_reject: Capability::from_bool(can_moderate),
    }
}
