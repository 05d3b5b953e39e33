// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event visibility rules.
//!
//! Visibility is a pure predicate over `(viewer, event)`. It is shared by
//! every read path (listing, single reads, stats, moderation queues) so
//! the rules are decided in exactly one place:
//!
//! - Personal events are visible to their creator only, whatever their status.
//! - Section events are never visible outside the viewer's active sections.
//! - Teachers see every event in their active sections.
//! - Everyone else sees approved events plus their own submissions.

use crate::moderation::EventStatus;
use crate::types::{Event, Role};
use std::cmp::Ordering;
use std::collections::HashSet;

/// The identity evaluating visibility for a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: i64,
    pub role: Role,
    /// Sections the viewer is currently active in.
    pub active_sections: HashSet<i64>,
}

impl Viewer {
    /// Creates a viewer.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The viewer's user id
    /// * `role` - The viewer's registered role
    /// * `active_sections` - Sections with an active membership
    #[must_use]
    pub fn new(user_id: i64, role: Role, active_sections: impl IntoIterator<Item = i64>) -> Self {
        Self {
            user_id,
            role,
            active_sections: active_sections.into_iter().collect(),
        }
    }

    /// Returns true if the viewer is active in `section_id`.
    #[must_use]
    pub fn is_active_in(&self, section_id: i64) -> bool {
        self.active_sections.contains(&section_id)
    }

    /// Returns true if the viewer may moderate events in `section_id`.
    #[must_use]
    pub fn moderates(&self, section_id: i64) -> bool {
        self.role.can_moderate() && self.is_active_in(section_id)
    }
}

/// Decides whether `viewer` may see `event`.
#[must_use]
pub fn is_visible(viewer: &Viewer, event: &Event) -> bool {
    let Some(section_id) = event.section_id else {
        return event.creator_id == viewer.user_id;
    };

    if !viewer.is_active_in(section_id) {
        return false;
    }

    match viewer.role {
        Role::Teacher => true,
        Role::Student | Role::Personal => {
            event.status == EventStatus::Approved || event.creator_id == viewer.user_id
        }
    }
}

/// Orders events by date, then time with untimed events last, then id.
#[must_use]
pub fn compare_events(a: &Event, b: &Event) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| match (a.time, b.time) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.event_id.cmp(&b.event_id))
}

/// Filters `candidates` down to what `viewer` may see, in display order.
#[must_use]
pub fn visible_events(viewer: &Viewer, candidates: Vec<Event>) -> Vec<Event> {
    let mut visible: Vec<Event> = candidates
        .into_iter()
        .filter(|event| is_visible(viewer, event))
        .collect();
    visible.sort_by(compare_events);
    visible
}

/// Returns the pending events `viewer` should review, oldest first.
///
/// Only teachers have a queue. Their own submissions are excluded.
#[must_use]
pub fn moderation_queue(viewer: &Viewer, candidates: Vec<Event>) -> Vec<Event> {
    if !viewer.role.can_moderate() {
        return Vec::new();
    }

    let mut queue: Vec<Event> = candidates
        .into_iter()
        .filter(|event| {
            event.status == EventStatus::Pending
                && event.creator_id != viewer.user_id
                && event.section_id.is_some_and(|id| viewer.moderates(id))
        })
        .collect();
    queue.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    queue
}
