// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::filter::EventFilter;
use crate::types::Event;
use crate::visibility::{Viewer, is_visible};
use time::Date;

/// Dashboard counters for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub completed_events: usize,
    /// The viewer's own submissions awaiting review.
    pub pending_events: usize,
    pub my_sections: usize,
    /// Events waiting for this viewer's review. `None` for non-teachers.
    pub pending_moderation: Option<usize>,
}

/// Computes stats from candidate events.
///
/// Candidates are passed through the visibility predicate first, so the
/// counters always agree with what the viewer can list.
///
/// # Arguments
///
/// * `viewer` - The viewer
/// * `candidates` - Candidate events for the viewer
/// * `moderation_queue_len` - Size of the viewer's moderation queue
/// * `today` - The current calendar date
#[must_use]
pub fn compute_user_stats(
    viewer: &Viewer,
    candidates: &[Event],
    moderation_queue_len: usize,
    today: Date,
) -> UserStats {
    let visible: Vec<&Event> = candidates
        .iter()
        .filter(|event| is_visible(viewer, event))
        .collect();
    let count = |filter: EventFilter| -> usize {
        visible
            .iter()
            .filter(|event| filter.matches(event, viewer.user_id, today))
            .count()
    };

    UserStats {
        total_events: visible.len(),
        upcoming_events: count(EventFilter::Upcoming),
        completed_events: count(EventFilter::Completed),
        pending_events: count(EventFilter::PendingOwn),
        my_sections: viewer.active_sections.len(),
        pending_moderation: viewer.role.can_moderate().then_some(moderation_queue_len),
    }
}
