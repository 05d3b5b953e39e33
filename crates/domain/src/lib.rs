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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod access;
mod clock;
mod error;
mod filter;
mod membership;
mod moderation;
mod stats;
mod types;
mod validation;
mod visibility;

#[cfg(test)]
mod tests;

pub use access::{
    authorize_event_edit, authorize_event_post, authorize_moderation, authorize_section_creation,
};
pub use clock::{calendar_date_in, parse_timezone, today_in};
pub use error::DomainError;
pub use filter::{EventFilter, EventQuery};
pub use membership::{JoinPlan, check_leave, plan_join};
pub use moderation::{EventStatus, ModerationDecision};
pub use stats::{UserStats, compute_user_stats};

// Re-export public types
pub use types::{
    DEFAULT_EVENT_COLOR, Event, EventPatch, EventType, MembershipStatus, ModerationRecord,
    NewEvent, NewSection, Priority, Role, Section, SectionMembership, User, Visibility,
};
pub use validation::{
    format_event_date, format_event_time, normalize_email, normalize_name, normalize_section_code,
    normalize_title, parse_event_date, parse_event_time, validate_color,
};
pub use visibility::{Viewer, compare_events, is_visible, moderation_queue, visible_events};
