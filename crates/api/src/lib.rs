// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command API for `StudyTrack`.
//!
//! This crate is the boundary transports call into. It resolves caller
//! identity, orchestrates the pure core transitions against persistence,
//! and translates every lower-layer error into the `ApiError` contract.
//!
//! Handlers take the caller as an `AuthenticatedActor` and never trust
//! client-supplied roles, statuses or capabilities.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService};
pub use capabilities::{compute_event_capabilities, compute_global_capabilities};
pub use error::{
    ApiError, AuthError, MembershipRule, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    approve_event, create_event, create_section, delete_event, get_event, join_section,
    leave_section, list_events, list_sections, pending_for_teacher, register_user, reject_event,
    update_event, user_stats, whoami,
};
pub use request_response::{
    Capability, CreateEventRequest, CreateSectionRequest, CreateSectionResponse,
    DeleteEventResponse, EventCapabilities, EventInfo, EventResponse, GlobalCapabilities,
    ListEventsRequest, ListEventsResponse, ListSectionsResponse, MembershipResponse,
    RegisterUserRequest, RegisterUserResponse, SectionInfo, UpdateEventRequest, UserInfo,
    UserStatsResponse, WhoAmIResponse,
};
