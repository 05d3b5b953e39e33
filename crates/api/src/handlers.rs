// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every state-changing handler follows the same shape:
//!
//! 1. Build the caller's `Viewer` from their active memberships
//! 2. Load the records the command targets into a `Snapshot`
//! 3. Run the pure `apply` transition
//! 4. Persist the mutation and its audit event in one transaction
//! 5. Re-read and hydrate the result for the caller
//!
//! Read handlers never return an event the caller cannot see.

use studytrack::{
    Command, EventChanges, EventDraft, SectionDraft, Snapshot, TransitionResult, apply,
};
use studytrack_domain::{
    DomainError, Event, EventFilter, EventQuery, MembershipStatus, ModerationDecision, Role,
    Section, User, UserStats, Viewer, compute_user_stats, format_event_date, format_event_time,
    is_visible, moderation_queue, normalize_email, normalize_name, visible_events,
};
use studytrack_persistence::{EventRecord, PersistTransitionResult, Persistence, SectionSummary};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};

use crate::auth::AuthenticatedActor;
use crate::capabilities::{compute_event_capabilities, compute_global_capabilities};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreateEventRequest, CreateSectionRequest, CreateSectionResponse, DeleteEventResponse,
    EventInfo, EventResponse, ListEventsRequest, ListEventsResponse, ListSectionsResponse,
    MembershipResponse, RegisterUserRequest, RegisterUserResponse, SectionInfo, UpdateEventRequest,
    UserInfo, UserStatsResponse, WhoAmIResponse,
};

// ============================================================================
// Shared helpers
// ============================================================================

/// Builds the caller's viewer from their current active memberships.
fn load_viewer(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Viewer, ApiError> {
    let active_sections: Vec<i64> = persistence
        .active_section_ids(actor.user_id)
        .map_err(translate_persistence_error)?;

    Ok(Viewer::new(actor.user_id, actor.role, active_sections))
}

/// Returns the viewer's active sections in ascending order.
fn active_section_ids(viewer: &Viewer) -> Vec<i64> {
    let mut ids: Vec<i64> = viewer.active_sections.iter().copied().collect();
    ids.sort_unstable();
    ids
}

/// Runs a command against a snapshot and persists the result.
fn execute(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    viewer: &Viewer,
    snapshot: &Snapshot<'_>,
    command: Command,
) -> Result<PersistTransitionResult, ApiError> {
    let transition: TransitionResult = apply(
        viewer,
        snapshot,
        command,
        actor.to_audit_actor(),
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_transition(&transition)
        .map_err(translate_persistence_error)
}

/// Extracts the id a persisted insert was assigned.
fn created_id(result: PersistTransitionResult, action: &str) -> Result<i64, ApiError> {
    result.entity_id.ok_or_else(|| {
        error!(
            action,
            audit_id = result.audit_id,
            "Persisted insert reported no id"
        );
        ApiError::internal()
    })
}

fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, ApiError> {
    timestamp.format(&Rfc3339).map_err(|e| {
        error!(error = %e, "Failed to format timestamp");
        ApiError::internal()
    })
}

fn to_user_info(user: &User) -> UserInfo {
    UserInfo {
        user_id: user.user_id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        student_id: user.student_id.clone(),
    }
}

fn to_section_info(summary: SectionSummary, is_member: bool) -> Result<SectionInfo, ApiError> {
    let SectionSummary {
        section,
        creator_name,
        member_count,
    } = summary;

    Ok(SectionInfo {
        section_id: section.section_id,
        name: section.name,
        code: section.code,
        description: section.description,
        creator_id: section.creator_id,
        creator_name,
        academic_year: section.academic_year,
        semester: section.semester,
        member_count,
        is_member,
        created_at: format_timestamp(section.created_at)?,
    })
}

fn to_event_info(viewer: &Viewer, record: EventRecord) -> Result<EventInfo, ApiError> {
    let EventRecord {
        event,
        creator_name,
        section_name,
        section_code,
    } = record;

    let capabilities = compute_event_capabilities(viewer, &event);
    let approved_at: Option<String> = event
        .moderation
        .map(|m| format_timestamp(m.approved_at))
        .transpose()?;

    Ok(EventInfo {
        event_id: event.event_id,
        creator_id: event.creator_id,
        creator_name,
        creator_role: event.creator_role.as_str().to_string(),
        section_id: event.section_id,
        section_name,
        section_code,
        date: format_event_date(event.date),
        time: event.time.map(format_event_time),
        event_type: event.event_type.as_str().to_string(),
        title: event.title,
        details: event.details,
        color: event.color,
        status: event.status.as_str().to_string(),
        visibility: event.visibility.as_str().to_string(),
        priority: event.priority.as_str().to_string(),
        completed: event.completed,
        created_at: format_timestamp(event.created_at)?,
        approved_by: event.moderation.map(|m| m.approved_by),
        approved_at,
        capabilities,
    })
}

/// Hydrates events and converts them for the viewer, preserving order.
fn to_event_infos(
    persistence: &mut Persistence,
    viewer: &Viewer,
    events: Vec<Event>,
) -> Result<Vec<EventInfo>, ApiError> {
    persistence
        .hydrate_events(events)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|record| to_event_info(viewer, record))
        .collect()
}

/// Re-reads one event after a mutation and converts it for the viewer.
fn reload_event(
    persistence: &mut Persistence,
    viewer: &Viewer,
    event_id: i64,
) -> Result<EventInfo, ApiError> {
    let event: Event = persistence
        .find_event(event_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::EventNotFound(event_id)))?;

    to_event_infos(persistence, viewer, vec![event])?
        .pop()
        .ok_or_else(|| translate_domain_error(DomainError::EventNotFound(event_id)))
}

fn find_event(persistence: &mut Persistence, event_id: i64) -> Result<Option<Event>, ApiError> {
    persistence
        .find_event(event_id)
        .map_err(translate_persistence_error)
}

/// Loads the targeted section and the caller's membership row.
fn load_section_target(
    persistence: &mut Persistence,
    section_id: i64,
    user_id: i64,
) -> Result<(Option<Section>, Option<MembershipStatus>), ApiError> {
    let section: Option<Section> = persistence
        .find_section(section_id)
        .map_err(translate_persistence_error)?;
    let membership: Option<MembershipStatus> = persistence
        .membership_status(section_id, user_id)
        .map_err(translate_persistence_error)?;
    Ok((section, membership))
}

/// Pending events awaiting the viewer's decision, oldest first.
fn load_moderation_queue(
    persistence: &mut Persistence,
    viewer: &Viewer,
) -> Result<Vec<Event>, ApiError> {
    if !viewer.role.can_moderate() {
        return Ok(Vec::new());
    }

    let pending: Vec<Event> = persistence
        .pending_events_in(&active_section_ids(viewer))
        .map_err(translate_persistence_error)?;
    Ok(moderation_queue(viewer, pending))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Users
// ============================================================================

/// Registers a user directory record.
///
/// Credentials are out of scope; the record is what the identity provider's
/// user id resolves to.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The registration request
///
/// # Errors
///
/// Returns an error if:
/// - The name, email or role is invalid
/// - The email is already registered
pub fn register_user(
    persistence: &mut Persistence,
    request: RegisterUserRequest,
) -> Result<RegisterUserResponse, ApiError> {
    let name: String = normalize_name(&request.name).map_err(translate_domain_error)?;
    let email: String = normalize_email(&request.email).map_err(translate_domain_error)?;
    let role: Role = request
        .role
        .trim()
        .to_lowercase()
        .parse()
        .map_err(translate_domain_error)?;
    let student_id: Option<String> = non_blank(request.student_id);

    let user: User = persistence
        .create_user(&name, &email, role, student_id.as_deref())
        .map_err(translate_persistence_error)?;

    info!(user_id = user.user_id, role = role.as_str(), "Registered user");

    Ok(RegisterUserResponse {
        message: format!("Registered {} as {}", user.name, role.as_str()),
        user: to_user_info(&user),
    })
}

/// Describes the caller.
///
/// # Errors
///
/// Returns an error if the caller's record cannot be read.
pub fn whoami(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<WhoAmIResponse, ApiError> {
    let user: User = persistence
        .find_user(actor.user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::UserNotFound(actor.user_id)))?;
    let viewer: Viewer = load_viewer(persistence, actor)?;

    Ok(WhoAmIResponse {
        user: to_user_info(&user),
        active_sections: active_section_ids(&viewer),
        capabilities: compute_global_capabilities(actor.role),
    })
}

/// Computes counts over the caller's visible events.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The caller
/// * `today` - The current date in the calendar's timezone
///
/// # Errors
///
/// Returns an error if a read fails.
pub fn user_stats(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    today: Date,
) -> Result<UserStatsResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let candidates: Vec<Event> = persistence
        .candidate_events(viewer.user_id, &active_section_ids(&viewer))
        .map_err(translate_persistence_error)?;
    let queue_len: usize = load_moderation_queue(persistence, &viewer)?.len();

    let stats: UserStats = compute_user_stats(&viewer, &candidates, queue_len, today);

    Ok(UserStatsResponse {
        total_events: stats.total_events,
        upcoming_events: stats.upcoming_events,
        completed_events: stats.completed_events,
        pending_events: stats.pending_events,
        my_sections: stats.my_sections,
        pending_moderation: stats.pending_moderation,
    })
}

// ============================================================================
// Sections
// ============================================================================

/// Creates a section. The creator becomes its first active member.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a teacher
/// - The name or code is invalid
/// - The code is already taken
pub fn create_section(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateSectionRequest,
) -> Result<CreateSectionResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let draft: SectionDraft = SectionDraft {
        name: request.name,
        code: request.code,
        description: request.description,
        academic_year: request.academic_year,
        semester: request.semester,
    };

    let result: PersistTransitionResult = execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::empty(),
        Command::CreateSection { draft },
    )?;
    let section_id: i64 = created_id(result, "CreateSection")?;

    let section: Section = persistence
        .find_section(section_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::SectionNotFound(section_id)))?;

    let message: String = format!("Created section {} ({})", section.name, section.code);
    let summary: SectionSummary = SectionSummary {
        section,
        creator_name: actor.name.clone(),
        member_count: 1,
    };

    Ok(CreateSectionResponse {
        section: to_section_info(summary, true)?,
        message,
    })
}

/// Lists every section, newest first, flagging the caller's memberships.
///
/// # Errors
///
/// Returns an error if a read fails.
pub fn list_sections(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListSectionsResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let summaries: Vec<SectionSummary> = persistence
        .list_sections()
        .map_err(translate_persistence_error)?;

    let sections: Vec<SectionInfo> = summaries
        .into_iter()
        .map(|summary| {
            let is_member: bool = viewer.is_active_in(summary.section.section_id);
            to_section_info(summary, is_member)
        })
        .collect::<Result<_, _>>()?;

    Ok(ListSectionsResponse { sections })
}

/// Joins a section, reactivating a previous membership if one exists.
///
/// # Errors
///
/// Returns an error if:
/// - The section does not exist
/// - The caller's role may not join sections
/// - The caller is already a member
/// - A student is already active in another section
pub fn join_section(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section_id: i64,
) -> Result<MembershipResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let (section, membership) = load_section_target(persistence, section_id, actor.user_id)?;

    execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::with_section(section.as_ref(), membership),
        Command::JoinSection { section_id },
    )?;

    Ok(MembershipResponse {
        section_id,
        status: MembershipStatus::Active.as_str().to_string(),
        message: format!("Joined section {section_id}"),
    })
}

/// Leaves a section. The membership is deactivated, not removed.
///
/// # Errors
///
/// Returns an error if:
/// - The section does not exist
/// - The caller is not an active member
/// - The caller created the section
pub fn leave_section(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section_id: i64,
) -> Result<MembershipResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let (section, membership) = load_section_target(persistence, section_id, actor.user_id)?;

    execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::with_section(section.as_ref(), membership),
        Command::LeaveSection { section_id },
    )?;

    Ok(MembershipResponse {
        section_id,
        status: MembershipStatus::Inactive.as_str().to_string(),
        message: format!("Left section {section_id}"),
    })
}

// ============================================================================
// Events
// ============================================================================

/// Creates an event.
///
/// Student submissions to a section start `pending`; everything else is
/// approved on creation with the creator recorded as approver.
///
/// # Errors
///
/// Returns an error if:
/// - Any field fails validation
/// - The caller is not an active member of the target section
pub fn create_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateEventRequest,
) -> Result<EventResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let draft: EventDraft = EventDraft {
        section_id: request.section_id,
        date: request.date,
        time: request.time,
        event_type: request.event_type,
        title: request.title,
        details: request.details,
        color: request.color,
        visibility: request.visibility,
        priority: request.priority,
    };

    let result: PersistTransitionResult = execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::empty(),
        Command::CreateEvent { draft },
    )?;
    let event_id: i64 = created_id(result, "CreateEvent")?;
    let event: EventInfo = reload_event(persistence, &viewer, event_id)?;

    Ok(EventResponse {
        message: format!("Created event '{}' ({})", event.title, event.status),
        event,
    })
}

/// Reads one event.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the event does not exist or the caller
/// cannot see it.
pub fn get_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    event_id: i64,
) -> Result<EventInfo, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;

    match find_event(persistence, event_id)? {
        Some(event) if is_visible(&viewer, &event) => {
            reload_event(persistence, &viewer, event.event_id)
        }
        _ => Err(translate_domain_error(DomainError::EventNotFound(event_id))),
    }
}

/// Updates the whitelisted fields of an event.
///
/// A `status` in the request is ignored; moderation goes through
/// `approve_event` and `reject_event`.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The caller is neither the creator nor a teacher
/// - No patchable field was supplied, or a field fails validation
pub fn update_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    event_id: i64,
    request: UpdateEventRequest,
) -> Result<EventResponse, ApiError> {
    if let Some(status) = &request.status {
        warn!(
            event_id,
            user_id = actor.user_id,
            status = %status,
            "Ignoring status in event update"
        );
    }

    let viewer: Viewer = load_viewer(persistence, actor)?;
    let event: Option<Event> = find_event(persistence, event_id)?;
    let changes: EventChanges = EventChanges {
        date: request.date,
        time: request.time,
        event_type: request.event_type,
        title: request.title,
        details: request.details,
        color: request.color,
        completed: request.completed,
    };

    execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::with_event(event.as_ref()),
        Command::UpdateEvent { event_id, changes },
    )?;

    Ok(EventResponse {
        event: reload_event(persistence, &viewer, event_id)?,
        message: format!("Updated event {event_id}"),
    })
}

/// Permanently deletes an event.
///
/// # Errors
///
/// Returns an error if the event does not exist or the caller is neither
/// its creator nor a teacher.
pub fn delete_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    event_id: i64,
) -> Result<DeleteEventResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let event: Option<Event> = find_event(persistence, event_id)?;

    execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::with_event(event.as_ref()),
        Command::DeleteEvent { event_id },
    )?;

    Ok(DeleteEventResponse {
        event_id,
        message: format!("Deleted event {event_id}"),
    })
}

/// Approves a pending event.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The caller is not a teacher active in the event's section
/// - The event is not pending
pub fn approve_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    event_id: i64,
) -> Result<EventResponse, ApiError> {
    moderate_event(persistence, actor, event_id, ModerationDecision::Approve)
}

/// Rejects a pending event.
///
/// # Errors
///
/// Returns an error if:
/// - The event does not exist
/// - The caller is not a teacher active in the event's section
/// - The event is not pending
pub fn reject_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    event_id: i64,
) -> Result<EventResponse, ApiError> {
    moderate_event(persistence, actor, event_id, ModerationDecision::Reject)
}

fn moderate_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    event_id: i64,
    decision: ModerationDecision,
) -> Result<EventResponse, ApiError> {
    let viewer: Viewer = load_viewer(persistence, actor)?;
    let event: Option<Event> = find_event(persistence, event_id)?;

    execute(
        persistence,
        actor,
        &viewer,
        &Snapshot::with_event(event.as_ref()),
        Command::ModerateEvent { event_id, decision },
    )?;

    let event: EventInfo = reload_event(persistence, &viewer, event_id)?;

    Ok(EventResponse {
        message: format!("Event {event_id} is now {}", event.status),
        event,
    })
}

/// Lists the caller's visible events, ordered by date then time.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `actor` - The caller
/// * `request` - Filter and search
/// * `today` - The current date in the calendar's timezone
///
/// # Errors
///
/// Returns an error if the filter is unknown or a read fails.
pub fn list_events(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: ListEventsRequest,
    today: Date,
) -> Result<ListEventsResponse, ApiError> {
    let filter: EventFilter = request
        .filter
        .as_deref()
        .map_or("all", str::trim)
        .parse()
        .map_err(translate_domain_error)?;
    let query: EventQuery = EventQuery::new(filter, request.search.as_deref());

    let viewer: Viewer = load_viewer(persistence, actor)?;
    let candidates: Vec<Event> = persistence
        .candidate_events(viewer.user_id, &active_section_ids(&viewer))
        .map_err(translate_persistence_error)?;
    let selected: Vec<Event> = query.apply(
        visible_events(&viewer, candidates),
        viewer.user_id,
        today,
    );

    Ok(ListEventsResponse {
        events: to_event_infos(persistence, &viewer, selected)?,
    })
}

/// Lists the pending events awaiting the caller's moderation, oldest first.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is not a teacher, or an error if a
/// read fails.
pub fn pending_for_teacher(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListEventsResponse, ApiError> {
    if !actor.role.can_moderate() {
        return Err(translate_domain_error(DomainError::RoleNotPermitted {
            action: String::from("view the moderation queue"),
            role: actor.role.as_str().to_string(),
        }));
    }

    let viewer: Viewer = load_viewer(persistence, actor)?;
    let queue: Vec<Event> = load_moderation_queue(persistence, &viewer)?;

    Ok(ListEventsResponse {
        events: to_event_infos(persistence, &viewer, queue)?,
    })
}
