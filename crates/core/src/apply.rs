// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, EventChanges, EventDraft, SectionDraft};
use crate::error::CoreError;
use crate::state::{Mutation, Snapshot, TransitionResult};
use studytrack_audit::{Action, Actor, AuditEvent, AuditTarget, StateSnapshot, TargetKind};
use studytrack_domain::{
    DEFAULT_EVENT_COLOR, DomainError, Event, EventPatch, EventStatus, EventType, JoinPlan,
    ModerationRecord, NewEvent, NewSection, Priority, Section, Viewer,
    Visibility, authorize_event_edit, authorize_event_post, authorize_moderation,
    authorize_section_creation, check_leave, format_event_date, normalize_name,
    normalize_section_code, normalize_title, parse_event_date, parse_event_time, plan_join,
    validate_color,
};
use time::{Date, OffsetDateTime, Time};

/// Applies a command on behalf of `viewer`, producing a mutation and its audit event.
///
/// This function is pure: it performs no I/O and never mutates its inputs.
///
/// # Arguments
///
/// * `viewer` - The caller, with their active sections
/// * `snapshot` - The stored records the command targets
/// * `command` - The command to apply
/// * `actor` - The caller as recorded in the audit trail
/// * `now` - The time of the request
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the mutation and audit event
/// * `Err(CoreError)` if the command violates a domain rule
///
/// # Errors
///
/// Returns an error if:
/// - The targeted event or section does not exist
/// - The caller is not authorized for the command
/// - The input fails validation
/// - The moderation or membership rules reject the change
pub fn apply(
    viewer: &Viewer,
    snapshot: &Snapshot<'_>,
    command: Command,
    actor: Actor,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.name();

    match command {
        Command::CreateEvent { draft } => {
            let new_event: NewEvent = build_new_event(viewer, draft, now)?;

            let action: Action = Action::new(
                String::from(action_name),
                Some(format!(
                    "Created {} '{}' with status {}",
                    new_event.event_type.as_str(),
                    new_event.title,
                    new_event.status.as_str()
                )),
            );
            let after: StateSnapshot = StateSnapshot::new(format!(
                "section={} date={} status={}",
                describe_section(new_event.section_id),
                format_event_date(new_event.date),
                new_event.status.as_str()
            ));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                action,
                AuditTarget::pending(TargetKind::Event),
                StateSnapshot::absent(),
                after,
            );

            Ok(TransitionResult {
                mutation: Mutation::InsertEvent(new_event),
                audit_event,
            })
        }
        Command::UpdateEvent { event_id, changes } => {
            let event: &Event = require_event(snapshot, event_id)?;
            authorize_event_edit(viewer, event)?;

            let patch: EventPatch = build_patch(changes)?;
            let updated: Event = patch.apply_to(event);

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                Action::new(String::from(action_name), None),
                AuditTarget::existing(TargetKind::Event, event_id),
                describe_event(event),
                describe_event(&updated),
            );

            Ok(TransitionResult {
                mutation: Mutation::UpdateEvent { event_id, patch },
                audit_event,
            })
        }
        Command::DeleteEvent { event_id } => {
            let event: &Event = require_event(snapshot, event_id)?;
            authorize_event_edit(viewer, event)?;

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                Action::new(
                    String::from(action_name),
                    Some(format!("Deleted '{}'", event.title)),
                ),
                AuditTarget::existing(TargetKind::Event, event_id),
                describe_event(event),
                StateSnapshot::absent(),
            );

            Ok(TransitionResult {
                mutation: Mutation::DeleteEvent { event_id },
                audit_event,
            })
        }
        Command::ModerateEvent { event_id, decision } => {
            let event: &Event = require_event(snapshot, event_id)?;
            authorize_moderation(viewer, event)?;

            let to: EventStatus = decision.target_status();
            event.status.validate_transition(to)?;

            let record: ModerationRecord = ModerationRecord {
                approved_by: viewer.user_id,
                approved_at: now,
            };
            let mut moderated: Event = event.clone();
            moderated.status = to;
            moderated.moderation = Some(record);

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                Action::new(String::from(action_name), None),
                AuditTarget::existing(TargetKind::Event, event_id),
                describe_event(event),
                describe_event(&moderated),
            );

            Ok(TransitionResult {
                mutation: Mutation::ModerateEvent {
                    event_id,
                    from: event.status,
                    to,
                    record,
                },
                audit_event,
            })
        }
        Command::CreateSection { draft } => {
            authorize_section_creation(viewer.role)?;
            let new_section: NewSection = build_new_section(viewer.user_id, draft, now)?;

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                Action::new(
                    String::from(action_name),
                    Some(format!(
                        "Created section '{}' ({})",
                        new_section.name, new_section.code
                    )),
                ),
                AuditTarget::pending(TargetKind::Section),
                StateSnapshot::absent(),
                StateSnapshot::new(format!(
                    "code={} creator={}",
                    new_section.code, new_section.creator_id
                )),
            );

            Ok(TransitionResult {
                mutation: Mutation::InsertSection(new_section),
                audit_event,
            })
        }
        Command::JoinSection { section_id } => {
            let section: &Section = require_section(snapshot, section_id)?;
            let active: Vec<i64> = sorted_active_sections(viewer);
            let plan: JoinPlan = plan_join(viewer.role, section, snapshot.membership, &active)?;

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                Action::new(
                    String::from(action_name),
                    Some(format!("Joined section {} ({plan:?})", section.code)),
                ),
                AuditTarget::existing(TargetKind::Membership, section_id),
                describe_membership(snapshot),
                StateSnapshot::new(String::from("status=active")),
            );

            Ok(TransitionResult {
                mutation: Mutation::JoinSection {
                    section_id,
                    user_id: viewer.user_id,
                    role: viewer.role,
                    joined_at: now,
                },
                audit_event,
            })
        }
        Command::LeaveSection { section_id } => {
            let section: &Section = require_section(snapshot, section_id)?;
            check_leave(viewer.user_id, section, snapshot.membership)?;

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                Action::new(
                    String::from(action_name),
                    Some(format!("Left section {}", section.code)),
                ),
                AuditTarget::existing(TargetKind::Membership, section_id),
                describe_membership(snapshot),
                StateSnapshot::new(String::from("status=inactive")),
            );

            Ok(TransitionResult {
                mutation: Mutation::LeaveSection {
                    section_id,
                    user_id: viewer.user_id,
                },
                audit_event,
            })
        }
    }
}

fn require_event<'a>(snapshot: &Snapshot<'a>, event_id: i64) -> Result<&'a Event, CoreError> {
    snapshot
        .event
        .filter(|event| event.event_id == event_id)
        .ok_or(CoreError::DomainViolation(DomainError::EventNotFound(
            event_id,
        )))
}

fn require_section<'a>(
    snapshot: &Snapshot<'a>,
    section_id: i64,
) -> Result<&'a Section, CoreError> {
    snapshot
        .section
        .filter(|section| section.section_id == section_id)
        .ok_or(CoreError::DomainViolation(DomainError::SectionNotFound(
            section_id,
        )))
}

fn sorted_active_sections(viewer: &Viewer) -> Vec<i64> {
    let mut active: Vec<i64> = viewer.active_sections.iter().copied().collect();
    active.sort_unstable();
    active
}

fn build_new_event(
    viewer: &Viewer,
    draft: EventDraft,
    now: OffsetDateTime,
) -> Result<NewEvent, DomainError> {
    let date: Date = parse_event_date(draft.date.trim())?;
    let time: Option<Time> = non_blank(draft.time.as_deref())
        .map(parse_event_time)
        .transpose()?;
    let event_type: EventType = draft.event_type.trim().parse()?;
    let title: String = normalize_title(&draft.title)?;
    let details: String = draft
        .details
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let color: String = match non_blank(draft.color.as_deref()) {
        Some(color) => validate_color(color)?,
        None => String::from(DEFAULT_EVENT_COLOR),
    };
    let visibility: Visibility = match non_blank(draft.visibility.as_deref()) {
        Some(value) => value.parse()?,
        None => Visibility::default(),
    };
    let priority: Priority = match non_blank(draft.priority.as_deref()) {
        Some(value) => value.parse()?,
        None => Priority::default(),
    };

    let section_id: Option<i64> = draft.section_id.filter(|id| *id > 0);
    authorize_event_post(viewer, section_id)?;

    let status: EventStatus = EventStatus::initial(viewer.role, section_id);
    // Events that skip review record their creator as the approver.
    let moderation: Option<ModerationRecord> =
        (status != EventStatus::Pending).then_some(ModerationRecord {
            approved_by: viewer.user_id,
            approved_at: now,
        });

    Ok(NewEvent {
        creator_id: viewer.user_id,
        creator_role: viewer.role,
        section_id,
        date,
        time,
        event_type,
        title,
        details,
        color,
        status,
        visibility,
        priority,
        created_at: now,
        moderation,
    })
}

fn build_patch(changes: EventChanges) -> Result<EventPatch, DomainError> {
    let patch: EventPatch = EventPatch {
        date: changes
            .date
            .as_deref()
            .map(|d| parse_event_date(d.trim()))
            .transpose()?,
        // A present but blank time clears it.
        time: changes
            .time
            .as_deref()
            .map(|t| non_blank(Some(t)).map(parse_event_time).transpose())
            .transpose()?,
        event_type: changes
            .event_type
            .as_deref()
            .map(|t| t.trim().parse::<EventType>())
            .transpose()?,
        title: changes.title.as_deref().map(normalize_title).transpose()?,
        details: changes.details.as_deref().map(|d| d.trim().to_string()),
        color: changes.color.as_deref().map(validate_color).transpose()?,
        completed: changes.completed,
    };

    if patch.is_empty() {
        return Err(DomainError::NoFieldsToUpdate);
    }
    Ok(patch)
}

fn build_new_section(
    creator_id: i64,
    draft: SectionDraft,
    now: OffsetDateTime,
) -> Result<NewSection, DomainError> {
    Ok(NewSection {
        name: normalize_name(&draft.name)?,
        code: normalize_section_code(&draft.code)?,
        description: non_blank(draft.description.as_deref()).map(str::to_string),
        creator_id,
        academic_year: non_blank(draft.academic_year.as_deref()).map(str::to_string),
        semester: non_blank(draft.semester.as_deref()).map(str::to_string),
        created_at: now,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn describe_section(section_id: Option<i64>) -> String {
    section_id.map_or_else(|| String::from("personal"), |id| id.to_string())
}

fn describe_event(event: &Event) -> StateSnapshot {
    StateSnapshot::new(format!(
        "section={} date={} type={} title={:?} status={} completed={}",
        describe_section(event.section_id),
        format_event_date(event.date),
        event.event_type.as_str(),
        event.title,
        event.status.as_str(),
        event.completed
    ))
}

fn describe_membership(snapshot: &Snapshot<'_>) -> StateSnapshot {
    snapshot.membership.map_or_else(StateSnapshot::absent, |status| {
        StateSnapshot::new(format!("status={}", status.as_str()))
    })
}
