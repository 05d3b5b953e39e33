// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    SECTION_ID, STUDENT_ID, TEACHER_ID, create_test_actor, now, stored_event, student, teacher,
};
use crate::{Command, CoreError, Mutation, Snapshot, TransitionResult, apply};
use studytrack_domain::{
    DomainError, Event, EventStatus, ModerationDecision, ModerationRecord, Role, Viewer,
};

fn moderate(
    viewer: &Viewer,
    event: Option<&Event>,
    event_id: i64,
    decision: ModerationDecision,
) -> Result<TransitionResult, CoreError> {
    apply(
        viewer,
        &Snapshot::with_event(event),
        Command::ModerateEvent { event_id, decision },
        create_test_actor(viewer),
        now(),
    )
}

#[test]
fn test_teacher_approves_pending_event() {
    let event: Event = stored_event(5, STUDENT_ID, EventStatus::Pending);
    let transition =
        moderate(&teacher(), Some(&event), 5, ModerationDecision::Approve).unwrap();

    assert_eq!(
        transition.mutation,
        Mutation::ModerateEvent {
            event_id: 5,
            from: EventStatus::Pending,
            to: EventStatus::Approved,
            record: ModerationRecord {
                approved_by: TEACHER_ID,
                approved_at: now(),
            },
        }
    );
    assert_eq!(transition.audit_event.action.name, "ApproveEvent");
    assert!(transition.audit_event.before.data.contains("status=pending"));
    assert!(transition.audit_event.after.data.contains("status=approved"));
}

#[test]
fn test_teacher_rejects_pending_event() {
    let event: Event = stored_event(5, STUDENT_ID, EventStatus::Pending);
    let transition = moderate(&teacher(), Some(&event), 5, ModerationDecision::Reject).unwrap();

    let Mutation::ModerateEvent { to, .. } = transition.mutation else {
        panic!("expected ModerateEvent");
    };
    assert_eq!(to, EventStatus::Rejected);
    assert_eq!(transition.audit_event.action.name, "RejectEvent");
}

#[test]
fn test_reject_of_approved_event_is_invalid_transition() {
    let event: Event = stored_event(5, STUDENT_ID, EventStatus::Approved);
    assert_eq!(
        moderate(&teacher(), Some(&event), 5, ModerationDecision::Reject).unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidStatusTransition {
            from: String::from("approved"),
            to: String::from("rejected"),
        })
    );
}

#[test]
fn test_second_approval_is_invalid_transition() {
    let event: Event = stored_event(5, STUDENT_ID, EventStatus::Approved);
    assert!(matches!(
        moderate(&teacher(), Some(&event), 5, ModerationDecision::Approve),
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition { .. }
        ))
    ));
}

#[test]
fn test_missing_event_is_reported_before_authorization() {
    assert_eq!(
        moderate(&student(), None, 5, ModerationDecision::Approve).unwrap_err(),
        CoreError::DomainViolation(DomainError::EventNotFound(5))
    );
}

#[test]
fn test_authorization_is_checked_before_status() {
    let event: Event = stored_event(5, STUDENT_ID, EventStatus::Approved);
    assert!(matches!(
        moderate(&student(), Some(&event), 5, ModerationDecision::Reject),
        Err(CoreError::DomainViolation(DomainError::RoleNotPermitted { .. }))
    ));
}

#[test]
fn test_teacher_of_another_section_cannot_moderate() {
    let event: Event = stored_event(5, STUDENT_ID, EventStatus::Pending);
    let outsider: Viewer = Viewer::new(50, Role::Teacher, [SECTION_ID + 1]);
    assert!(matches!(
        moderate(&outsider, Some(&event), 5, ModerationDecision::Approve),
        Err(CoreError::DomainViolation(DomainError::NotSectionMember { .. }))
    ));
}
