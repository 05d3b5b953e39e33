// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_event, create_section, join, plan, register, run, setup};
use crate::StoredAuditEvent;
use studytrack::{Command, TransitionResult};
use studytrack_audit::TargetKind;
use studytrack_domain::{ModerationDecision, Role};

#[test]
fn test_event_lifecycle_is_audited_in_order() {
    let mut persistence = setup();
    let teacher = register(&mut persistence, "Turing", Role::Teacher);
    let student = register(&mut persistence, "Ada", Role::Student);
    let section_id: i64 = create_section(&mut persistence, &teacher, "A");
    join(&mut persistence, &student, section_id);
    let event_id: i64 = create_event(&mut persistence, &student, Some(section_id), "Quiz");

    run(
        &mut persistence,
        &teacher,
        Command::ModerateEvent {
            event_id,
            decision: ModerationDecision::Approve,
        },
    )
    .unwrap();

    let trail: Vec<StoredAuditEvent> = persistence
        .audit_trail(TargetKind::Event, event_id)
        .unwrap();
    let actions: Vec<&str> = trail
        .iter()
        .map(|e| e.event.action.name.as_str())
        .collect();

    assert_eq!(actions, vec!["CreateEvent", "ApproveEvent"]);
    assert_eq!(trail[0].event.target.id, Some(event_id));
    assert_eq!(trail[0].event.actor.user_id, student.user_id);
    assert_eq!(trail[0].event.before.data, "absent");
    assert_eq!(trail[1].event.actor.role, Role::Teacher);
    assert!(trail[1].event.after.data.contains("status=approved"));
}

#[test]
fn test_membership_changes_are_audited_against_section() {
    let mut persistence = setup();
    let teacher = register(&mut persistence, "Turing", Role::Teacher);
    let student = register(&mut persistence, "Ada", Role::Student);
    let section_id: i64 = create_section(&mut persistence, &teacher, "A");

    join(&mut persistence, &student, section_id);
    run(
        &mut persistence,
        &student,
        Command::LeaveSection { section_id },
    )
    .unwrap();

    let trail: Vec<StoredAuditEvent> = persistence
        .audit_trail(TargetKind::Membership, section_id)
        .unwrap();
    let actions: Vec<&str> = trail
        .iter()
        .map(|e| e.event.action.name.as_str())
        .collect();

    assert_eq!(actions, vec!["JoinSection", "LeaveSection"]);
    assert_eq!(trail[1].event.before.data, "status=active");
    assert_eq!(trail[1].event.after.data, "status=inactive");

    let section_trail: Vec<StoredAuditEvent> = persistence
        .audit_trail(TargetKind::Section, section_id)
        .unwrap();
    assert_eq!(section_trail.len(), 1);
    assert_eq!(section_trail[0].event.action.name, "CreateSection");
}

#[test]
fn test_failed_transition_writes_no_audit_event() {
    let mut persistence = setup();
    let teacher = register(&mut persistence, "Turing", Role::Teacher);
    let section_id: i64 = create_section(&mut persistence, &teacher, "A");
    let event_id: i64 = create_event(&mut persistence, &teacher, Some(section_id), "Lecture");

    let stale_delete: TransitionResult =
        plan(&mut persistence, &teacher, Command::DeleteEvent { event_id });
    persistence.persist_transition(&stale_delete).unwrap();
    assert!(persistence.persist_transition(&stale_delete).is_err());

    let trail: Vec<StoredAuditEvent> = persistence
        .audit_trail(TargetKind::Event, event_id)
        .unwrap();
    let actions: Vec<&str> = trail
        .iter()
        .map(|e| e.event.action.name.as_str())
        .collect();
    assert_eq!(actions, vec!["CreateEvent", "DeleteEvent"]);
}
