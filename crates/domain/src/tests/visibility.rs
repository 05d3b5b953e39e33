// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{SECTION_A, SECTION_B, personal_event, section_event, viewer};
use crate::{
    Event, EventStatus, Role, compare_events, is_visible, moderation_queue, visible_events,
};
use std::cmp::Ordering;
use time::macros::{datetime, time};

const ALL_STATUSES: [EventStatus; 3] = [
    EventStatus::Pending,
    EventStatus::Approved,
    EventStatus::Rejected,
];
const ALL_ROLES: [Role; 3] = [Role::Student, Role::Teacher, Role::Personal];

#[test]
fn test_personal_events_are_invisible_to_everyone_but_the_creator() {
    for status in ALL_STATUSES {
        let event: Event = personal_event(1, 7, status);
        for role in ALL_ROLES {
            for other in [1, 2, 8, 100] {
                let v = viewer(other, role, &[SECTION_A, SECTION_B]);
                assert!(!is_visible(&v, &event), "user {other} saw personal event");
            }
            assert!(is_visible(&viewer(7, role, &[]), &event));
        }
    }
}

#[test]
fn test_teacher_sees_every_status_in_their_sections() {
    let teacher = viewer(1, Role::Teacher, &[SECTION_A]);
    for status in ALL_STATUSES {
        let event: Event = section_event(5, 2, SECTION_A, status);
        assert!(is_visible(&teacher, &event));
    }
}

#[test]
fn test_teacher_sees_nothing_outside_their_sections() {
    let teacher = viewer(1, Role::Teacher, &[SECTION_A]);
    for status in ALL_STATUSES {
        let event: Event = section_event(5, 2, SECTION_B, status);
        assert!(!is_visible(&teacher, &event));
    }
}

#[test]
fn test_student_always_sees_own_section_events() {
    let student = viewer(3, Role::Student, &[SECTION_A]);
    for status in ALL_STATUSES {
        let event: Event = section_event(5, 3, SECTION_A, status);
        assert!(is_visible(&student, &event));
    }
}

#[test]
fn test_student_sees_only_approved_events_from_others() {
    let student = viewer(3, Role::Student, &[SECTION_A]);
    assert!(is_visible(
        &student,
        &section_event(5, 4, SECTION_A, EventStatus::Approved)
    ));
    assert!(!is_visible(
        &student,
        &section_event(6, 4, SECTION_A, EventStatus::Pending)
    ));
    assert!(!is_visible(
        &student,
        &section_event(7, 4, SECTION_A, EventStatus::Rejected)
    ));
}

#[test]
fn test_former_member_loses_visibility_of_own_section_events() {
    let event: Event = section_event(5, 3, SECTION_A, EventStatus::Approved);
    let left = viewer(3, Role::Student, &[SECTION_B]);
    assert!(!is_visible(&left, &event));
}

#[test]
fn test_approval_makes_event_visible_to_every_member() {
    let mut event: Event = section_event(5, 3, SECTION_A, EventStatus::Pending);
    let members = [
        viewer(3, Role::Student, &[SECTION_A]),
        viewer(4, Role::Student, &[SECTION_A]),
        viewer(1, Role::Teacher, &[SECTION_A]),
    ];
    assert!(!is_visible(&members[1], &event));

    event.status = EventStatus::Approved;
    for member in &members {
        assert!(is_visible(member, &event));
    }
}

#[test]
fn test_ordering_is_date_then_time_nulls_last_then_id() {
    let mut early = section_event(9, 1, SECTION_A, EventStatus::Approved);
    early.time = Some(time!(08:00));
    let mut late = section_event(3, 1, SECTION_A, EventStatus::Approved);
    late.time = Some(time!(17:30));
    let untimed_low = section_event(4, 1, SECTION_A, EventStatus::Approved);
    let untimed_high = section_event(8, 1, SECTION_A, EventStatus::Approved);
    let mut next_day = section_event(1, 1, SECTION_A, EventStatus::Approved);
    next_day.date = next_day.date.next_day().unwrap();

    assert_eq!(compare_events(&early, &late), Ordering::Less);
    assert_eq!(compare_events(&late, &untimed_low), Ordering::Less);
    assert_eq!(compare_events(&untimed_low, &untimed_high), Ordering::Less);
    assert_eq!(compare_events(&untimed_high, &next_day), Ordering::Less);

    let teacher = viewer(2, Role::Teacher, &[SECTION_A]);
    let sorted: Vec<i64> = visible_events(
        &teacher,
        vec![next_day, untimed_high, late, untimed_low, early],
    )
    .into_iter()
    .map(|e| e.event_id)
    .collect();
    assert_eq!(sorted, vec![9, 3, 4, 8, 1]);
}

#[test]
fn test_visible_events_drops_invisible_candidates() {
    let student = viewer(3, Role::Student, &[SECTION_A]);
    let candidates: Vec<Event> = vec![
        section_event(1, 3, SECTION_A, EventStatus::Pending),
        section_event(2, 4, SECTION_A, EventStatus::Pending),
        section_event(3, 4, SECTION_A, EventStatus::Approved),
        section_event(4, 4, SECTION_B, EventStatus::Approved),
        personal_event(5, 3, EventStatus::Approved),
        personal_event(6, 4, EventStatus::Approved),
    ];
    let ids: Vec<i64> = visible_events(&student, candidates)
        .into_iter()
        .map(|e| e.event_id)
        .collect();
    assert_eq!(ids, vec![1, 3, 5]);
}

#[test]
fn test_moderation_queue_is_oldest_first_and_excludes_own() {
    let teacher = viewer(1, Role::Teacher, &[SECTION_A]);
    let mut newer = section_event(2, 3, SECTION_A, EventStatus::Pending);
    newer.created_at = datetime!(2026-06-03 09:00 UTC);
    let older = section_event(5, 4, SECTION_A, EventStatus::Pending);
    let own = section_event(6, 1, SECTION_A, EventStatus::Pending);
    let approved = section_event(7, 3, SECTION_A, EventStatus::Approved);
    let elsewhere = section_event(8, 3, SECTION_B, EventStatus::Pending);

    let queue: Vec<i64> = moderation_queue(&teacher, vec![newer, older, own, approved, elsewhere])
        .into_iter()
        .map(|e| e.event_id)
        .collect();
    assert_eq!(queue, vec![5, 2]);
}

#[test]
fn test_students_have_no_moderation_queue() {
    let student = viewer(3, Role::Student, &[SECTION_A]);
    let pending = section_event(2, 4, SECTION_A, EventStatus::Pending);
    assert!(moderation_queue(&student, vec![pending]).is_empty());
}
