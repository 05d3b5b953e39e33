// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Capability, EventCapabilities, approve_event, get_event};

use super::helpers::{Classroom, classroom, new_event, setup_test_persistence};

fn flags(capabilities: &EventCapabilities) -> [bool; 4] {
    [
        capabilities.can_edit.is_allowed(),
        capabilities.can_delete.is_allowed(),
        capabilities.can_approve.is_allowed(),
        capabilities.can_reject.is_allowed(),
    ]
}

#[test]
fn test_capabilities_follow_role_and_status() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        teacher,
        student,
        classmate,
        section_id,
    } = classroom(&mut persistence);
    let quiz = new_event(&mut persistence, &student, Some(section_id), "Quiz");

    assert_eq!(flags(&quiz.capabilities), [true, true, false, false]);
    let as_teacher = get_event(&mut persistence, &teacher, quiz.event_id).unwrap();
    assert_eq!(flags(&as_teacher.capabilities), [true, true, true, true]);

    approve_event(&mut persistence, &teacher, quiz.event_id).unwrap();

    let as_teacher = get_event(&mut persistence, &teacher, quiz.event_id).unwrap();
    assert_eq!(flags(&as_teacher.capabilities), [true, true, false, false]);
    let as_classmate = get_event(&mut persistence, &classmate, quiz.event_id).unwrap();
    assert_eq!(flags(&as_classmate.capabilities), [false, false, false, false]);
}

#[test]
fn test_capability_serializes_as_bool() {
    let capabilities: EventCapabilities = EventCapabilities {
        can_edit: Capability::Allowed,
        can_delete: Capability::Allowed,
        can_approve: Capability::Denied,
        can_reject: Capability::from_bool(false),
    };

    let json: String = serde_json::to_string(&capabilities).unwrap();

    assert_eq!(
        json,
        r#"{"can_edit":true,"can_delete":true,"can_approve":false,"can_reject":false}"#
    );
    let back: EventCapabilities = serde_json::from_str(&json).unwrap();
    assert_eq!(back, capabilities);
}
