// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, AuthenticatedActor, CreateEventRequest, UpdateEventRequest, create_event,
    delete_event, get_event, update_event,
};

use super::helpers::{
    Classroom, classroom, event_request, new_event, new_section, register,
    setup_test_persistence, visible_titles,
};

#[test]
fn test_create_event_applies_defaults_and_hydrates() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        teacher,
        section_id,
        ..
    } = classroom(&mut persistence);

    let event = new_event(&mut persistence, &teacher, Some(section_id), "  Midterm  ");

    assert_eq!(event.title, "Midterm");
    assert_eq!(event.date, "2026-07-07");
    assert_eq!(event.time, None);
    assert_eq!(event.details, "");
    assert_eq!(event.color, "#6B7280");
    assert_eq!(event.visibility, "section");
    assert_eq!(event.priority, "medium");
    assert!(!event.completed);
    assert_eq!(event.creator_name, "Turing");
    assert_eq!(event.creator_role, "teacher");
    assert_eq!(event.section_name.as_deref(), Some("Section CSE101"));
    assert_eq!(event.section_code.as_deref(), Some("CSE101"));
}

#[test]
fn test_create_event_accepts_explicit_fields() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);

    let request: CreateEventRequest = CreateEventRequest {
        time: Some(String::from("14:30")),
        details: Some(String::from("Room 4")),
        color: Some(String::from("#FF8800")),
        visibility: Some(String::from("public")),
        priority: Some(String::from("high")),
        ..event_request(Some(section_id), "2026-07-07", "Presentation")
    };
    let event = create_event(&mut persistence, &student, request)
        .unwrap()
        .event;

    assert_eq!(event.time.as_deref(), Some("14:30:00"));
    assert_eq!(event.details, "Room 4");
    assert_eq!(event.color, "#FF8800");
    assert_eq!(event.visibility, "public");
    assert_eq!(event.priority, "high");
    assert_eq!(event.status, "pending");
}

#[test]
fn test_create_event_validation_errors_name_the_field() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);

    let cases: Vec<(CreateEventRequest, &str)> = vec![
        (event_request(Some(section_id), "07/07/2026", "Quiz"), "date"),
        (event_request(Some(section_id), "2026-02-30", "Quiz"), "date"),
        (event_request(Some(section_id), "2026-07-07", "   "), "title"),
        (
            CreateEventRequest {
                event_type: String::from("party"),
                ..event_request(Some(section_id), "2026-07-07", "Quiz")
            },
            "event_type",
        ),
        (
            CreateEventRequest {
                time: Some(String::from("25:00")),
                ..event_request(Some(section_id), "2026-07-07", "Quiz")
            },
            "time",
        ),
        (
            CreateEventRequest {
                color: Some(String::from("red")),
                ..event_request(Some(section_id), "2026-07-07", "Quiz")
            },
            "color",
        ),
        (
            CreateEventRequest {
                priority: Some(String::from("urgent")),
                ..event_request(Some(section_id), "2026-07-07", "Quiz")
            },
            "priority",
        ),
    ];

    for (request, expected_field) in cases {
        let err = create_event(&mut persistence, &student, request).unwrap_err();
        assert!(
            matches!(err, ApiError::InvalidInput { ref field, .. } if field == expected_field),
            "expected {expected_field}, got {err}"
        );
    }
    assert!(visible_titles(&mut persistence, &student).is_empty());
}

#[test]
fn test_posting_to_foreign_section_is_forbidden() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        teacher, student, ..
    } = classroom(&mut persistence);
    let other_section: i64 = new_section(&mut persistence, &teacher, "MATH200");

    let err = create_event(
        &mut persistence,
        &student,
        event_request(Some(other_section), "2026-07-07", "Sneaky"),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }));
}

#[test]
fn test_creator_updates_whitelisted_fields() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);
    let quiz = new_event(&mut persistence, &student, Some(section_id), "Quiz");

    let request: UpdateEventRequest = UpdateEventRequest {
        date: Some(String::from("2026-07-14")),
        time: Some(String::from("08:15")),
        event_type: Some(String::from("assignment")),
        details: Some(String::from("Chapters 1-3")),
        completed: Some(true),
        ..UpdateEventRequest::default()
    };
    let updated = update_event(&mut persistence, &student, quiz.event_id, request)
        .unwrap()
        .event;

    assert_eq!(updated.date, "2026-07-14");
    assert_eq!(updated.time.as_deref(), Some("08:15:00"));
    assert_eq!(updated.event_type, "assignment");
    assert_eq!(updated.details, "Chapters 1-3");
    assert!(updated.completed);
    assert_eq!(updated.title, "Quiz");
    assert_eq!(updated.status, "pending");
}

#[test]
fn test_event_type_uses_type_on_the_wire() {
    let create: CreateEventRequest = serde_json::from_str(
        r#"{"date":"2026-07-07","type":"lecture","title":"Intro"}"#,
    )
    .unwrap();
    assert_eq!(create.event_type, "lecture");

    let legacy: CreateEventRequest = serde_json::from_str(
        r#"{"date":"2026-07-07","event_type":"lecture","title":"Intro"}"#,
    )
    .unwrap();
    assert_eq!(legacy.event_type, "lecture");

    let update: UpdateEventRequest = serde_json::from_str(r#"{"type":"quiz"}"#).unwrap();
    assert_eq!(update.event_type.as_deref(), Some("quiz"));

    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);
    let event = new_event(&mut persistence, &student, Some(section_id), "Quiz");
    let json: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "exam");
    assert!(json.get("event_type").is_none());
}

#[test]
fn test_overlong_title_is_rejected_on_the_title_field() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);
    let title: String = "t".repeat(256);

    let err: ApiError = create_event(
        &mut persistence,
        &student,
        event_request(Some(section_id), "2026-07-07", &title),
    )
    .unwrap_err();

    match err {
        ApiError::InvalidInput { field, message } => {
            assert_eq!(field, "title");
            assert!(message.contains("255"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_empty_time_clears_stored_time() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);
    let timed = create_event(
        &mut persistence,
        &student,
        CreateEventRequest {
            time: Some(String::from("09:30")),
            ..event_request(Some(section_id), "2026-07-07", "Lab")
        },
    )
    .unwrap()
    .event;
    assert_eq!(timed.time.as_deref(), Some("09:30:00"));

    let cleared = update_event(
        &mut persistence,
        &student,
        timed.event_id,
        UpdateEventRequest {
            time: Some(String::new()),
            ..UpdateEventRequest::default()
        },
    )
    .unwrap()
    .event;
    assert_eq!(cleared.time, None);

    let retimed = update_event(
        &mut persistence,
        &student,
        timed.event_id,
        UpdateEventRequest {
            time: Some(String::from("10:00")),
            title: Some(String::from("Lab, later")),
            ..UpdateEventRequest::default()
        },
    )
    .unwrap()
    .event;
    assert_eq!(retimed.time.as_deref(), Some("10:00:00"));
    assert_eq!(retimed.title, "Lab, later");

    let untimed = update_event(
        &mut persistence,
        &student,
        timed.event_id,
        UpdateEventRequest {
            time: Some(String::new()),
            title: Some(String::from("Untimed")),
            ..UpdateEventRequest::default()
        },
    )
    .unwrap()
    .event;
    assert_eq!(untimed.time, None);
    assert_eq!(untimed.title, "Untimed");
}

#[test]
fn test_status_in_update_is_ignored() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        classmate,
        section_id,
        ..
    } = classroom(&mut persistence);
    let quiz = new_event(&mut persistence, &student, Some(section_id), "Quiz");

    let request: UpdateEventRequest = UpdateEventRequest {
        title: Some(String::from("Quiz 1")),
        status: Some(String::from("approved")),
        ..UpdateEventRequest::default()
    };
    let updated = update_event(&mut persistence, &student, quiz.event_id, request)
        .unwrap()
        .event;

    assert_eq!(updated.status, "pending");
    assert!(visible_titles(&mut persistence, &classmate).is_empty());
}

#[test]
fn test_status_only_update_has_no_fields() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        student,
        section_id,
        ..
    } = classroom(&mut persistence);
    let quiz = new_event(&mut persistence, &student, Some(section_id), "Quiz");

    let request: UpdateEventRequest = UpdateEventRequest {
        status: Some(String::from("approved")),
        ..UpdateEventRequest::default()
    };
    let err = update_event(&mut persistence, &student, quiz.event_id, request).unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_classmate_cannot_update_or_delete() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        teacher,
        student,
        classmate,
        section_id,
    } = classroom(&mut persistence);
    let quiz = new_event(&mut persistence, &student, Some(section_id), "Quiz");
    crate::approve_event(&mut persistence, &teacher, quiz.event_id).unwrap();

    let request: UpdateEventRequest = UpdateEventRequest {
        title: Some(String::from("Hijacked")),
        ..UpdateEventRequest::default()
    };
    let err = update_event(&mut persistence, &classmate, quiz.event_id, request).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));

    let err = delete_event(&mut persistence, &classmate, quiz.event_id).unwrap_err();
    assert!(matches!(err, ApiError::Forbidden { .. }));

    assert_eq!(visible_titles(&mut persistence, &classmate), vec!["Quiz"]);
}

#[test]
fn test_teacher_may_edit_and_delete_any_event() {
    let mut persistence = setup_test_persistence();
    let Classroom {
        teacher,
        student,
        section_id,
        ..
    } = classroom(&mut persistence);
    let quiz = new_event(&mut persistence, &student, Some(section_id), "Quiz");

    let request: UpdateEventRequest = UpdateEventRequest {
        color: Some(String::from("#123ABC")),
        ..UpdateEventRequest::default()
    };
    let updated = update_event(&mut persistence, &teacher, quiz.event_id, request)
        .unwrap()
        .event;
    assert_eq!(updated.color, "#123ABC");

    delete_event(&mut persistence, &teacher, quiz.event_id).unwrap();

    assert!(matches!(
        get_event(&mut persistence, &student, quiz.event_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_delete_missing_event_is_not_found() {
    let mut persistence = setup_test_persistence();
    let owner: AuthenticatedActor = register(&mut persistence, "Ada", "student");
    let study = new_event(&mut persistence, &owner, None, "Study");
    delete_event(&mut persistence, &owner, study.event_id).unwrap();

    let err = delete_event(&mut persistence, &owner, study.event_id).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));

    let request: UpdateEventRequest = UpdateEventRequest {
        completed: Some(true),
        ..UpdateEventRequest::default()
    };
    let err = update_event(&mut persistence, &owner, study.event_id, request).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}
