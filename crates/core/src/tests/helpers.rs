// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::EventDraft;
use studytrack_audit::Actor;
use studytrack_domain::{
    DEFAULT_EVENT_COLOR, Event, EventStatus, EventType, Priority, Role, Section, Viewer,
    Visibility,
};
use time::OffsetDateTime;
use time::macros::{date, datetime};

pub const SECTION_ID: i64 = 10;
pub const TEACHER_ID: i64 = 1;
pub const STUDENT_ID: i64 = 2;
pub const OTHER_STUDENT_ID: i64 = 3;

pub fn now() -> OffsetDateTime {
    datetime!(2026-06-15 12:00 UTC)
}

pub fn create_test_actor(viewer: &Viewer) -> Actor {
    Actor::new(viewer.user_id, viewer.role, format!("user-{}", viewer.user_id))
}

pub fn teacher() -> Viewer {
    Viewer::new(TEACHER_ID, Role::Teacher, [SECTION_ID])
}

pub fn student() -> Viewer {
    Viewer::new(STUDENT_ID, Role::Student, [SECTION_ID])
}

pub fn other_student() -> Viewer {
    Viewer::new(OTHER_STUDENT_ID, Role::Student, [SECTION_ID])
}

pub fn quiz_draft(section_id: Option<i64>) -> EventDraft {
    EventDraft {
        section_id,
        date: String::from("2026-07-07"),
        event_type: String::from("exam"),
        title: String::from("Quiz"),
        ..EventDraft::default()
    }
}

pub fn stored_event(event_id: i64, creator_id: i64, status: EventStatus) -> Event {
    Event {
        event_id,
        creator_id,
        creator_role: Role::Student,
        section_id: Some(SECTION_ID),
        date: date!(2026 - 07 - 07),
        time: None,
        event_type: EventType::Exam,
        title: String::from("Quiz"),
        details: String::new(),
        color: String::from(DEFAULT_EVENT_COLOR),
        status,
        visibility: Visibility::Section,
        priority: Priority::Medium,
        completed: false,
        created_at: datetime!(2026-06-01 09:00 UTC),
        moderation: None,
    }
}

pub fn stored_section(section_id: i64, creator_id: i64) -> Section {
    Section {
        section_id,
        name: String::from("Intro to Computing"),
        code: String::from("CSE101"),
        description: None,
        creator_id,
        academic_year: None,
        semester: None,
        created_at: datetime!(2026-01-05 08:00 UTC),
    }
}
