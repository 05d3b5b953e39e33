// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DEFAULT_EVENT_COLOR, Event, EventStatus, EventType, Priority, Role, Section, Viewer,
    Visibility,
};
use time::macros::{date, datetime};

pub const SECTION_A: i64 = 10;
pub const SECTION_B: i64 = 20;

pub fn viewer(user_id: i64, role: Role, sections: &[i64]) -> Viewer {
    Viewer::new(user_id, role, sections.iter().copied())
}

pub fn section_event(event_id: i64, creator_id: i64, section_id: i64, status: EventStatus) -> Event {
    Event {
        event_id,
        creator_id,
        creator_role: Role::Student,
        section_id: Some(section_id),
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

pub fn personal_event(event_id: i64, creator_id: i64, status: EventStatus) -> Event {
    Event {
        section_id: None,
        ..section_event(event_id, creator_id, SECTION_A, status)
    }
}

pub fn section(section_id: i64, creator_id: i64) -> Section {
    Section {
        section_id,
        name: String::from("Intro to Computing"),
        code: String::from("CSE101"),
        description: None,
        creator_id,
        academic_year: Some(String::from("2026")),
        semester: Some(String::from("Fall")),
        created_at: datetime!(2026-01-05 08:00 UTC),
    }
}
