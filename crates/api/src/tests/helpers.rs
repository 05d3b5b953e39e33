// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use studytrack_persistence::Persistence;
use time::Date;
use time::macros::date;

use crate::{
    AuthenticatedActor, CreateEventRequest, CreateSectionRequest, EventInfo, ListEventsRequest,
    RegisterUserRequest, create_event, create_section, join_section, list_events, register_user,
};

/// The calendar date tests treat as today.
pub const TODAY: Date = date!(2026 - 07 - 01);

pub fn setup_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Registers a user and returns them as an authenticated caller.
pub fn register(persistence: &mut Persistence, name: &str, role: &str) -> AuthenticatedActor {
    let request: RegisterUserRequest = RegisterUserRequest {
        name: String::from(name),
        email: format!("{}@example.edu", name.to_lowercase()),
        role: String::from(role),
        student_id: None,
    };
    let response = register_user(persistence, request).expect("Failed to register user");

    AuthenticatedActor::new(
        response.user.user_id,
        response.user.role.parse().expect("valid role"),
        response.user.name,
    )
}

pub fn new_section(persistence: &mut Persistence, teacher: &AuthenticatedActor, code: &str) -> i64 {
    let request: CreateSectionRequest = CreateSectionRequest {
        name: format!("Section {code}"),
        code: String::from(code),
        ..CreateSectionRequest::default()
    };
    create_section(persistence, teacher, request)
        .expect("Failed to create section")
        .section
        .section_id
}

pub fn join(persistence: &mut Persistence, actor: &AuthenticatedActor, section_id: i64) {
    join_section(persistence, actor, section_id).expect("Failed to join section");
}

pub fn event_request(section_id: Option<i64>, date: &str, title: &str) -> CreateEventRequest {
    CreateEventRequest {
        section_id,
        date: String::from(date),
        event_type: String::from("exam"),
        title: String::from(title),
        ..CreateEventRequest::default()
    }
}

pub fn new_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section_id: Option<i64>,
    title: &str,
) -> EventInfo {
    create_event(
        persistence,
        actor,
        event_request(section_id, "2026-07-07", title),
    )
    .expect("Failed to create event")
    .event
}

/// Titles of the events `actor` sees with the default filter.
pub fn visible_titles(persistence: &mut Persistence, actor: &AuthenticatedActor) -> Vec<String> {
    list_events(persistence, actor, ListEventsRequest::default(), TODAY)
        .expect("Failed to list events")
        .events
        .into_iter()
        .map(|e| e.title)
        .collect()
}

/// Teacher `T` with section `CSE101`, students `S` and `S2` joined to it.
pub struct Classroom {
    pub teacher: AuthenticatedActor,
    pub student: AuthenticatedActor,
    pub classmate: AuthenticatedActor,
    pub section_id: i64,
}

pub fn classroom(persistence: &mut Persistence) -> Classroom {
    let teacher: AuthenticatedActor = register(persistence, "Turing", "teacher");
    let student: AuthenticatedActor = register(persistence, "Ada", "student");
    let classmate: AuthenticatedActor = register(persistence, "Grace", "student");
    let section_id: i64 = new_section(persistence, &teacher, "CSE101");
    join(persistence, &student, section_id);
    join(persistence, &classmate, section_id);

    Classroom {
        teacher,
        student,
        classmate,
        section_id,
    }
}
