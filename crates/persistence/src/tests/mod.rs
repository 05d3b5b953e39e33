// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod user_tests;

use crate::{PersistTransitionResult, Persistence, PersistenceError};
use studytrack::{Command, EventDraft, SectionDraft, Snapshot, TransitionResult, apply};
use studytrack_audit::Actor;
use studytrack_domain::{Event, MembershipStatus, Role, Section, User, Viewer};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

pub fn setup() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn register(persistence: &mut Persistence, name: &str, role: Role) -> User {
    let email: String = format!("{}@example.edu", name.to_lowercase());
    persistence
        .create_user(name, &email, role, None)
        .expect("create user")
}

pub fn viewer_for(persistence: &mut Persistence, user: &User) -> Viewer {
    let active: Vec<i64> = persistence.active_section_ids(user.user_id).unwrap();
    Viewer::new(user.user_id, user.role, active)
}

pub fn actor_for(user: &User) -> Actor {
    Actor::new(user.user_id, user.role, user.name.clone())
}

/// Builds a transition for `user` against the current stored state.
pub fn plan(persistence: &mut Persistence, user: &User, command: Command) -> TransitionResult {
    try_plan(persistence, user, command).expect("command accepted")
}

pub fn try_plan(
    persistence: &mut Persistence,
    user: &User,
    command: Command,
) -> Result<TransitionResult, studytrack::CoreError> {
    try_plan_at(persistence, user, command, OffsetDateTime::now_utc())
}

/// Builds a transition as if it were submitted at `now`.
pub fn try_plan_at(
    persistence: &mut Persistence,
    user: &User,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, studytrack::CoreError> {
    let viewer: Viewer = viewer_for(persistence, user);

    let event: Option<Event> = match &command {
        Command::UpdateEvent { event_id, .. }
        | Command::DeleteEvent { event_id }
        | Command::ModerateEvent { event_id, .. } => persistence.find_event(*event_id).unwrap(),
        _ => None,
    };
    let (section, membership): (Option<Section>, Option<MembershipStatus>) = match &command {
        Command::JoinSection { section_id } | Command::LeaveSection { section_id } => (
            persistence.find_section(*section_id).unwrap(),
            persistence
                .membership_status(*section_id, user.user_id)
                .unwrap(),
        ),
        _ => (None, None),
    };
    let snapshot: Snapshot<'_> = Snapshot {
        event: event.as_ref(),
        section: section.as_ref(),
        membership,
    };

    apply(
        &viewer,
        &snapshot,
        command,
        actor_for(user),
        now,
    )
}

/// Plans and persists a command, panicking if the domain rejects it.
pub fn run(
    persistence: &mut Persistence,
    user: &User,
    command: Command,
) -> Result<PersistTransitionResult, PersistenceError> {
    let result: TransitionResult = plan(persistence, user, command);
    persistence.persist_transition(&result)
}

pub fn create_section(persistence: &mut Persistence, teacher: &User, code: &str) -> i64 {
    let draft: SectionDraft = SectionDraft {
        name: format!("Section {code}"),
        code: String::from(code),
        ..SectionDraft::default()
    };
    run(persistence, teacher, Command::CreateSection { draft })
        .unwrap()
        .entity_id
        .unwrap()
}

pub fn join(persistence: &mut Persistence, user: &User, section_id: i64) {
    run(persistence, user, Command::JoinSection { section_id }).unwrap();
}

pub fn event_draft(section_id: Option<i64>, title: &str) -> EventDraft {
    EventDraft {
        section_id,
        date: String::from("2026-11-20"),
        event_type: String::from("exam"),
        title: String::from(title),
        ..EventDraft::default()
    }
}

pub fn create_event(
    persistence: &mut Persistence,
    user: &User,
    section_id: Option<i64>,
    title: &str,
) -> i64 {
    let draft: EventDraft = event_draft(section_id, title);
    run(persistence, user, Command::CreateEvent { draft })
        .unwrap()
        .entity_id
        .unwrap()
}

/// A per-test file database path under the system temp directory.
pub fn temp_db_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "studytrack_{label}_{}_{}.db",
        std::process::id(),
        std::thread::current().name().unwrap_or("main").replace("::", "_")
    ))
}

pub fn remove_db(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
