// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit` — Audit event persistence
//! - `events` — Guarded event writes
//! - `sections` — Section creation, join and leave
//! - `users` — User directory records
//!
//! `persist_transition` is the single entry point for applying a
//! `TransitionResult`: the mutation and its audit event are written in one
//! immediate transaction.

pub mod audit;
pub mod events;
pub mod sections;
pub mod users;

use diesel::SqliteConnection;
use studytrack::{Mutation, TransitionResult};
use studytrack_audit::AuditEvent;
use time::OffsetDateTime;
use tracing::info;

use crate::error::PersistenceError;

/// Result of persisting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The audit id assigned to the audit event.
    pub audit_id: i64,
    /// The id of the record the transition targeted.
    ///
    /// For inserts this is the newly assigned id.
    pub entity_id: Option<i64>,
}

/// Persists a transition result.
///
/// The transaction is opened with `BEGIN IMMEDIATE` so the write lock is
/// held from the first read. Guards re-checked inside it see the rows as
/// they are when written.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The transition result to persist
///
/// # Errors
///
/// Returns an error if a guard fails or a write fails. Nothing is written
/// in either case.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let entity_id: Option<i64> = apply_mutation(conn, result)?;

        let audit_event: AuditEvent = match entity_id {
            Some(id) => result.audit_event.clone().resolve_target(id),
            None => result.audit_event.clone(),
        };
        let audit_id: i64 =
            audit::persist_audit_event(conn, &audit_event, OffsetDateTime::now_utc())?;

        info!(
            audit_id,
            entity_id,
            action = %audit_event.action.name,
            actor = audit_event.actor.user_id,
            "Persisted transition"
        );

        Ok(PersistTransitionResult {
            audit_id,
            entity_id,
        })
    })
}

fn apply_mutation(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<Option<i64>, PersistenceError> {
    match &result.mutation {
        Mutation::InsertEvent(event) => events::insert_event(conn, event).map(Some),
        Mutation::UpdateEvent { event_id, patch } => {
            events::update_event(conn, *event_id, patch)?;
            Ok(Some(*event_id))
        }
        Mutation::DeleteEvent { event_id } => {
            events::delete_event(conn, *event_id)?;
            Ok(Some(*event_id))
        }
        Mutation::ModerateEvent {
            event_id,
            from,
            to,
            record,
        } => {
            events::moderate_event(conn, *event_id, *from, *to, *record)?;
            Ok(Some(*event_id))
        }
        Mutation::InsertSection(section) => {
            sections::insert_section(conn, section, result.audit_event.actor.role).map(Some)
        }
        Mutation::JoinSection {
            section_id,
            user_id,
            role,
            joined_at,
        } => {
            sections::join_section(conn, *section_id, *user_id, *role, *joined_at)?;
            Ok(Some(*section_id))
        }
        Mutation::LeaveSection {
            section_id,
            user_id,
        } => {
            sections::leave_section(conn, *section_id, *user_id)?;
            Ok(Some(*section_id))
        }
    }
}
