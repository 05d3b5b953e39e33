// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for `StudyTrack`.
//!
//! This crate stores users, sections, memberships, events and the audit
//! trail in `SQLite` via Diesel. The schema is created by embedded
//! migrations on every open.
//!
//! ## Concurrency
//!
//! Each `Persistence` owns one connection. Every write goes through
//! `persist_transition`, which runs inside a `BEGIN IMMEDIATE`
//! transaction, so two connections on the same file database serialize
//! their writes. Guards that the domain layer checked against a read
//! snapshot are re-checked inside that transaction:
//!
//! - approve/reject only match rows whose status is still `pending`
//! - update/delete only match rows that still exist
//! - joins are re-planned against current memberships, and a partial
//!   unique index allows at most one active membership per student
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated shared in-memory databases
//! - Concurrency tests use a temporary file database with WAL enabled

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use studytrack::TransitionResult;
use studytrack_audit::TargetKind;
use studytrack_domain::{Event, MembershipStatus, Role, Section, User};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{EventRecord, SectionSummary, StoredAuditEvent};
pub use error::PersistenceError;
pub use mutations::PersistTransitionResult;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, isolating
    /// tests from one another.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; their writes are serialized
    /// by `SQLite`.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Persists a transition result: the mutation and its audit event.
    ///
    /// # Returns
    ///
    /// The audit id and the id of the record the transition targeted.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DomainViolation` if a guard re-checked
    /// inside the write transaction fails, or another error if a write fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(&mut self.conn, result)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user directory record and returns it.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is taken, or an error if the
    /// insert fails.
    pub fn create_user(
        &mut self,
        name: &str,
        email: &str,
        role: Role,
        student_id: Option<&str>,
    ) -> Result<User, PersistenceError> {
        let user_id: i64 =
            mutations::users::create_user(&mut self.conn, name, email, role, student_id)?;

        Ok(User {
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            student_id: student_id.map(str::to_string),
        })
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user(&mut self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        queries::users::find_user(&mut self.conn, user_id)
    }

    /// Retrieves a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>, PersistenceError> {
        queries::users::find_user_by_email(&mut self.conn, email)
    }

    // ========================================================================
    // Sections & Memberships
    // ========================================================================

    /// Retrieves a section by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_section(&mut self, section_id: i64) -> Result<Option<Section>, PersistenceError> {
        queries::sections::find_section(&mut self.conn, section_id)
    }

    /// Lists all sections, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sections(&mut self) -> Result<Vec<SectionSummary>, PersistenceError> {
        queries::sections::list_sections(&mut self.conn)
    }

    /// Returns the stored membership status of a user in a section.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn membership_status(
        &mut self,
        section_id: i64,
        user_id: i64,
    ) -> Result<Option<MembershipStatus>, PersistenceError> {
        queries::sections::membership_status(&mut self.conn, section_id, user_id)
    }

    /// Returns the sections a user is actively a member of, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_section_ids(&mut self, user_id: i64) -> Result<Vec<i64>, PersistenceError> {
        queries::sections::active_section_ids(&mut self.conn, user_id)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Retrieves an event by id, regardless of who may see it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_event(&mut self, event_id: i64) -> Result<Option<Event>, PersistenceError> {
        queries::events::find_event(&mut self.conn, event_id)
    }

    /// Loads the candidate events for a viewer.
    ///
    /// Candidates still have to pass the visibility predicate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn candidate_events(
        &mut self,
        viewer_id: i64,
        active_sections: &[i64],
    ) -> Result<Vec<Event>, PersistenceError> {
        queries::events::candidate_events(&mut self.conn, viewer_id, active_sections)
    }

    /// Loads every event created by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn events_by_creator(&mut self, creator_id: i64) -> Result<Vec<Event>, PersistenceError> {
        queries::events::events_by_creator(&mut self.conn, creator_id)
    }

    /// Loads pending events in the given sections.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn pending_events_in(
        &mut self,
        section_ids: &[i64],
    ) -> Result<Vec<Event>, PersistenceError> {
        queries::events::pending_events_in(&mut self.conn, section_ids)
    }

    /// Attaches display names to events, preserving order.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails.
    pub fn hydrate_events(
        &mut self,
        events: Vec<Event>,
    ) -> Result<Vec<EventRecord>, PersistenceError> {
        queries::events::hydrate(&mut self.conn, events)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Retrieves the audit trail for one record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn audit_trail(
        &mut self,
        kind: TargetKind,
        target_id: i64,
    ) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
        queries::audit::audit_trail(&mut self.conn, kind, target_id)
    }
}
