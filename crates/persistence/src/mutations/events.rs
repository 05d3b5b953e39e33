// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event mutations.
//!
//! Every write is guarded in its `WHERE` clause so that the precondition
//! checked by the caller cannot change between check and write.

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_domain::{
    DomainError, EventPatch, EventStatus, EventType, ModerationRecord, NewEvent,
    format_event_date, format_event_time,
};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{EventChangeset, NewEventRow, format_timestamp};
use crate::diesel_schema::events;
use crate::error::PersistenceError;
use crate::queries::events::find_event;

/// Inserts a new event.
///
/// # Returns
///
/// The id assigned to the event.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_event(
    conn: &mut SqliteConnection,
    event: &NewEvent,
) -> Result<i64, PersistenceError> {
    let row: NewEventRow<'_> = NewEventRow::from_new_event(event)?;

    diesel::insert_into(events::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to insert event: {e}")))?;

    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(event_id, status = event.status.as_str(), "Inserted event");
    Ok(event_id)
}

/// Applies a validated patch to an event.
///
/// # Errors
///
/// Returns `EventNotFound` if no row has the id, or an error if the update fails.
pub fn update_event(
    conn: &mut SqliteConnection,
    event_id: i64,
    patch: &EventPatch,
) -> Result<(), PersistenceError> {
    let changes: EventChangeset<'_> = EventChangeset {
        event_date: patch.date.map(format_event_date),
        event_time: patch.time.map(|time| time.map(format_event_time)),
        event_type: patch.event_type.as_ref().map(EventType::as_str),
        title: patch.title.as_deref(),
        details: patch.details.as_deref(),
        color: patch.color.as_deref(),
        completed: patch.completed.map(i32::from),
    };

    let updated: usize = diesel::update(events::table.filter(events::event_id.eq(event_id)))
        .set(&changes)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to update event: {e}")))?;

    if updated == 0 {
        return Err(DomainError::EventNotFound(event_id).into());
    }

    debug!(event_id, "Updated event");
    Ok(())
}

/// Deletes an event.
///
/// # Errors
///
/// Returns `EventNotFound` if no row has the id, or an error if the delete fails.
pub fn delete_event(conn: &mut SqliteConnection, event_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(events::table.filter(events::event_id.eq(event_id)))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to delete event: {e}")))?;

    if deleted == 0 {
        return Err(DomainError::EventNotFound(event_id).into());
    }

    debug!(event_id, "Deleted event");
    Ok(())
}

/// Moves an event from `from` to `to`, recording the moderator.
///
/// The update only matches while the row still has status `from`. When
/// nothing matches, the row is re-read to tell a vanished event apart from
/// one another moderator already decided.
///
/// # Errors
///
/// - `EventNotFound` if the event no longer exists
/// - `InvalidStatusTransition` if the status changed concurrently
pub fn moderate_event(
    conn: &mut SqliteConnection,
    event_id: i64,
    from: EventStatus,
    to: EventStatus,
    record: ModerationRecord,
) -> Result<(), PersistenceError> {
    let approved_at: String = format_timestamp(record.approved_at)?;

    let updated: usize = diesel::update(
        events::table
            .filter(events::event_id.eq(event_id))
            .filter(events::status.eq(from.as_str())),
    )
    .set((
        events::status.eq(to.as_str()),
        events::approved_by.eq(Some(record.approved_by)),
        events::approved_at.eq(Some(approved_at)),
    ))
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("Failed to moderate event: {e}")))?;

    if updated == 0 {
        let current: EventStatus = find_event(conn, event_id)?
            .ok_or(DomainError::EventNotFound(event_id))?
            .status;
        return Err(DomainError::InvalidStatusTransition {
            from: current.as_str().to_string(),
            to: to.as_str().to_string(),
        }
        .into());
    }

    debug!(
        event_id,
        from = from.as_str(),
        to = to.as_str(),
        moderator = record.approved_by,
        "Moderated event"
    );
    Ok(())
}
