// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Event queries.
//!
//! These queries return *candidate* sets: every event that could possibly
//! be visible to a viewer. The visibility predicate in the domain crate
//! makes the final decision, so storage never has to encode it.

use std::collections::HashMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_domain::{Event, EventStatus};
use tracing::debug;

use crate::data_models::{EventRecord, EventRow};
use crate::diesel_schema::events;
use crate::error::PersistenceError;
use crate::queries::{sections, users};

fn into_events(rows: Vec<EventRow>) -> Result<Vec<Event>, PersistenceError> {
    rows.into_iter().map(Event::try_from).collect()
}

/// Retrieves an event by id.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if the event does not exist.
pub fn find_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<Option<Event>, PersistenceError> {
    let row: Option<EventRow> = events::table
        .filter(events::event_id.eq(event_id))
        .select(EventRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Event::try_from).transpose()
}

/// Loads every event that may be visible to a viewer.
///
/// That is the events of the viewer's active sections plus the viewer's own
/// personal events.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `viewer_id` - The viewer
/// * `active_sections` - The viewer's active section ids
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn candidate_events(
    conn: &mut SqliteConnection,
    viewer_id: i64,
    active_sections: &[i64],
) -> Result<Vec<Event>, PersistenceError> {
    let rows: Vec<EventRow> = events::table
        .filter(
            events::section_id
                .eq_any(active_sections)
                .or(events::section_id
                    .is_null()
                    .and(events::creator_id.eq(viewer_id))),
        )
        .select(EventRow::as_select())
        .load(conn)?;
    let candidates: Vec<Event> = into_events(rows)?;

    debug!(
        viewer_id,
        section_count = active_sections.len(),
        candidate_count = candidates.len(),
        "Loaded candidate events"
    );

    Ok(candidates)
}

/// Loads every event created by `creator_id`.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn events_by_creator(
    conn: &mut SqliteConnection,
    creator_id: i64,
) -> Result<Vec<Event>, PersistenceError> {
    let rows: Vec<EventRow> = events::table
        .filter(events::creator_id.eq(creator_id))
        .order(events::event_id.asc())
        .select(EventRow::as_select())
        .load(conn)?;

    into_events(rows)
}

/// Loads pending events in the given sections.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn pending_events_in(
    conn: &mut SqliteConnection,
    section_ids: &[i64],
) -> Result<Vec<Event>, PersistenceError> {
    if section_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<EventRow> = events::table
        .filter(events::section_id.eq_any(section_ids))
        .filter(events::status.eq(EventStatus::Pending.as_str()))
        .select(EventRow::as_select())
        .load(conn)?;

    into_events(rows)
}

/// Attaches creator and section display names to events, preserving order.
///
/// Missing creators hydrate to an empty name; personal events carry no
/// section labels.
///
/// # Errors
///
/// Returns an error if a lookup query fails.
pub fn hydrate(
    conn: &mut SqliteConnection,
    events: Vec<Event>,
) -> Result<Vec<EventRecord>, PersistenceError> {
    let mut creator_ids: Vec<i64> = events.iter().map(|e| e.creator_id).collect();
    creator_ids.sort_unstable();
    creator_ids.dedup();
    let mut section_ids: Vec<i64> = events.iter().filter_map(|e| e.section_id).collect();
    section_ids.sort_unstable();
    section_ids.dedup();

    let names: HashMap<i64, String> = users::user_names(conn, &creator_ids)?;
    let labels: HashMap<i64, (String, String)> = sections::section_labels(conn, &section_ids)?;

    Ok(events
        .into_iter()
        .map(|event| {
            let creator_name: String = names.get(&event.creator_id).cloned().unwrap_or_default();
            let label: Option<&(String, String)> =
                event.section_id.and_then(|id| labels.get(&id));
            EventRecord {
                creator_name,
                section_name: label.map(|(name, _)| name.clone()),
                section_code: label.map(|(_, code)| code.clone()),
                event,
            }
        })
        .collect())
}
