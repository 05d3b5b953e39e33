// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_audit::AuditEvent;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::format_timestamp;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Insertable)]
#[diesel(table_name = audit_events)]
struct NewAuditEventRow<'a> {
    actor_user_id: i64,
    actor_role: &'a str,
    actor_name: &'a str,
    action_name: &'a str,
    action_details: Option<&'a str>,
    target_kind: &'a str,
    target_id: Option<i64>,
    before_snapshot: &'a str,
    after_snapshot: &'a str,
    created_at: String,
}

/// Persists an audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event, with its target id resolved
/// * `recorded_at` - When the event was recorded
///
/// # Returns
///
/// The audit id assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    recorded_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEventRow<'_> = NewAuditEventRow {
        actor_user_id: event.actor.user_id,
        actor_role: event.actor.role.as_str(),
        actor_name: &event.actor.name,
        action_name: &event.action.name,
        action_details: event.action.details.as_deref(),
        target_kind: event.target.kind.as_str(),
        target_id: event.target.id,
        before_snapshot: &event.before.data,
        after_snapshot: &event.after.data,
        created_at: format_timestamp(recorded_at)?,
    };

    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("Failed to persist audit event: {e}")))?;

    let audit_id: i64 = get_last_insert_rowid(conn)?;
    debug!(audit_id, action = %event.action.name, "Persisted audit event");
    Ok(audit_id)
}
