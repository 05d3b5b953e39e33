// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_audit::{Action, Actor, AuditEvent, AuditTarget, StateSnapshot, TargetKind};
use studytrack_domain::Role;
use tracing::debug;

use crate::data_models::{AuditEventRow, StoredAuditEvent, parse_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

impl TryFrom<AuditEventRow> for StoredAuditEvent {
    type Error = PersistenceError;

    fn try_from(row: AuditEventRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .actor_role
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("actor_role: {e}")))?;
        let kind: TargetKind = row
            .target_kind
            .parse()
            .map_err(PersistenceError::ReconstructionError)?;

        Ok(Self {
            audit_id: row.audit_id,
            event: AuditEvent::new(
                Actor::new(row.actor_user_id, role, row.actor_name),
                Action::new(row.action_name, row.action_details),
                AuditTarget {
                    kind,
                    id: row.target_id,
                },
                StateSnapshot::new(row.before_snapshot),
                StateSnapshot::new(row.after_snapshot),
            ),
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Retrieves the audit trail for one record, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `kind` - The kind of record
/// * `target_id` - The record id (the section id for memberships)
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn audit_trail(
    conn: &mut SqliteConnection,
    kind: TargetKind,
    target_id: i64,
) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::target_kind.eq(kind.as_str()))
        .filter(audit_events::target_id.eq(target_id))
        .order(audit_events::audit_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    debug!(
        target_kind = kind.as_str(),
        target_id,
        count = rows.len(),
        "Loaded audit trail"
    );

    rows.into_iter().map(StoredAuditEvent::try_from).collect()
}
