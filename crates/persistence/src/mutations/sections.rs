// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Section and membership mutations.
//!
//! Joins are re-planned against the rows visible inside the caller's write
//! transaction. The partial unique index on active student memberships is
//! the last line of enforcement for the one-active-section rule.

use diesel::SqliteConnection;
use diesel::prelude::*;
use studytrack_domain::{
    DomainError, JoinPlan, MembershipStatus, NewSection, Role, Section, plan_join,
};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{NewMembershipRow, NewSectionRow, format_timestamp};
use crate::diesel_schema::{section_members, sections};
use crate::error::{PersistenceError, is_unique_violation};
use crate::queries::sections::{active_section_ids, find_section, membership_status};

/// Inserts a section and enrolls its creator as an active member.
///
/// # Returns
///
/// The id assigned to the section.
///
/// # Errors
///
/// Returns `DuplicateSectionCode` if the code is taken, or an error if an
/// insert fails.
pub fn insert_section(
    conn: &mut SqliteConnection,
    section: &NewSection,
    creator_role: Role,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(section.created_at)?;
    let row: NewSectionRow<'_> = NewSectionRow {
        name: &section.name,
        code: &section.code,
        description: section.description.as_deref(),
        creator_id: section.creator_id,
        academic_year: section.academic_year.as_deref(),
        semester: section.semester.as_deref(),
        created_at: created_at.clone(),
    };

    diesel::insert_into(sections::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DomainViolation(DomainError::DuplicateSectionCode(
                    section.code.clone(),
                ))
            } else {
                PersistenceError::QueryFailed(format!("Failed to insert section: {e}"))
            }
        })?;
    let section_id: i64 = get_last_insert_rowid(conn)?;

    insert_membership(conn, section_id, section.creator_id, creator_role, created_at)?;

    debug!(section_id, code = %section.code, "Inserted section");
    Ok(section_id)
}

fn insert_membership(
    conn: &mut SqliteConnection,
    section_id: i64,
    user_id: i64,
    role: Role,
    joined_at: String,
) -> Result<(), diesel::result::Error> {
    diesel::insert_into(section_members::table)
        .values(&NewMembershipRow {
            section_id,
            user_id,
            member_role: role.as_str(),
            status: MembershipStatus::Active.as_str(),
            joined_at,
        })
        .execute(conn)?;
    Ok(())
}

/// Makes `user_id` an active member of `section_id`.
///
/// Must run inside an immediate transaction: the join is re-planned against
/// the current rows before anything is written.
///
/// # Errors
///
/// - `SectionNotFound` if the section no longer exists
/// - `AlreadyMember`, `SectionLimitExceeded` or `RoleNotPermitted` from the
///   join rules
/// - a query error if a write fails
pub fn join_section(
    conn: &mut SqliteConnection,
    section_id: i64,
    user_id: i64,
    role: Role,
    joined_at: OffsetDateTime,
) -> Result<JoinPlan, PersistenceError> {
    let section: Section =
        find_section(conn, section_id)?.ok_or(DomainError::SectionNotFound(section_id))?;
    let existing: Option<MembershipStatus> = membership_status(conn, section_id, user_id)?;
    let active: Vec<i64> = active_section_ids(conn, user_id)?;

    let plan: JoinPlan = plan_join(role, &section, existing, &active)?;
    let joined_at: String = format_timestamp(joined_at)?;

    let written: Result<(), diesel::result::Error> = match plan {
        JoinPlan::Insert => insert_membership(conn, section_id, user_id, role, joined_at),
        JoinPlan::Reactivate => diesel::update(
            section_members::table
                .filter(section_members::section_id.eq(section_id))
                .filter(section_members::user_id.eq(user_id)),
        )
        .set((
            section_members::status.eq(MembershipStatus::Active.as_str()),
            section_members::member_role.eq(role.as_str()),
            section_members::joined_at.eq(joined_at),
        ))
        .execute(conn)
        .map(|_| ()),
    };

    match written {
        Ok(()) => {
            debug!(section_id, user_id, ?plan, "Joined section");
            Ok(plan)
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(section_id, user_id, "Join rejected by active membership index");
            let active_section_id: i64 = active.first().copied().unwrap_or_default();
            Err(DomainError::SectionLimitExceeded { active_section_id }.into())
        }
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to join section: {e}"
        ))),
    }
}

/// Marks the membership of `user_id` in `section_id` inactive.
///
/// Only an active row is changed, so a repeated leave reports `NotMember`
/// and writes nothing.
///
/// # Errors
///
/// Returns `NotMember` if no active membership exists, or an error if the
/// update fails.
pub fn leave_section(
    conn: &mut SqliteConnection,
    section_id: i64,
    user_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        section_members::table
            .filter(section_members::section_id.eq(section_id))
            .filter(section_members::user_id.eq(user_id))
            .filter(section_members::status.eq(MembershipStatus::Active.as_str())),
    )
    .set(section_members::status.eq(MembershipStatus::Inactive.as_str()))
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("Failed to leave section: {e}")))?;

    if updated == 0 {
        return Err(DomainError::NotMember { section_id }.into());
    }

    debug!(section_id, user_id, "Left section");
    Ok(())
}
